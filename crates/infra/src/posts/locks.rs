use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

/// Held for the duration of one read-modify-write on a post.
pub struct PostLockGuard {
    _guard: ArcMutexGuard<RawMutex, ()>,
}

/// Serialization policy for mutations that target the same post.
///
/// Acquiring blocks the calling thread until the post is free.
pub trait PostLocks: Send + Sync {
    fn acquire(&self, post_id: &str) -> Option<PostLockGuard>;

    fn name(&self) -> &'static str;
}

/// Lets concurrent writers race: the last full-document write wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocks;

impl PostLocks for NoLocks {
    fn acquire(&self, _post_id: &str) -> Option<PostLockGuard> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// One mutex per post id. Entries nobody holds or waits on are dropped on
/// the next acquire.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    entries: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.entries.lock().len()
    }
}

impl PostLocks for KeyedLocks {
    fn acquire(&self, post_id: &str) -> Option<PostLockGuard> {
        let lock = {
            let mut entries = self.entries.lock();
            entries.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(entries.entry(post_id.to_string()).or_default())
        };
        Some(PostLockGuard {
            _guard: lock.lock_arc(),
        })
    }

    fn name(&self) -> &'static str {
        "keyed"
    }
}
