pub mod locks;
pub mod repo;

pub use locks::{KeyedLocks, NoLocks, PostLockGuard, PostLocks};
pub use repo::{PostError, PostRepo, PostRepoOptions};
