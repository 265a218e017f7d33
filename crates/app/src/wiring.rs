use std::sync::Arc;

use tracing::warn;

use crate::config::{AppConfig, LockMode};
use crate::state::AppState;
use codehouse_infra::posts::{KeyedLocks, NoLocks, PostLocks, PostRepo, PostRepoOptions};
use codehouse_infra::store::PostStore;

pub fn build_state(config: AppConfig) -> AppState {
    let locks: Arc<dyn PostLocks> = match config.post_locks {
        LockMode::Keyed => Arc::new(KeyedLocks::default()),
        LockMode::Disabled => {
            warn!("post locks disabled; concurrent edits to one post may be lost");
            Arc::new(NoLocks)
        }
    };
    let repo = PostRepo::new(PostStore::new(&config.posts_dir))
        .with_locks(locks)
        .with_options(PostRepoOptions {
            edit_applies_media: config.edit_applies_media,
        });
    AppState {
        config: Arc::new(config),
        posts: Arc::new(repo),
    }
}
