use std::sync::Arc;

use crate::config::AppConfig;
use codehouse_infra::posts::PostRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub posts: Arc<PostRepo>,
}
