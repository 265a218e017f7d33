use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub posts: PostsStatus,
}

#[derive(Debug, Serialize)]
pub struct PostsStatus {
    pub dir: String,
    pub dir_exists: bool,
    pub locks: &'static str,
    pub edit_applies_media: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let root = state.posts.store().root();
    Json(HealthResponse {
        status: "ok",
        posts: PostsStatus {
            dir: root.display().to_string(),
            dir_exists: root.is_dir(),
            locks: state.posts.locks_name(),
            edit_applies_media: state.posts.options().edit_applies_media,
        },
    })
}
