use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::AppState;
use codehouse_core::domain::posts::Post;
use codehouse_core::error::CoreError;
use codehouse_core::types::RecordId;
use codehouse_infra::posts::{PostError, PostRepo};

#[derive(Debug, Deserialize)]
pub struct NewPostBody {
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct EditPostBody {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Error)]
pub enum PostsApiError {
    #[error("{0}")]
    InvalidId(#[from] CoreError),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("post not found")]
    NotFound,
    #[error("post store error: {0}")]
    Store(PostError),
    #[error("{0} failed")]
    MutationFailed(&'static str),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PostError> for PostsApiError {
    fn from(err: PostError) -> Self {
        if err.is_not_found() {
            PostsApiError::NotFound
        } else {
            PostsApiError::Store(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, PostsApiError> {
    let posts = run_blocking(&state.posts, |repo| repo.read_all_posts()).await??;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, PostsApiError> {
    let id = parse_id(&id)?;
    let post = run_blocking(&state.posts, move |repo| repo.read_post(id.as_str())).await??;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<NewPostBody>,
) -> Result<(StatusCode, Json<Post>), PostsApiError> {
    let title = require("title", body.title)?;
    let author = require("author", body.author)?;
    let content = require("content", body.content)?;
    let post = Post::new(title, author, content, body.category, body.image);
    let saved = {
        let post = post.clone();
        run_blocking(&state.posts, move |repo| repo.save_post(&post)).await?
    };
    ensure(saved, "save_post")?;
    info!(post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EditPostBody>,
) -> Result<StatusCode, PostsApiError> {
    let id = parse_id(&id)?;
    let title = require("title", body.title)?;
    let content = require("content", body.content)?;
    let edited = run_blocking(&state.posts, move |repo| {
        repo.edit_post(id.as_str(), &title, &content, &body.category, &body.image)
    })
    .await?;
    ensure(edited, "edit_post")
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, PostsApiError> {
    let id = parse_id(&id)?;
    let deleted = run_blocking(&state.posts, move |repo| {
        let post = repo.read_post(id.as_str())?;
        Ok::<_, PostError>(repo.delete_post(&post))
    })
    .await??;
    ensure(deleted, "delete_post")
}

/// Runs a store call on the blocking pool; the store does synchronous file
/// I/O and may wait on a post lock.
pub(crate) async fn run_blocking<T, F>(repo: &Arc<PostRepo>, call: F) -> Result<T, PostsApiError>
where
    F: FnOnce(&PostRepo) -> T + Send + 'static,
    T: Send + 'static,
{
    let repo = Arc::clone(repo);
    Ok(tokio::task::spawn_blocking(move || call(&repo)).await?)
}

pub(crate) fn parse_id(raw: &str) -> Result<RecordId, PostsApiError> {
    Ok(RecordId::try_from(raw)?)
}

pub(crate) fn require(field: &'static str, value: String) -> Result<String, PostsApiError> {
    if value.trim().is_empty() {
        return Err(PostsApiError::MissingField(field));
    }
    Ok(value)
}

pub(crate) fn ensure(done: bool, operation: &'static str) -> Result<StatusCode, PostsApiError> {
    if done {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PostsApiError::MutationFailed(operation))
    }
}

impl IntoResponse for PostsApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            PostsApiError::InvalidId(_) | PostsApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            PostsApiError::NotFound => StatusCode::NOT_FOUND,
            PostsApiError::Store(_) | PostsApiError::MutationFailed(_) | PostsApiError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        warn!(error = %self, status = status.as_u16(), "posts api error");
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
