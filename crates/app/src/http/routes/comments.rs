use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::http::routes::posts::{ensure, parse_id, require, run_blocking, PostsApiError};
use crate::state::AppState;
use codehouse_core::domain::posts::Comment;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EditCommentBody {
    pub text: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>), PostsApiError> {
    let post_id = parse_id(&id)?;
    let comment = new_comment(body, false)?;
    let added = {
        let comment = comment.clone();
        run_blocking(&state.posts, move |repo| {
            repo.append_comment(post_id.as_str(), comment)
        })
        .await?
    };
    ensure(added, "add_comment")?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn edit_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
    Json(body): Json<EditCommentBody>,
) -> Result<StatusCode, PostsApiError> {
    let post_id = parse_id(&id)?;
    let comment_id = parse_id(&comment_id)?;
    let text = require("text", body.text)?;
    let edited = run_blocking(&state.posts, move |repo| {
        repo.edit_comment(post_id.as_str(), comment_id.as_str(), &text)
    })
    .await?;
    ensure(edited, "edit_comment")
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, PostsApiError> {
    let post_id = parse_id(&id)?;
    let comment_id = parse_id(&comment_id)?;
    let deleted = run_blocking(&state.posts, move |repo| {
        repo.delete_comment(post_id.as_str(), comment_id.as_str())
    })
    .await?;
    ensure(deleted, "delete_comment")
}

pub async fn reply_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>), PostsApiError> {
    let post_id = parse_id(&id)?;
    let comment_id = parse_id(&comment_id)?;
    let reply = new_comment(body, true)?;
    let replied = {
        let reply = reply.clone();
        run_blocking(&state.posts, move |repo| {
            repo.reply_comment(post_id.as_str(), comment_id.as_str(), reply)
        })
        .await?
    };
    ensure(replied, "reply_comment")?;
    Ok((StatusCode::CREATED, Json(reply)))
}

fn new_comment(body: CommentBody, is_reply: bool) -> Result<Comment, PostsApiError> {
    let user_id = require("user_id", body.user_id)?;
    let text = require("text", body.text)?;
    Ok(Comment::new(user_id, text, is_reply))
}
