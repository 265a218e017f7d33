use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::new_id;

/// A blog article together with its comment tree.
///
/// Field names match the on-disk document layout, so a stored post reads
/// back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub date_posted: NaiveDate,
    pub content: String,
    pub category: String,
    pub image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub text: String,
    pub is_reply: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

/// Replacement values for an existing post.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image: String,
}

impl Post {
    /// Builds an unsaved post dated today in local time.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            author: author.into(),
            date_posted: Local::now().date_naive(),
            content: content.into(),
            category: category.into(),
            image: image.into(),
            comments: Vec::new(),
        }
    }

    /// Overwrites title and content. Category and image are only touched
    /// when `apply_media` is set.
    pub fn apply_edit(&mut self, edit: &PostEdit, apply_media: bool) {
        self.title = edit.title.clone();
        self.content = edit.content.clone();
        if apply_media {
            self.category = edit.category.clone();
            self.image = edit.image.clone();
        }
    }

    #[cfg(test)]
    fn find_comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == comment_id)
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Drops every top-level comment carrying `comment_id` and returns how
    /// many were removed.
    pub fn remove_comment(&mut self, comment_id: &str) -> usize {
        let before = self.comments.len();
        self.comments.retain(|comment| comment.id != comment_id);
        before - self.comments.len()
    }

    /// Replaces the text of the first top-level comment with `comment_id`.
    pub fn edit_comment(&mut self, comment_id: &str, text: &str) -> bool {
        match self.top_level_mut(comment_id) {
            Some(comment) => {
                comment.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends `reply` under the first top-level comment with `comment_id`.
    pub fn reply_to(&mut self, comment_id: &str, reply: Comment) -> bool {
        match self.top_level_mut(comment_id) {
            Some(comment) => {
                comment.comments.push(reply);
                true
            }
            None => false,
        }
    }

    fn top_level_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
    }
}

impl Comment {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, is_reply: bool) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            text: text.into(),
            is_reply,
            comments: Vec::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Comment>>::deserialize(deserializer)?.unwrap_or_default())
}
