use std::sync::Arc;

use codehouse_core::domain::posts::{Comment, Post, PostEdit};
use thiserror::Error;
use tracing::{debug, warn};

use crate::posts::locks::{KeyedLocks, PostLocks};
use crate::store::{id_from_file_name, PostStore, StoreError};

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed post document {id}: {source}")]
    Parse {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::Store(StoreError::NotFound(_)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostRepoOptions {
    /// Let `edit_post` overwrite category and image as well as title and
    /// content.
    pub edit_applies_media: bool,
}

/// Post and comment operations over a [`PostStore`].
///
/// Every call is its own round trip: reads go to disk, and mutations load
/// the whole post, change it in memory and write the whole post back.
/// Reads report what went wrong; mutations only report whether they worked
/// and log the cause.
pub struct PostRepo {
    store: PostStore,
    locks: Arc<dyn PostLocks>,
    options: PostRepoOptions,
}

impl PostRepo {
    pub fn new(store: PostStore) -> Self {
        Self {
            store,
            locks: Arc::new(KeyedLocks::default()),
            options: PostRepoOptions::default(),
        }
    }

    pub fn with_locks(mut self, locks: Arc<dyn PostLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_options(mut self, options: PostRepoOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn locks_name(&self) -> &'static str {
        self.locks.name()
    }

    pub fn options(&self) -> PostRepoOptions {
        self.options
    }

    pub fn read_post(&self, id: &str) -> Result<Post, PostError> {
        let bytes = self.store.read_document(&self.store.resolve_path(id))?;
        serde_json::from_slice(&bytes).map_err(|source| PostError::Parse {
            id: id.to_string(),
            source,
        })
    }

    /// Reads every stored post. The first document that fails to read
    /// fails the whole call.
    pub fn read_all_posts(&self) -> Result<Vec<Post>, PostError> {
        let names = self.store.list_documents()?;
        let mut posts = Vec::with_capacity(names.len());
        for name in &names {
            posts.push(self.read_post(id_from_file_name(name))?);
        }
        Ok(posts)
    }

    pub fn save_post(&self, post: &Post) -> bool {
        let _guard = self.locks.acquire(&post.id);
        self.write_post(post)
    }

    pub fn delete_post(&self, post: &Post) -> bool {
        let _guard = self.locks.acquire(&post.id);
        let deleted = self.store.delete_document(&self.store.resolve_path(&post.id));
        if deleted {
            debug!(post_id = %post.id, "post deleted");
        }
        deleted
    }

    /// Replaces title and content of a stored post. Category and image only
    /// change when [`PostRepoOptions::edit_applies_media`] is set.
    pub fn edit_post(
        &self,
        id: &str,
        title: &str,
        content: &str,
        category: &str,
        image: &str,
    ) -> bool {
        let edit = PostEdit {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            image: image.to_string(),
        };
        let apply_media = self.options.edit_applies_media;
        self.modify(id, "edit_post", |post| post.apply_edit(&edit, apply_media))
    }

    /// Appends to an already loaded post and saves it.
    pub fn add_comment(&self, post: &mut Post, comment: Comment) -> bool {
        let _guard = self.locks.acquire(&post.id);
        post.add_comment(comment);
        self.write_post(post)
    }

    /// Like [`PostRepo::add_comment`], but loads the post under its lock so
    /// concurrent comments on the same post are not lost.
    pub fn append_comment(&self, post_id: &str, comment: Comment) -> bool {
        self.modify(post_id, "append_comment", |post| post.add_comment(comment))
    }

    /// Saves even when no comment matched.
    pub fn delete_comment(&self, post_id: &str, comment_id: &str) -> bool {
        self.modify(post_id, "delete_comment", |post| {
            let removed = post.remove_comment(comment_id);
            debug!(post_id, comment_id, removed, "comment delete applied");
        })
    }

    /// Saves even when no comment matched.
    pub fn edit_comment(&self, post_id: &str, comment_id: &str, text: &str) -> bool {
        self.modify(post_id, "edit_comment", |post| {
            let edited = post.edit_comment(comment_id, text);
            debug!(post_id, comment_id, edited, "comment edit applied");
        })
    }

    pub fn reply_comment(&self, post_id: &str, comment_id: &str, reply: Comment) -> bool {
        if !reply.is_reply {
            warn!(post_id, comment_id, "reply rejected: comment is not marked as a reply");
            return false;
        }
        self.modify(post_id, "reply_comment", |post| {
            let attached = post.reply_to(comment_id, reply);
            debug!(post_id, comment_id, attached, "reply applied");
        })
    }

    fn modify<F>(&self, post_id: &str, operation: &'static str, change: F) -> bool
    where
        F: FnOnce(&mut Post),
    {
        let _guard = self.locks.acquire(post_id);
        let mut post = match self.read_post(post_id) {
            Ok(post) => post,
            Err(err) => {
                warn!(post_id, operation, error = %err, "post read failed");
                return false;
            }
        };
        change(&mut post);
        self.write_post(&post)
    }

    fn write_post(&self, post: &Post) -> bool {
        let bytes = match serde_json::to_vec(post) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(post_id = %post.id, error = %err, "post serialization failed");
                return false;
            }
        };
        let saved = self
            .store
            .write_document(&self.store.resolve_path(&post.id), &bytes);
        if saved {
            debug!(post_id = %post.id, comments = post.comments.len(), "post saved");
        }
        saved
    }
}
