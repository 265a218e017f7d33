pub mod file_store;
pub mod listing;

pub use file_store::{PostStore, StoreError, DEFAULT_POSTS_DIR, DOCUMENT_EXTENSION};
pub use listing::id_from_file_name;
