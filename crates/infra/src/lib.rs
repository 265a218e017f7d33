pub mod posts;
pub mod store;
