pub mod record_id;

pub use record_id::{new_id, RecordId};
