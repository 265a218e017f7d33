use std::fmt;

use uuid::Uuid;

use crate::error::CoreError;

const MAX_ID_LEN: usize = 64;

/// Generates a fresh identifier for a post or comment.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// An identifier that is safe to use as a file name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RecordId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(CoreError::InvalidId("empty id".to_string()));
        }
        if value.len() > MAX_ID_LEN
            || !value
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(CoreError::InvalidId(value.to_string()));
        }
        Ok(RecordId(value.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
