use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hashtag attached to posts. The text is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub text: String,
}

impl Tag {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}
