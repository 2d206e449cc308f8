use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;

/// Publication state of a post, stored as a two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    #[serde(rename = "DR")]
    Draft,
    #[serde(rename = "PB")]
    Published,
}

impl PostStatus {
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DR",
            PostStatus::Published => "PB",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown post status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DR" => Ok(PostStatus::Draft),
            "PB" => Ok(PostStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Validated post fields, before an author and identity are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub preview_img_url: String,
    pub status: PostStatus,
}

/// A validated post form: the draft plus the parsed tag texts.
#[derive(Debug, Clone)]
pub struct PostSubmission {
    pub draft: PostDraft,
    pub tags: Vec<String>,
}

/// Post entity - a blog post written by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub preview_img_url: String,
    pub status: PostStatus,
    pub post_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post for `author_id` from a validated draft.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            description: draft.description,
            content: draft.content,
            preview_img_url: draft.preview_img_url,
            status: draft.status,
            post_date: now,
            modified_date: now,
        }
    }
}

/// A post together with the tags linked to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPost {
    pub post: Post,
    pub tags: Vec<Tag>,
}

impl PublishedPost {
    pub fn tag_texts(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!("DR".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert_eq!("PB".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert!("XX".parse::<PostStatus>().is_err());
        assert_eq!(PostStatus::Draft.to_string(), "DR");
    }

    #[test]
    fn test_status_serializes_as_code() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"PB\"");
    }
}
