//! Tag reconciliation.
//!
//! A post form submits its hashtags as a JSON array of `{"value": ...}`
//! entries. Publishing splits those texts into tags that must be created
//! and tags that already exist, then links all of them to the new post.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Post, PostDraft, PublishedPost, Tag};
use crate::error::{DomainError, RepoError};
use crate::ports::PublishingTx;

/// The tag payload could not be read.
#[derive(Debug, thiserror::Error)]
#[error("Malformed tag payload: {0}")]
pub struct MalformedPayloadError(String);

#[derive(Deserialize)]
struct TagEntry {
    value: String,
}

/// Extract the non-empty tag texts from a payload, keeping input order
/// and duplicates.
pub fn parse_payload(payload: &str) -> Result<Vec<String>, MalformedPayloadError> {
    let entries: Vec<TagEntry> =
        serde_json::from_str(payload).map_err(|e| MalformedPayloadError(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|entry| entry.value)
        .filter(|value| !value.is_empty())
        .collect())
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Texts with no stored tag yet.
    pub to_create: BTreeSet<String>,
    /// Every distinct requested text.
    pub to_link: BTreeSet<String>,
}

impl Reconciliation {
    /// Linked texts that are already stored.
    pub fn existing(&self) -> impl Iterator<Item = &String> {
        self.to_link.difference(&self.to_create)
    }
}

pub fn reconcile(tag_texts: &[String], existing: &HashSet<String>) -> Reconciliation {
    let to_link: BTreeSet<String> = tag_texts.iter().cloned().collect();
    let to_create = to_link
        .iter()
        .filter(|text| !existing.contains(*text))
        .cloned()
        .collect();

    Reconciliation { to_create, to_link }
}

/// Persist a post by `author` and link it to the tags named in `tag_texts`,
/// creating the missing ones.
///
/// The post row is written before any tag so a failed post insert leaves
/// tags untouched. All writes go through `tx`; the caller commits.
pub async fn apply(
    tx: &mut dyn PublishingTx,
    author: Uuid,
    draft: PostDraft,
    tag_texts: &[String],
) -> Result<PublishedPost, DomainError> {
    let requested: Vec<String> = tag_texts
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let mut stored: BTreeMap<String, Tag> = tx
        .find_tags(&requested)
        .await?
        .into_iter()
        .map(|tag| (tag.text.clone(), tag))
        .collect();
    let existing: HashSet<String> = stored.keys().cloned().collect();
    let plan = reconcile(tag_texts, &existing);

    let post = tx.insert_post(Post::new(author, draft)).await?;

    for text in &plan.to_create {
        let tag = create_or_reuse(tx, text).await?;
        stored.insert(tag.text.clone(), tag);
    }

    let tags: Vec<Tag> = plan
        .to_link
        .iter()
        .filter_map(|text| stored.remove(text))
        .collect();
    let tag_ids: Vec<Uuid> = tags.iter().map(|t| t.id).collect();
    tx.link_tags(post.id, &tag_ids).await?;

    tracing::debug!(
        post_id = %post.id,
        created = plan.to_create.len(),
        reused = plan.existing().count(),
        "Tags reconciled"
    );

    Ok(PublishedPost { post, tags })
}

/// Insert a tag, or on a uniqueness conflict reuse the row that won the race.
async fn create_or_reuse(tx: &mut dyn PublishingTx, text: &str) -> Result<Tag, DomainError> {
    match tx.insert_tag(Tag::new(text)).await {
        Ok(tag) => Ok(tag),
        Err(RepoError::Constraint(reason)) => {
            tracing::warn!(tag = %text, %reason, "Tag created concurrently, reusing stored row");
            tx.find_tag(text).await?.ok_or_else(|| {
                DomainError::Internal(format!("tag '{}' conflicted but cannot be read", text))
            })
        }
        Err(e) => Err(e.into()),
    }
}
