//! Post publication as one unit of work.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{PostSubmission, PublishedPost};
use crate::error::DomainError;
use crate::ports::UnitOfWork;

use super::tags;

/// Publishes posts with their tags atomically.
#[derive(Clone)]
pub struct PostPublisher {
    store: Arc<dyn UnitOfWork>,
}

impl PostPublisher {
    pub fn new(store: Arc<dyn UnitOfWork>) -> Self {
        Self { store }
    }

    /// Create a post authored by `author`. Either the post and all of its
    /// tag rows become visible, or nothing does.
    pub async fn publish(
        &self,
        author: Uuid,
        submission: PostSubmission,
    ) -> Result<PublishedPost, DomainError> {
        let mut tx = self.store.begin().await?;

        match tags::apply(tx.as_mut(), author, submission.draft, &submission.tags).await {
            Ok(published) => {
                tx.commit().await?;
                tracing::info!(
                    post_id = %published.post.id,
                    author_id = %author,
                    tags = published.tags.len(),
                    "Post published"
                );
                Ok(published)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Rollback after failed publish also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
