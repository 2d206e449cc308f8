use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PublishedPost, Tag, User};
use crate::error::RepoError;

/// Lookup and insert by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Read side of posts. Writes go through [`UnitOfWork`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_with_tags(&self, id: Uuid) -> Result<Option<PublishedPost>, RepoError>;

    /// Newest posts first.
    async fn recent(&self, limit: u64) -> Result<Vec<PublishedPost>, RepoError>;
}

/// Read side of tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every stored tag, ordered by text.
    async fn all(&self) -> Result<Vec<Tag>, RepoError>;
}

/// Store operations that make up one post publication.
///
/// Nothing is visible to other readers until [`PublishingTx::commit`].
/// Dropping the transaction without committing discards it.
#[async_trait]
pub trait PublishingTx: Send {
    /// Stored tags whose text is in `texts`.
    async fn find_tags(&mut self, texts: &[String]) -> Result<Vec<Tag>, RepoError>;

    async fn find_tag(&mut self, text: &str) -> Result<Option<Tag>, RepoError>;

    /// Fails with [`RepoError::Constraint`] when the text is already taken.
    async fn insert_tag(&mut self, tag: Tag) -> Result<Tag, RepoError>;

    async fn insert_post(&mut self, post: Post) -> Result<Post, RepoError>;

    async fn link_tags(&mut self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}

/// Opens publishing transactions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn PublishingTx>, RepoError>;
}
