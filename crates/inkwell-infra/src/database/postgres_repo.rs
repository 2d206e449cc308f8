//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};

use inkwell_core::domain::{Post, PublishedPost, Tag, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{PostRepository, TagRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

/// Load the tags of a stored post, ordered by text.
async fn with_tags(db: &DbConn, model: post::Model) -> Result<PublishedPost, RepoError> {
    let tags = model
        .find_related(TagEntity)
        .order_by_asc(tag::Column::Text)
        .all(db)
        .await
        .map_err(query_error)?;
    let post = Post::try_from(model).map_err(query_error)?;

    Ok(PublishedPost {
        post,
        tags: tags.into_iter().map(Into::into).collect(),
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_with_tags(&self, id: uuid::Uuid) -> Result<Option<PublishedPost>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        with_tags(&self.db, model).await.map(Some)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<PublishedPost>, RepoError> {
        let models = PostEntity::find()
            .order_by_desc(post::Column::PostDate)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut posts = Vec::with_capacity(models.len());
        for model in models {
            posts.push(with_tags(&self.db, model).await?);
        }
        Ok(posts)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Text)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
