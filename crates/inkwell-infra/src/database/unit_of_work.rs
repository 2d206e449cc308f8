//! Transactional publishing on PostgreSQL.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::domain::{Post, Tag};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{PublishingTx, UnitOfWork};

use super::entity::post;
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{query_error, write_error};

/// Opens one database transaction per publication.
pub struct PostgresUnitOfWork {
    pub(super) db: DbConn,
}

impl PostgresUnitOfWork {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn PublishingTx>, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;
        Ok(Box::new(PostgresPublishingTx { txn }))
    }
}

/// A publication in progress. Rolled back on drop unless committed.
pub struct PostgresPublishingTx {
    txn: DatabaseTransaction,
}

#[async_trait]
impl PublishingTx for PostgresPublishingTx {
    async fn find_tags(&mut self, texts: &[String]) -> Result<Vec<Tag>, RepoError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Text.is_in(texts.iter().cloned()))
            .all(&self.txn)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_tag(&mut self, text: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Text.eq(text))
            .one(&self.txn)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn insert_tag(&mut self, tag: Tag) -> Result<Tag, RepoError> {
        // A failed statement aborts the whole transaction in PostgreSQL, so
        // the insert runs in a savepoint that can be rolled back alone.
        let savepoint = self.txn.begin().await.map_err(query_error)?;

        match tag::ActiveModel::from(tag).insert(&savepoint).await {
            Ok(model) => {
                savepoint.commit().await.map_err(query_error)?;
                Ok(model.into())
            }
            Err(e) => {
                savepoint.rollback().await.map_err(query_error)?;
                Err(write_error(e))
            }
        }
    }

    async fn insert_post(&mut self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.txn)
            .await
            .map_err(write_error)?;

        Post::try_from(model).map_err(query_error)
    }

    async fn link_tags(&mut self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: sea_orm::Set(post_id),
            tag_id: sea_orm::Set(*tag_id),
        });
        PostTagEntity::insert_many(rows)
            .exec_without_returning(&self.txn)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(query_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.rollback().await.map_err(query_error)
    }
}
