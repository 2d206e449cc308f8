//! In-process store double for service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, Tag};
use crate::error::RepoError;
use crate::ports::{PublishingTx, UnitOfWork};

#[derive(Default)]
pub struct FakeStore {
    pub tags: Vec<Tag>,
    pub posts: Vec<Post>,
    pub links: Vec<(Uuid, Uuid)>,
    /// Tags committed by a concurrent writer after our lookup.
    pub raced: Vec<Tag>,
    pub fail_post_insert: bool,
    pub journal: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeStore {
    fn record(&self, entry: &'static str) {
        self.journal.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl PublishingTx for FakeStore {
    async fn find_tags(&mut self, texts: &[String]) -> Result<Vec<Tag>, RepoError> {
        Ok(self
            .tags
            .iter()
            .filter(|t| texts.contains(&t.text))
            .cloned()
            .collect())
    }

    async fn find_tag(&mut self, text: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self.tags.iter().find(|t| t.text == text).cloned())
    }

    async fn insert_tag(&mut self, tag: Tag) -> Result<Tag, RepoError> {
        if let Some(pos) = self.raced.iter().position(|t| t.text == tag.text) {
            let winner = self.raced.remove(pos);
            self.tags.push(winner);
            return Err(RepoError::Constraint("tags_text_key".to_string()));
        }
        if self.tags.iter().any(|t| t.text == tag.text) {
            return Err(RepoError::Constraint("tags_text_key".to_string()));
        }
        self.record("insert_tag");
        self.tags.push(tag.clone());
        Ok(tag)
    }

    async fn insert_post(&mut self, post: Post) -> Result<Post, RepoError> {
        if self.fail_post_insert {
            return Err(RepoError::Query("connection reset".to_string()));
        }
        self.record("insert_post");
        self.posts.push(post.clone());
        Ok(post)
    }

    async fn link_tags(&mut self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        self.record("link_tags");
        self.links.extend(tag_ids.iter().map(|id| (post_id, *id)));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.record("commit");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.record("rollback");
        Ok(())
    }
}

/// Hands out fresh [`FakeStore`]s sharing one journal.
#[derive(Default)]
pub struct FakeUnitOfWork {
    pub fail_post_insert: bool,
    pub journal: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeUnitOfWork {
    pub fn entries(&self) -> Vec<&'static str> {
        self.journal.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnitOfWork for FakeUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn PublishingTx>, RepoError> {
        Ok(Box::new(FakeStore {
            fail_post_insert: self.fail_post_insert,
            journal: self.journal.clone(),
            ..Default::default()
        }))
    }
}
