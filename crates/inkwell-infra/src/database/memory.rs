//! In-memory blog store - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use inkwell_core::domain::{Post, PublishedPost, Tag, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, PostRepository, PublishingTx, TagRepository, UnitOfWork, UserRepository,
};

#[derive(Clone, Default)]
struct BlogData {
    users: HashMap<Uuid, User>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    post_tags: Vec<(Uuid, Uuid)>,
}

impl BlogData {
    fn published(&self, post: &Post) -> PublishedPost {
        let mut tags: Vec<Tag> = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, tag_id)| self.tags.iter().find(|t| t.id == *tag_id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.text.cmp(&b.text));

        PublishedPost {
            post: post.clone(),
            tags,
        }
    }
}

/// Every repository port over one shared in-memory dataset.
///
/// Publishing transactions hold the store lock until they finish, so they
/// run one at a time and readers never see a half-written post.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    data: Arc<Mutex<BlogData>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.data.lock().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut data = self.data.lock().await;
        if data.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        data.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let data = self.data.lock().await;
        Ok(data.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_with_tags(&self, id: Uuid) -> Result<Option<PublishedPost>, RepoError> {
        let data = self.data.lock().await;
        Ok(data
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| data.published(p)))
    }

    async fn recent(&self, limit: u64) -> Result<Vec<PublishedPost>, RepoError> {
        let data = self.data.lock().await;
        let mut posts: Vec<&Post> = data.posts.iter().collect();
        posts.sort_by(|a, b| b.post_date.cmp(&a.post_date));

        Ok(posts
            .into_iter()
            .take(limit as usize)
            .map(|p| data.published(p))
            .collect())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags = self.data.lock().await.tags.clone();
        tags.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(tags)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryBlogStore {
    async fn begin(&self) -> Result<Box<dyn PublishingTx>, RepoError> {
        let guard = self.data.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryPublishingTx { guard, staged }))
    }
}

/// Writes go to a private copy that replaces the shared data on commit.
pub struct InMemoryPublishingTx {
    guard: OwnedMutexGuard<BlogData>,
    staged: BlogData,
}

#[async_trait]
impl PublishingTx for InMemoryPublishingTx {
    async fn find_tags(&mut self, texts: &[String]) -> Result<Vec<Tag>, RepoError> {
        Ok(self
            .staged
            .tags
            .iter()
            .filter(|t| texts.contains(&t.text))
            .cloned()
            .collect())
    }

    async fn find_tag(&mut self, text: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self.staged.tags.iter().find(|t| t.text == text).cloned())
    }

    async fn insert_tag(&mut self, tag: Tag) -> Result<Tag, RepoError> {
        if self.staged.tags.iter().any(|t| t.text == tag.text) {
            return Err(RepoError::Constraint(format!(
                "tag '{}' already exists",
                tag.text
            )));
        }
        self.staged.tags.push(tag.clone());
        Ok(tag)
    }

    async fn insert_post(&mut self, post: Post) -> Result<Post, RepoError> {
        if self.staged.posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        self.staged.posts.push(post.clone());
        Ok(post)
    }

    async fn link_tags(&mut self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        if !self.staged.posts.iter().any(|p| p.id == post_id) {
            return Err(RepoError::Constraint(format!("post {} does not exist", post_id)));
        }
        for tag_id in tag_ids {
            if !self.staged.post_tags.contains(&(post_id, *tag_id)) {
                self.staged.post_tags.push((post_id, *tag_id));
            }
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let InMemoryPublishingTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::domain::{PostDraft, PostStatus, PostSubmission};
    use inkwell_core::services::PostPublisher;

    fn submission(tags: &[&str]) -> PostSubmission {
        PostSubmission {
            draft: PostDraft {
                title: "Title".to_string(),
                description: "Description".to_string(),
                content: "Content".to_string(),
                preview_img_url: "https://example.com/apparatus/image.png".to_string(),
                status: PostStatus::Draft,
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_overlapping_posts_share_tags() {
        let store = InMemoryBlogStore::new();
        let publisher = PostPublisher::new(Arc::new(store.clone()));
        let author = Uuid::new_v4();

        let first = publisher
            .publish(
                author,
                submission(&["Muhammad", "Fernandez", "Aida", "Bullock"]),
            )
            .await
            .unwrap();
        assert_eq!(store.all().await.unwrap().len(), 4);
        assert_eq!(first.tags.len(), 4);

        let second = publisher
            .publish(author, submission(&["Aida", "Bullock", "Leach"]))
            .await
            .unwrap();

        let tags = store.all().await.unwrap();
        assert_eq!(tags.len(), 5);
        let aida = tags.iter().find(|t| t.text == "Aida").unwrap();
        assert!(first.tags.contains(aida));
        assert!(second.tags.contains(aida));

        let stored = store.find_with_tags(second.post.id).await.unwrap().unwrap();
        assert_eq!(stored.tag_texts(), vec!["Aida", "Bullock", "Leach"]);
    }

    #[tokio::test]
    async fn test_repeated_text_creates_one_tag() {
        let store = InMemoryBlogStore::new();
        let publisher = PostPublisher::new(Arc::new(store.clone()));

        publisher
            .publish(Uuid::new_v4(), submission(&["Rust", "Rust"]))
            .await
            .unwrap();

        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = InMemoryBlogStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_tag(Tag::new("Ghost")).await.unwrap();
        }
        let mut tx = store.begin().await.unwrap();
        tx.insert_tag(Tag::new("Rolled")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_a_constraint_error() {
        let store = InMemoryBlogStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.insert_tag(Tag::new("Rust")).await.unwrap();
        let err = tx.insert_tag(Tag::new("Rust")).await.unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = InMemoryBlogStore::new();
        let publisher = PostPublisher::new(Arc::new(store.clone()));
        let author = Uuid::new_v4();

        let older = publisher.publish(author, submission(&[])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = publisher.publish(author, submission(&["A"])).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].post.id, newer.post.id);
        assert_eq!(recent[1].post.id, older.post.id);
        assert_eq!(store.recent(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let store = InMemoryBlogStore::new();
        let user = User::new(
            "somename".to_string(),
            "a@example.com".to_string(),
            "hash".to_string(),
        );
        store.insert(user).await.unwrap();

        let again = User::new(
            "somename".to_string(),
            "b@example.com".to_string(),
            "hash".to_string(),
        );
        assert!(matches!(
            store.insert(again).await,
            Err(RepoError::Constraint(_))
        ));
        let stored = store.find_by_username("somename").await.unwrap().unwrap();
        assert_eq!(stored.email, "a@example.com");
    }
}
