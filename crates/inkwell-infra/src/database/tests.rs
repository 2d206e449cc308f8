#[cfg(test)]
mod tests {
    use crate::database::entity::{post, tag, user};
    use crate::database::postgres_repo::{
        PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
    };
    use crate::database::unit_of_work::PostgresUnitOfWork;
    use inkwell_core::domain::{PostDraft, PostStatus, Tag, User};
    use inkwell_core::error::RepoError;
    use inkwell_core::ports::{
        BaseRepository, PostRepository, PublishingTx, TagRepository, UnitOfWork, UserRepository,
    };
    use inkwell_core::services::tags;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

    fn unique_violation() -> DbErr {
        DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"tags_text_key\"".to_owned(),
        ))
    }

    fn post_model(id: uuid::Uuid, status: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id: uuid::Uuid::new_v4(),
            title: "Title".to_owned(),
            description: "Description".to_owned(),
            content: "Content".to_owned(),
            preview_img_url: "https://example.com/apparatus/image.png".to_owned(),
            status: status.to_owned(),
            post_date: now.into(),
            modified_date: now.into(),
        }
    }

    fn tag_model(text: &str) -> tag::Model {
        tag::Model {
            id: uuid::Uuid::new_v4(),
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "somename".to_owned(),
                email: "somename@example.com".to_owned(),
                password_hash: "$argon2id$stub".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let found = repo.find_by_username("somename").await.unwrap().unwrap();
        assert_eq!(found.id, user_id);
        assert_eq!(found.email, "somename@example.com");
    }

    #[tokio::test]
    async fn test_find_user_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<user::Model>::new()])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let result: Option<User> = repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_post_with_tags() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, "PB")]])
            .append_query_results(vec![vec![tag_model("Aida"), tag_model("Bullock")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let published = repo.find_with_tags(post_id).await.unwrap().unwrap();
        assert_eq!(published.post.id, post_id);
        assert_eq!(published.post.status, PostStatus::Published);
        assert_eq!(published.tag_texts(), vec!["Aida", "Bullock"]);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, "??")]])
            .append_query_results(vec![Vec::<tag::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.find_with_tags(post_id).await;
        assert!(matches!(result, Err(RepoError::Query(_))));
    }

    #[tokio::test]
    async fn test_all_tags() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![tag_model("CI/CD"), tag_model("Rust")]])
            .into_connection();

        let repo = PostgresTagRepository::new(db);

        let tags: Vec<Tag> = repo.all().await.unwrap();
        let texts: Vec<&str> = tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["CI/CD", "Rust"]);
    }

    #[tokio::test]
    async fn test_duplicate_tag_insert_is_a_constraint_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![unique_violation()])
            .into_connection();

        let uow = PostgresUnitOfWork::new(db);
        let mut tx = uow.begin().await.unwrap();

        let err = tx.insert_tag(Tag::new("Rust")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_tag_created_concurrently_is_reused_after_savepoint_rollback() {
        let post_id = uuid::Uuid::new_v4();
        let aida = tag_model("Aida");
        let raced = tag_model("Rust");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // find_tags: only "Aida" is stored yet
            .append_query_results(vec![vec![aida.clone()]])
            .append_query_results(vec![vec![post_model(post_id, "PB")]])
            // insert "Rust" loses the race, then the re-read finds the winner
            .append_query_errors(vec![unique_violation()])
            .append_query_results(vec![vec![raced.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let uow = PostgresUnitOfWork::new(db);
        let draft = PostDraft {
            title: "Title".to_owned(),
            description: "Description".to_owned(),
            content: "Content".to_owned(),
            preview_img_url: "https://example.com/apparatus/image.png".to_owned(),
            status: PostStatus::Published,
        };

        let mut tx = uow.begin().await.unwrap();
        let published = tags::apply(
            tx.as_mut(),
            uuid::Uuid::new_v4(),
            draft,
            &["Rust".to_owned(), "Aida".to_owned()],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(published.post.id, post_id);
        let ids: Vec<uuid::Uuid> = published.tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![aida.id, raced.id]);

        let log = uow.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql: Vec<&str> = log[0]
            .statements()
            .iter()
            .map(|stmt| stmt.sql.as_str())
            .collect();

        let position = |prefix: &str| {
            sql.iter()
                .position(|s| s.starts_with(prefix))
                .unwrap_or_else(|| panic!("no `{}` in {:?}", prefix, sql))
        };
        let savepoint = position("SAVEPOINT");
        let rolled_back = position("ROLLBACK TO SAVEPOINT");
        let link = position(r#"INSERT INTO "post_tags""#);

        assert_eq!(sql[0], "BEGIN");
        assert!(sql[savepoint + 1].starts_with(r#"INSERT INTO "tags""#));
        assert_eq!(rolled_back, savepoint + 2);
        assert!(sql[rolled_back + 1].starts_with("SELECT"));
        assert!(link > rolled_back + 1);
        assert_eq!(sql.last(), Some(&"COMMIT"));
    }
}
