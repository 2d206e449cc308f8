//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{PostRepository, TagRepository, UserRepository};
use inkwell_core::services::PostPublisher;
use inkwell_infra::InMemoryBlogStore;

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    DatabaseConnections, PostgresPostRepository, PostgresTagRepository, PostgresUnitOfWork,
    PostgresUserRepository,
};

use crate::config::{AppConfig, FormLimits, SessionConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub publisher: PostPublisher,
    pub forms: FormLimits,
    pub session: SessionConfig,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::postgres(Arc::new(connections), config);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(config.forms, config.session.clone())
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: Arc<DatabaseConnections>, config: &AppConfig) -> Self {
        let conn = connections.main.clone();
        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(conn.clone())),
            publisher: PostPublisher::new(Arc::new(PostgresUnitOfWork::new(conn))),
            forms: config.forms,
            session: config.session.clone(),
            db: Some(connections),
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(forms: FormLimits, session: SessionConfig) -> Self {
        let store = InMemoryBlogStore::new();
        Self {
            users: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            tags: Arc::new(store.clone()),
            publisher: PostPublisher::new(Arc::new(store)),
            forms,
            session,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// `"up"`, `"down"`, or `"in-memory"` when no database is attached.
    pub async fn database_status(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if let Some(db) = &self.db {
            return if db.is_reachable().await { "up" } else { "down" };
        }
        "in-memory"
    }
}
