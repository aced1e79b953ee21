use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::AuthConfig;
use crate::domain::repositories::{
    CommentRepository, PostRepository, TagRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, auth: AuthConfig) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            tags: Arc::new(PostgresTagRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
            auth: Arc::new(auth),
        }
    }

    /// State backed by a single in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>, auth: AuthConfig) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            tags: store.clone(),
            users: store,
            auth: Arc::new(auth),
        }
    }
}

impl FromRef<AppState> for Arc<AuthConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
