// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{auth, comments, posts, tags, users};
pub use state::AppState;

/// Builds the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Account routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users/:id", get(users::get_user))
        // Post routes
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/search", get(posts::search_posts))
        .route(
            "/api/posts/:id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/posts/:id/repost", post(posts::repost))
        // Comment routes
        .route(
            "/api/posts/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/posts/:id/comments/:comment_id",
            delete(comments::delete_comment),
        )
        // Tag routes
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/api/tags/:id", get(tags::get_tag))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
