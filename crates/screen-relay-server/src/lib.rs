//! HTTP surface for the screen relay.
//!
//! Wires the session registry, frame store and notification sink into an
//! axum application: agents register sessions and push frames, the operator
//! views the latest frame of any session through a password-gated polling
//! page.

pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use state::AppState;

/// Build the application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::admin_page))
        .route("/admin", get(handlers::admin_page))
        .route("/sessions", get(handlers::list_sessions))
        .route("/register", post(handlers::register))
        .route("/upload", post(handlers::upload_frame))
        .route("/view/{session_id}", get(handlers::view_session))
        .route("/screens/{file}", get(handlers::serve_frame))
        .route("/admin-list", get(handlers::admin_list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
