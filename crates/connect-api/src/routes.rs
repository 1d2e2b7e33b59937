//! # Routes
//!
//! Axum router configuration for the connect checkout server.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the main application router
///
/// Routes:
///   - GET  /config - Publishable key, base price, connected accounts
///   - POST /create-checkout-session - Redirect to hosted checkout
///   - GET  /express-dashboard-link - Redirect to Express dashboard
///   - POST /webhook - Stripe webhook handler
///   - GET  /* - Static files from `STATIC_DIR`
///
/// A known path hit with the wrong method answers 405 before any
/// handler runs.
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/config", get(handlers::config))
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route(
            "/express-dashboard-link",
            get(handlers::express_dashboard_link),
        )
        .route("/webhook", post(handlers::webhook))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
