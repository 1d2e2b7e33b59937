//! # connect-api
//!
//! HTTP API layer for connect-checkout.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout and Express dashboard redirects for connected accounts
//! - Webhook handler for Stripe events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/config` | Publishable key, base price, connected accounts |
//! | POST | `/create-checkout-session` | Redirect to hosted checkout |
//! | GET | `/express-dashboard-link` | Redirect to Express dashboard |
//! | POST | `/webhook` | Stripe webhook |
//! | GET | `/*` | Static files |

pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
