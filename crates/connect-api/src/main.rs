//! # connect-checkout
//!
//! Stripe Connect direct-charge checkout server.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export BASE_PRICE=1000
//! export DOMAIN=http://localhost:4242
//! export STATIC_DIR=../client
//!
//! # Run the server
//! connect-checkout
//! ```

use connect_api::{routes, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::from_env().map_err(|e| {
        error!("Error loading configuration: {}", e);
        e
    })?;

    let addr = state.config.socket_addr()?;

    info!(
        "Stripe mode: {}",
        if state.config.stripe.is_test_mode() { "test" } else { "live" }
    );
    info!("Payment provider: {}", state.gateway.provider_name());
    info!(
        "Base price: {} {}",
        state.config.base_price.raw(),
        state.config.currency
    );
    info!("Serving static files from {}", state.config.static_dir.display());

    let app = routes::create_router(state);

    info!("server running at {}", addr);
    info!("🔔 Webhook: POST http://{}/webhook", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
