//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at startup; handlers only ever read it.

use connect_core::{
    BasePrice, BoxedGateway, CallbackUrls, ConnectError, ConnectResult, Currency, ProductListing,
};
use connect_stripe::{LoggingWebhookHandler, StripeClient, StripeConfig, WebhookHandler};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public URL of this server, used for checkout callbacks
    pub domain: String,
    /// Directory served for every path without a route
    pub static_dir: PathBuf,
    /// Price of one unit in minor currency units
    pub base_price: BasePrice,
    pub currency: Currency,
    pub product: ProductListing,
    pub stripe: StripeConfig,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> ConnectResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConnectResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConnectError::Configuration(format!("{} not set", key)))
        };

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConnectError::Configuration(format!("PORT is not a port: {}", p)))?,
            None => 4242,
        };

        let currency = match lookup("CURRENCY").filter(|c| !c.is_empty()) {
            Some(c) => c.parse()?,
            None => Currency::default(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            domain: require("DOMAIN")?,
            static_dir: PathBuf::from(require("STATIC_DIR")?),
            base_price: require("BASE_PRICE")?.parse()?,
            currency,
            product: ProductListing::default(),
            stripe: StripeConfig::from_lookup(&lookup)?,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ConnectResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConnectError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Success/cancel URLs for a checkout started from this server
    pub fn callback_urls(&self) -> CallbackUrls {
        CallbackUrls::for_domain(&self.domain)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: Arc<AppConfig>,
    /// Payment provider
    pub gateway: BoxedGateway,
    /// Receives verified webhook events
    pub webhooks: Arc<dyn WebhookHandler>,
}

impl AppState {
    /// Create state around an existing gateway, logging webhook events
    pub fn new(config: AppConfig, gateway: BoxedGateway) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
            webhooks: Arc::new(LoggingWebhookHandler),
        }
    }

    /// Load configuration and connect the Stripe gateway
    pub fn from_env() -> ConnectResult<Self> {
        let config = AppConfig::from_env()?;
        let stripe = StripeClient::new(config.stripe.clone())?;
        Ok(Self::new(config, Arc::new(stripe)))
    }

    /// Builder: replace the webhook handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhooks = handler;
        self
    }
}
