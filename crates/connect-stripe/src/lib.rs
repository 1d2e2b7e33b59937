//! # connect-stripe
//!
//! Stripe Connect gateway for connect-checkout.
//!
//! This crate provides:
//!
//! 1. **StripeClient** - `PaymentGateway` over the Stripe REST API
//!    - Connected account listing
//!    - Checkout Sessions created directly on a connected account,
//!      with an application fee routed to the platform
//!    - Express dashboard login links
//!
//! 2. **Webhook handling** - signature verification and event dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use connect_stripe::{StripeClient, StripeConfig};
//! use connect_core::PaymentGateway;
//!
//! // Create client from environment
//! let stripe = StripeClient::new(StripeConfig::from_env()?)?;
//!
//! // Create checkout session on the connected account
//! let session = stripe.create_session(&request).await?;
//!
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use connect_stripe::{dispatch_webhook_event, CheckoutSessionRecord, WebhookHandler};
//!
//! struct Fulfillment;
//!
//! impl WebhookHandler for Fulfillment {
//!     fn on_checkout_completed(&self, record: CheckoutSessionRecord) -> ConnectResult<()> {
//!         println!("Session {} paid on {:?}", record.session_id, record.account);
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint:
//! let event = stripe.verify_event(payload, signature)?;
//! dispatch_webhook_event(&Fulfillment, event)?;
//! ```

pub mod client;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use client::StripeClient;
pub use config::StripeConfig;
pub use webhook::{
    construct_event, dispatch_webhook_event, CheckoutSessionRecord, LoggingWebhookHandler,
    WebhookHandler,
};
