//! # Payment Gateway Trait
//!
//! The capability surface this server needs from a payment provider.
//! Every handler talks to the provider only through this trait, so tests
//! swap in a mock and never touch the network.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentGateway (trait)                    │
//! │  ├── list_accounts()                                        │
//! │  ├── create_session()                                       │
//! │  ├── create_login_link()                                    │
//! │  └── verify_event()                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │   StripeClient    │
//!                  │ (connect-stripe)  │
//!                  └───────────────────┘
//! ```

use crate::account::AccountList;
use crate::error::ConnectResult;
use crate::event::WebhookEvent;
use crate::session::{CheckoutSession, LoginLink, SessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// List connected accounts, at most `limit` of them.
    async fn list_accounts(&self, limit: u32) -> ConnectResult<AccountList>;

    /// Create a hosted checkout session on the connected account named in
    /// `request`.
    async fn create_session(&self, request: &SessionRequest) -> ConnectResult<CheckoutSession>;

    /// Create a one-time dashboard login link for an Express account.
    async fn create_login_link(&self, account_id: &str) -> ConnectResult<LoginLink>;

    /// Verify a webhook signature against the raw body and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Signature header from the request
    fn verify_event(&self, payload: &[u8], signature: &str) -> ConnectResult<WebhookEvent>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;
