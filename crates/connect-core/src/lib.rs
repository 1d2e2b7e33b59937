//! # connect-core
//!
//! Core types and traits for the connect-checkout platform server.
//!
//! This crate provides:
//! - `PaymentGateway` trait for the payment provider capability surface
//! - `CheckoutPricing` for unit amount and application fee computation
//! - `SessionRequest`, `CheckoutSession` and `LoginLink` for the checkout flow
//! - `WebhookEvent` and `EventKind` for verified webhook events
//! - `ConnectError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use connect_core::{BasePrice, CallbackUrls, CheckoutPricing, Quantity, SessionRequest};
//!
//! let base_price: BasePrice = "20.00".parse()?;
//! let (quantity, _) = Quantity::parse_lenient("2");
//!
//! let request = SessionRequest {
//!     connected_account_id: "acct_123".to_string(),
//!     product: Default::default(),
//!     pricing: CheckoutPricing::compute(&base_price, quantity),
//!     currency: Default::default(),
//!     urls: CallbackUrls::for_domain("https://example.com"),
//! };
//!
//! let session = gateway.create_session(&request).await?;
//! // Redirect the browser to session.url
//! ```

pub mod account;
pub mod error;
pub mod event;
pub mod gateway;
pub mod pricing;
pub mod session;

// Re-exports for convenience
pub use account::{is_valid_account_id, AccountList, ConnectedAccount, ACCOUNT_LIST_LIMIT};
pub use error::{ConnectError, ConnectResult};
pub use event::{CheckoutSessionObject, EventKind, PaymentStatus, WebhookEvent};
pub use gateway::{BoxedGateway, PaymentGateway};
pub use pricing::{BasePrice, CheckoutPricing, Currency, Quantity, APPLICATION_FEE_RATE};
pub use session::{CallbackUrls, CheckoutSession, LoginLink, ProductListing, SessionRequest};
