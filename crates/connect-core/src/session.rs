//! # Checkout Session Types
//!
//! The request sent to the gateway for a direct charge on a connected
//! account, and the handles the gateway returns.

use crate::pricing::{CheckoutPricing, Currency};
use serde::{Deserialize, Serialize};

/// Placeholder the gateway substitutes with the created session's id.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// The product sold on every checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Default for ProductListing {
    fn default() -> Self {
        Self {
            name: "Guitar Lesson".to_string(),
            image_url: Some("https://i.ibb.co/2PNy7yB/guitar.png".to_string()),
        }
    }
}

/// Browser callback URLs encoded into the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CallbackUrls {
    /// Build from the public domain URL (`https://example.com`)
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.trim_end_matches('/');
        Self {
            success_url: format!(
                "{}/success.html?session_id={}",
                domain, SESSION_ID_PLACEHOLDER
            ),
            cancel_url: format!("{}/canceled.html", domain),
        }
    }
}

/// Everything the gateway needs to open a checkout session on behalf of
/// a connected account
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    /// Connected account the session (and its funds) belongs to
    pub connected_account_id: String,
    pub product: ProductListing,
    pub pricing: CheckoutPricing,
    pub currency: Currency,
    pub urls: CallbackUrls,
}

/// Checkout session handle returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout page the browser is redirected to
    pub url: String,
}

/// One-time dashboard login link for an Express account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginLink {
    pub url: String,
}
