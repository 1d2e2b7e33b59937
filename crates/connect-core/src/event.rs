//! # Webhook Events
//!
//! A verified webhook envelope and the embedded objects this server reads.

use crate::error::{ConnectError, ConnectResult};
use serde::{Deserialize, Serialize};

/// Event types this server acts on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `checkout.session.completed`
    CheckoutCompleted,
    /// `checkout.session.async_payment_succeeded`
    AsyncPaymentSucceeded,
    /// Any other type, kept as received
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::CheckoutCompleted => "checkout.session.completed",
            EventKind::AsyncPaymentSucceeded => "checkout.session.async_payment_succeeded",
            EventKind::Other(tag) => tag.as_str(),
        }
    }
}

impl From<&str> for EventKind {
    fn from(tag: &str) -> Self {
        match tag {
            "checkout.session.completed" => EventKind::CheckoutCompleted,
            "checkout.session.async_payment_succeeded" => EventKind::AsyncPaymentSucceeded,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A webhook event whose signature has already been checked
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event id (`evt_...`)
    pub id: String,
    pub kind: EventKind,
    /// Connected account the event happened on, if any
    pub account: Option<String>,
    /// Unix timestamp the provider created the event at
    pub created: i64,
    /// `data.object`, undecoded
    pub data_object: serde_json::Value,
}

/// Payment status of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::NoPaymentRequired => "no_payment_required",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `data.object` of a `checkout.session.*` event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

impl CheckoutSessionObject {
    /// Decode the embedded session of a verified event
    pub fn from_event(event: &WebhookEvent) -> ConnectResult<Self> {
        serde_json::from_value(event.data_object.clone()).map_err(|e| {
            ConnectError::WebhookParseError(format!(
                "Invalid checkout session in {}: {}",
                event.id, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: &str, object: serde_json::Value) -> WebhookEvent {
        WebhookEvent {
            id: "evt_test".to_string(),
            kind: EventKind::from(kind),
            account: Some("acct_123".to_string()),
            created: 1_700_000_000,
            data_object: object,
        }
    }

    #[test]
    fn test_event_kind_roundtrip() {
        for tag in [
            "checkout.session.completed",
            "checkout.session.async_payment_succeeded",
            "payment_intent.created",
        ] {
            assert_eq!(EventKind::from(tag).as_str(), tag);
        }
        assert_eq!(
            EventKind::from("charge.refunded"),
            EventKind::Other("charge.refunded".to_string())
        );
    }

    #[test]
    fn test_decode_session_object() {
        let e = event(
            "checkout.session.completed",
            json!({"id": "cs_test_1", "object": "checkout.session", "payment_status": "paid"}),
        );
        let session = CheckoutSessionObject::from_event(&e).unwrap();
        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_unfamiliar_payment_status() {
        let e = event(
            "checkout.session.completed",
            json!({"id": "cs_test_1", "payment_status": "processing"}),
        );
        let session = CheckoutSessionObject::from_event(&e).unwrap();
        assert_eq!(session.payment_status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_malformed_session_object() {
        let e = event("checkout.session.completed", json!({"payment_status": "paid"}));
        let err = CheckoutSessionObject::from_event(&e).unwrap_err();
        assert!(matches!(err, ConnectError::WebhookParseError(_)));

        let e = event("checkout.session.completed", json!("not an object"));
        assert!(CheckoutSessionObject::from_event(&e).is_err());
    }
}
