//! # Stripe Webhook Handling
//!
//! Verifies Stripe deliveries, decodes the event envelope and dispatches
//! on the event type. The only side effect of a dispatched event in this
//! server is a log record; fulfillment hooks in by implementing
//! [`WebhookHandler`].

use crate::signature;
use connect_core::{
    CheckoutSessionObject, ConnectError, ConnectResult, EventKind, PaymentStatus, WebhookEvent,
};
use serde::Deserialize;
use tracing::{debug, info};

/// What a checkout event tells us about the session it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRecord {
    pub session_id: String,
    /// Connected account the event was delivered for
    pub account: Option<String>,
    pub payment_status: PaymentStatus,
}

impl CheckoutSessionRecord {
    pub fn from_event(event: &WebhookEvent) -> ConnectResult<Self> {
        let session = CheckoutSessionObject::from_event(event)?;
        Ok(Self {
            session_id: session.id,
            account: event.account.clone(),
            payment_status: session.payment_status,
        })
    }

    pub fn account_or_platform(&self) -> &str {
        self.account.as_deref().unwrap_or("platform")
    }
}

/// Webhook event handler trait
///
/// Implement this trait to act on webhook events.
pub trait WebhookHandler: Send + Sync {
    /// Called when a checkout session is completed
    fn on_checkout_completed(&self, record: CheckoutSessionRecord) -> ConnectResult<()> {
        info!(
            session = %record.session_id,
            account = %record.account_or_platform(),
            payment_status = %record.payment_status,
            "Checkout Session completed"
        );
        Ok(())
    }

    /// Called when a delayed payment method (bank debit etc.) settles
    fn on_async_payment_succeeded(&self, record: CheckoutSessionRecord) -> ConnectResult<()> {
        info!(
            session = %record.session_id,
            account = %record.account_or_platform(),
            payment_status = %record.payment_status,
            "Checkout Session succeeded async"
        );
        Ok(())
    }

    /// Called for event types this server does not act on
    fn on_unhandled_event(&self, event: &WebhookEvent) -> ConnectResult<()> {
        debug!("Unhandled webhook event: {}", event.kind);
        Ok(())
    }
}

/// Default handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a verified event to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: WebhookEvent) -> ConnectResult<()> {
    match &event.kind {
        EventKind::CheckoutCompleted => {
            let record = CheckoutSessionRecord::from_event(&event)?;
            handler.on_checkout_completed(record)
        }
        EventKind::AsyncPaymentSucceeded => {
            let record = CheckoutSessionRecord::from_event(&event)?;
            handler.on_async_payment_succeeded(record)
        }
        EventKind::Other(_) => handler.on_unhandled_event(&event),
    }
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

/// Decode an event envelope without checking its signature
pub fn parse_event(payload: &[u8]) -> ConnectResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| ConnectError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    Ok(WebhookEvent {
        kind: EventKind::from(event.event_type.as_str()),
        id: event.id,
        account: event.account,
        created: event.created,
        data_object: event.data.object,
    })
}

/// Verify the signature over the raw body, then decode the envelope.
///
/// Nothing in the body is looked at until the signature has matched.
pub fn construct_event(payload: &[u8], signature: &str, secret: &str) -> ConnectResult<WebhookEvent> {
    signature::verify_signature(payload, signature, secret)?;
    let event = parse_event(payload)?;
    debug!("Verified Stripe webhook: id={}, type={}", event.id, event.kind);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;

    const SECRET: &str = "whsec_test_secret";

    #[derive(Default)]
    struct RecordingHandler {
        completed: Mutex<Vec<CheckoutSessionRecord>>,
        async_succeeded: Mutex<Vec<CheckoutSessionRecord>>,
    }

    impl WebhookHandler for RecordingHandler {
        fn on_checkout_completed(&self, record: CheckoutSessionRecord) -> ConnectResult<()> {
            self.completed.lock().unwrap().push(record);
            Ok(())
        }

        fn on_async_payment_succeeded(&self, record: CheckoutSessionRecord) -> ConnectResult<()> {
            self.async_succeeded.lock().unwrap().push(record);
            Ok(())
        }
    }

    fn envelope(event_type: &str, object: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_test_1",
            "object": "event",
            "type": event_type,
            "account": "acct_connected",
            "created": 1_700_000_000,
            "data": { "object": object }
        }))
        .unwrap()
    }

    fn signed(payload: &[u8]) -> String {
        signature::signature_header(SECRET, Utc::now().timestamp(), payload).unwrap()
    }

    #[test]
    fn test_construct_event() {
        let payload = envelope(
            "checkout.session.completed",
            json!({"id": "cs_test_1", "payment_status": "paid"}),
        );
        let event = construct_event(&payload, &signed(&payload), SECRET).unwrap();

        assert_eq!(event.id, "evt_test_1");
        assert_eq!(event.kind, EventKind::CheckoutCompleted);
        assert_eq!(event.account.as_deref(), Some("acct_connected"));
        assert_eq!(event.created, 1_700_000_000);
    }

    #[test]
    fn test_bad_signature_never_parses() {
        let payload = b"this is not json";
        let header = format!("t={},v1={}", Utc::now().timestamp(), "ab".repeat(32));
        let err = construct_event(payload, &header, SECRET).unwrap_err();
        assert!(matches!(err, ConnectError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_signed_garbage_is_parse_error() {
        let payload = b"{not json";
        let err = construct_event(payload, &signed(payload), SECRET).unwrap_err();
        assert!(matches!(err, ConnectError::WebhookParseError(_)));
    }

    #[test]
    fn test_dispatch_checkout_completed() {
        let handler = RecordingHandler::default();
        let payload = envelope(
            "checkout.session.completed",
            json!({"id": "cs_test_1", "payment_status": "paid"}),
        );
        dispatch_webhook_event(&handler, parse_event(&payload).unwrap()).unwrap();

        let completed = handler.completed.lock().unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(
            completed[0],
            CheckoutSessionRecord {
                session_id: "cs_test_1".to_string(),
                account: Some("acct_connected".to_string()),
                payment_status: PaymentStatus::Paid,
            }
        );
        assert!(handler.async_succeeded.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_async_payment_succeeded() {
        let handler = RecordingHandler::default();
        let payload = envelope(
            "checkout.session.async_payment_succeeded",
            json!({"id": "cs_test_2", "payment_status": "paid"}),
        );
        dispatch_webhook_event(&handler, parse_event(&payload).unwrap()).unwrap();

        assert!(handler.completed.lock().unwrap().is_empty());
        assert_eq!(handler.async_succeeded.lock().unwrap()[0].session_id, "cs_test_2");
    }

    #[test]
    fn test_dispatch_other_is_noop() {
        let handler = RecordingHandler::default();
        let payload = envelope("payment_intent.created", json!({"id": "pi_1"}));
        dispatch_webhook_event(&handler, parse_event(&payload).unwrap()).unwrap();

        assert!(handler.completed.lock().unwrap().is_empty());
        assert!(handler.async_succeeded.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_malformed_session() {
        let handler = RecordingHandler::default();
        let payload = envelope("checkout.session.completed", json!({"payment_status": 7}));
        let err = dispatch_webhook_event(&handler, parse_event(&payload).unwrap()).unwrap_err();

        assert!(matches!(err, ConnectError::WebhookParseError(_)));
        assert!(handler.completed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_logging_handler_accepts_everything() {
        let payload = envelope(
            "checkout.session.completed",
            json!({"id": "cs_test_1", "payment_status": "unpaid"}),
        );
        dispatch_webhook_event(&LoggingWebhookHandler, parse_event(&payload).unwrap()).unwrap();
    }
}
