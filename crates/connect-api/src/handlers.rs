//! # Request Handlers
//!
//! Axum request handlers for the connect checkout server.
//! Each handler makes at most one call to the payment gateway.

use crate::response::{plain_text, write_connect_error, write_json};
use crate::state::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use connect_core::{
    is_valid_account_id, AccountList, CheckoutPricing, ConnectError, Currency, Quantity,
    SessionRequest, ACCOUNT_LIST_LIMIT,
};
use connect_stripe::dispatch_webhook_event;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Largest webhook body read into memory
pub const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of `GET /config`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub accounts: AccountList,
    pub public_key: String,
    pub base_price: String,
    pub currency: Currency,
}

/// Form posted by the checkout button
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    /// Connected account id (`acct_...`)
    #[serde(default)]
    pub account: String,
    /// Raw quantity; parsed leniently
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardLinkQuery {
    #[serde(default)]
    pub account_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Publishable key, base price and the first page of connected accounts
#[instrument(skip(state))]
pub async fn config(State(state): State<AppState>) -> Response {
    let accounts = match state.gateway.list_accounts(ACCOUNT_LIST_LIMIT).await {
        Ok(accounts) => accounts,
        Err(e) => {
            error!("Failed to list connected accounts: {}", e);
            return write_connect_error(&e);
        }
    };

    write_json(&ConfigResponse {
        accounts,
        public_key: state.config.stripe.publishable_key.clone(),
        base_price: state.config.base_price.raw().to_string(),
        currency: state.config.currency,
    })
}

/// Open a hosted checkout on the connected account and redirect to it
#[instrument(skip(state, form), fields(account = %form.account))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let account = form.account.trim();
    if account.is_empty() {
        return plain_text(StatusCode::BAD_REQUEST, "missing connected account");
    }
    if !is_valid_account_id(account) {
        return plain_text(StatusCode::BAD_REQUEST, "invalid connected account");
    }

    let (quantity, coerced) = Quantity::parse_lenient(&form.quantity);
    if coerced {
        warn!("Unparsable quantity {:?}, using 0", form.quantity);
    }

    let config = &state.config;
    let request = SessionRequest {
        connected_account_id: account.to_string(),
        product: config.product.clone(),
        pricing: CheckoutPricing::compute(&config.base_price, quantity),
        currency: config.currency,
        urls: config.callback_urls(),
    };

    info!(
        "Creating checkout: quantity={}, unit_amount={}, application_fee={}",
        request.pricing.quantity, request.pricing.unit_amount, request.pricing.application_fee
    );

    match state.gateway.create_session(&request).await {
        Ok(session) => Redirect::to(&session.url).into_response(),
        Err(e) => {
            error!("Failed to create checkout: {}", e);
            plain_text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("error while creating session {}", e),
            )
        }
    }
}

/// Redirect to a one-time Express dashboard login for `account_id`
#[instrument(skip(state))]
pub async fn express_dashboard_link(
    State(state): State<AppState>,
    Query(query): Query<DashboardLinkQuery>,
) -> Response {
    let account_id = query.account_id.trim();
    if account_id.is_empty() {
        return write_connect_error(&ConnectError::InvalidRequest(
            "missing account_id".to_string(),
        ));
    }
    if !is_valid_account_id(account_id) {
        return write_connect_error(&ConnectError::InvalidRequest(
            "invalid account_id".to_string(),
        ));
    }

    match state.gateway.create_login_link(account_id).await {
        Ok(link) => Redirect::to(&link.url).into_response(),
        Err(e) => {
            error!("Failed to create login link: {}", e);
            write_connect_error(&e)
        }
    }
}

/// Verify and consume a Stripe webhook delivery
///
/// Read, verify, then dispatch; each phase answers 400 on failure and
/// stops there.
#[instrument(skip(state, headers, body))]
pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let payload = match to_bytes(body, MAX_WEBHOOK_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return reject_webhook(ConnectError::WebhookUnreadable(e.to_string())),
    };

    // A missing header fails verification like any other bad signature
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = match state.gateway.verify_event(&payload, signature) {
        Ok(event) => event,
        Err(e) => return reject_webhook(e),
    };

    info!(
        "Received webhook: type={}, id={}, created={}",
        event.kind, event.id, event.created
    );

    if let Err(e) = dispatch_webhook_event(state.webhooks.as_ref(), event) {
        return reject_webhook(e);
    }

    write_json(&())
}

fn reject_webhook(err: ConnectError) -> Response {
    error!("Webhook rejected: {}", err);
    let message = match err {
        ConnectError::WebhookUnreadable(_) => "Webhook Error: unreadable body",
        ConnectError::WebhookVerificationFailed(_) => "Webhook Error: invalid signature",
        ConnectError::WebhookParseError(_) => "Webhook Error: malformed payload",
        _ => "Webhook Error",
    };
    plain_text(StatusCode::BAD_REQUEST, message)
}
