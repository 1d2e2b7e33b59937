//! # Stripe Connect Client
//!
//! `PaymentGateway` implementation over Stripe's REST API.
//! Direct charges are created on the connected account by sending the
//! `Stripe-Account` header; the platform keeps `application_fee_amount`.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use connect_core::{
    is_valid_account_id, AccountList, CheckoutSession, ConnectError, ConnectResult, LoginLink,
    PaymentGateway, SessionRequest, WebhookEvent,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe gateway client
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections to the Stripe API.
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(config: StripeConfig) -> ConnectResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("connect-checkout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConnectError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// `/v1/accounts/{id}/login_links` with the id percent-encoded as a
    /// single path segment
    fn login_link_url(&self, account_id: &str) -> ConnectResult<Url> {
        let base = &self.config.api_base_url;
        let mut url = Url::parse(base)
            .map_err(|e| ConnectError::Configuration(format!("Stripe API base {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ConnectError::Configuration(format!("Stripe API base {} has no path", base)))?
            .pop_if_empty()
            .extend(["v1", "accounts", account_id, "login_links"]);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
    }

    /// Send a request and decode a successful response body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ConnectResult<T> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ConnectError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = match serde_json::from_str::<StripeErrorResponse>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => format!("HTTP {}: {}", status, body),
            };
            return Err(ConnectError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ConnectError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Form fields for `POST /v1/checkout/sessions`
fn session_form(request: &SessionRequest) -> Vec<(String, String)> {
    let pricing = &request.pricing;
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.urls.success_url.clone()),
        ("cancel_url".to_string(), request.urls.cancel_url.clone()),
        (
            "line_items[0][quantity]".to_string(),
            pricing.quantity.to_string(),
        ),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.as_str().to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            pricing.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product.name.clone(),
        ),
    ];

    if let Some(ref image) = request.product.image_url {
        form.push((
            "line_items[0][price_data][product_data][images][0]".to_string(),
            image.clone(),
        ));
    }

    form.push((
        "payment_intent_data[application_fee_amount]".to_string(),
        pricing.application_fee.to_string(),
    ));

    form
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[instrument(skip(self))]
    async fn list_accounts(&self, limit: u32) -> ConnectResult<AccountList> {
        let request = self
            .client
            .get(self.url("/v1/accounts"))
            .query(&[("limit", limit)]);

        let accounts: AccountList = self.send(request).await?;
        debug!("Listed {} connected accounts", accounts.data.len());
        Ok(accounts)
    }

    #[instrument(skip(self, request), fields(account = %request.connected_account_id))]
    async fn create_session(&self, request: &SessionRequest) -> ConnectResult<CheckoutSession> {
        debug!(
            "Creating Stripe checkout session: quantity={}, unit_amount={}, fee={}",
            request.pricing.quantity, request.pricing.unit_amount, request.pricing.application_fee
        );

        let http = self
            .client
            .post(self.url("/v1/checkout/sessions"))
            .header("Stripe-Account", &request.connected_account_id)
            .form(&session_form(request));

        let session: CheckoutSession = self.send(http).await?;
        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, session.url
        );
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn create_login_link(&self, account_id: &str) -> ConnectResult<LoginLink> {
        if !is_valid_account_id(account_id) {
            return Err(ConnectError::InvalidRequest(format!(
                "invalid account id {:?}",
                account_id
            )));
        }

        let request = self.client.post(self.login_link_url(account_id)?);
        self.send(request).await
    }

    #[instrument(skip(self, payload, signature))]
    fn verify_event(&self, payload: &[u8], signature: &str) -> ConnectResult<WebhookEvent> {
        webhook::construct_event(payload, signature, &self.config.webhook_secret)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_core::{
        BasePrice, CallbackUrls, CheckoutPricing, Currency, ProductListing, Quantity,
    };
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        let config = StripeConfig::new("sk_test_abc", "pk_test_xyz", "whsec_123")
            .with_api_base_url(server.uri());
        StripeClient::new(config).unwrap()
    }

    fn session_request() -> SessionRequest {
        let base_price: BasePrice = "20.00".parse().unwrap();
        SessionRequest {
            connected_account_id: "acct_connected".to_string(),
            product: ProductListing::default(),
            pricing: CheckoutPricing::compute(&base_price, Quantity::from(2)),
            currency: Currency::USD,
            urls: CallbackUrls::for_domain("http://localhost:4242"),
        }
    }

    #[test]
    fn test_session_form() {
        let form = session_form(&session_request());
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("20"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(
            get("line_items[0][price_data][product_data][name]"),
            Some("Guitar Lesson")
        );
        assert_eq!(get("payment_intent_data[application_fee_amount]"), Some("4"));
        assert_eq!(
            get("cancel_url"),
            Some("http://localhost:4242/canceled.html")
        );
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts"))
            .and(query_param("limit", "10"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "has_more": false,
                "data": [{"id": "acct_1", "type": "express"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let accounts = client_for(&server).list_accounts(10).await.unwrap();
        assert_eq!(accounts.ids().collect::<Vec<_>>(), vec!["acct_1"]);
    }

    #[tokio::test]
    async fn test_create_session_on_connected_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Stripe-Account", "acct_connected"))
            .and(body_string_contains(
                "payment_intent_data%5Bapplication_fee_amount%5D=4",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client_for(&server)
            .create_session(&session_request())
            .await
            .unwrap();
        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_1");
    }

    #[tokio::test]
    async fn test_provider_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "No such account: 'acct_connected'"
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_session(&session_request())
            .await
            .unwrap_err();
        match err {
            ConnectError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "No such account: 'acct_connected'");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_login_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts/acct_1/login_links"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "login_link",
                "created": 1_700_000_000,
                "url": "https://connect.stripe.com/express/abc"
            })))
            .mount(&server)
            .await;

        let link = client_for(&server).create_login_link("acct_1").await.unwrap();
        assert_eq!(link.url, "https://connect.stripe.com/express/abc");
    }

    #[tokio::test]
    async fn test_login_link_refuses_path_characters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "https://x"
            })))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for account_id in ["x/../../accounts?a=", "..", "acct_1/login_links", "acct_1?expand=x"] {
            let err = client.create_login_link(account_id).await.unwrap_err();
            assert!(
                matches!(err, ConnectError::InvalidRequest(_)),
                "{}: {:?}",
                account_id,
                err
            );
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_link_url_is_one_segment() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let url = client.login_link_url("acct_1").unwrap();
        assert_eq!(url.path(), "/v1/accounts/acct_1/login_links");

        let url = client.login_link_url("x/../../accounts?a=").unwrap();
        assert_eq!(url.path(), "/v1/accounts/x%2F..%2F..%2Faccounts%3Fa=/login_links");
        assert_eq!(url.query(), None);
    }

    #[tokio::test]
    async fn test_unparseable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_accounts(10).await.unwrap_err();
        assert!(matches!(err, ConnectError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_api() {
        let config = StripeConfig::new("sk_test_abc", "pk_test_xyz", "whsec_123")
            .with_api_base_url("http://127.0.0.1:1");
        let err = StripeClient::new(config)
            .unwrap()
            .create_login_link("acct_1")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::NetworkError(_)));
    }
}
