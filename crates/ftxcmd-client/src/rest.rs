//! Signed HTTPS transport.
//!
//! Each call builds the URL relative to the configured endpoint, signs
//! `{ts}{METHOD}{path?query}{body}` and unwraps the `{success, result, error}`
//! envelope. There is no retry: a failed call surfaces to the caller once.

use crate::error::{ClientError, ClientResult};
use crate::exchange::{BoxFuture, Exchange};
use crate::signer::{
    Clock, Credentials, RequestSigner, SystemClock, HEADER_KEY, HEADER_SIGN, HEADER_SUBACCOUNT,
    HEADER_TS,
};
use crate::wire::{
    CancelAllRequest, CancelResult, Envelope, OrderResult, OrderSummary, PlaceConditionalRequest,
    PlaceOrderRequest, PositionSummary,
};
use ftxcmd_core::{CancelRequest, CancelScope, ConditionalIntent, MarketName, OrderIntent};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ftx.com/api/";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL; request paths are joined onto it, so it should end with `/`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Exchange implementation backed by the REST API.
pub struct RestClient {
    client: Client,
    base: Url,
    /// `None` until keys are configured; every request then fails.
    signer: Option<RequestSigner>,
    clock: Box<dyn Clock>,
}

impl RestClient {
    /// Create a client for `config.endpoint` using `credentials`.
    pub fn new(config: RestClientConfig, credentials: Credentials) -> ClientResult<Self> {
        info!(subaccount = ?credentials.subaccount(), "Using API credentials");
        Self::build(config, Some(RequestSigner::new(credentials)))
    }

    /// Create a client without keys. Every request fails with
    /// `ClientError::Credentials` before anything is sent.
    pub fn unauthenticated(config: RestClientConfig) -> ClientResult<Self> {
        Self::build(config, None)
    }

    fn build(config: RestClientConfig, signer: Option<RequestSigner>) -> ClientResult<Self> {
        let mut endpoint = config.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to create HTTP client: {e}")))?;

        info!(endpoint = %base, signed = signer.is_some(), "REST client ready");

        Ok(Self {
            client,
            base,
            signer,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Url> {
        let mut url = self.base.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> ClientResult<T> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ClientError::Credentials("no API keys loaded, requests cannot be signed".to_string())
        })?;
        let url = self.build_url(path, query)?;
        let payload = body.unwrap_or_default();
        let ts = self.clock.now_ms();
        let headers = signer.sign(ts, method.as_str(), &signed_path(&url), &payload)?;

        debug!(method = %method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .header(HEADER_KEY, headers.key)
            .header(HEADER_SIGN, headers.sign)
            .header(HEADER_TS, headers.ts);
        if let Some(sub) = headers.subaccount {
            builder = builder.header(HEADER_SUBACCOUNT, sub);
        }
        if !payload.is_empty() {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("HTTP request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Http(format!("Failed to read response: {e}")))?;

        let result = decode_envelope(status, &text);
        if let Err(e) = &result {
            warn!(method = %method, url = %url, status = %status, error = %e, "Request failed");
        }
        result
    }
}

/// Percent-encode an id so it stays a single path segment.
fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}

/// Path plus query, as covered by the signature.
fn signed_path(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

fn decode_envelope<T: DeserializeOwned>(status: StatusCode, text: &str) -> ClientResult<T> {
    let envelope: Envelope<T> = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ClientError::Http(format!("HTTP {status}: {text}")));
        }
        Err(e) => return Err(ClientError::Decode(format!("{e}: {text}"))),
    };

    if !envelope.success {
        return Err(ClientError::Exchange(
            envelope
                .error
                .unwrap_or_else(|| format!("request failed with HTTP {status}")),
        ));
    }

    envelope
        .result
        .ok_or_else(|| ClientError::Decode("response has no result".to_string()))
}

impl Exchange for RestClient {
    fn place_order(&self, intent: OrderIntent) -> BoxFuture<'_, ClientResult<OrderResult>> {
        Box::pin(async move {
            let body = serde_json::to_string(&PlaceOrderRequest::from(&intent))?;
            self.request(Method::POST, "orders", &[], Some(body)).await
        })
    }

    fn place_conditional_order(
        &self,
        intent: ConditionalIntent,
    ) -> BoxFuture<'_, ClientResult<OrderResult>> {
        Box::pin(async move {
            let body = serde_json::to_string(&PlaceConditionalRequest::from(&intent))?;
            self.request(Method::POST, "conditional_orders", &[], Some(body))
                .await
        })
    }

    fn cancel_orders(&self, request: CancelRequest) -> BoxFuture<'_, ClientResult<CancelResult>> {
        Box::pin(async move {
            match &request.scope {
                CancelScope::ById(id) => {
                    self.request(Method::DELETE, &format!("orders/{id}"), &[], None)
                        .await
                }
                CancelScope::ConditionalOnly(Some(id)) => {
                    self.request(
                        Method::DELETE,
                        &format!("conditional_orders/{}", path_segment(id)),
                        &[],
                        None,
                    )
                    .await
                }
                _ => {
                    let body = serde_json::to_string(&CancelAllRequest::for_request(&request))?;
                    self.request(Method::DELETE, "orders", &[], Some(body)).await
                }
            }
        })
    }

    fn list_open_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        Box::pin(async move {
            self.request(
                Method::GET,
                "orders",
                &[("market", market.to_string())],
                None,
            )
            .await
        })
    }

    fn list_open_conditional_orders(
        &self,
        market: MarketName,
    ) -> BoxFuture<'_, ClientResult<Vec<OrderSummary>>> {
        Box::pin(async move {
            self.request(
                Method::GET,
                "conditional_orders",
                &[("market", market.to_string())],
                None,
            )
            .await
        })
    }

    fn list_positions(&self) -> BoxFuture<'_, ClientResult<Vec<PositionSummary>>> {
        Box::pin(async move {
            self.request(
                Method::GET,
                "positions",
                &[("showAvgPrice", "false".to_string())],
                None,
            )
            .await
        })
    }
}
