//! HMAC-SHA256 request signing.
//!
//! The exchange authenticates each request with
//! `HMAC-SHA256(secret, "{ts}{METHOD}{path_with_query}{body}")`, hex encoded,
//! sent alongside the API key and timestamp headers.
//!
//! Security notes:
//! - The secret is held in `Zeroizing` memory and wiped on drop.
//! - Never log the secret or a full signature payload containing it.

use crate::error::{ClientError, ClientResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_KEY: &str = "FTX-KEY";
pub const HEADER_SIGN: &str = "FTX-SIGN";
pub const HEADER_TS: &str = "FTX-TS";
pub const HEADER_SUBACCOUNT: &str = "FTX-SUBACCOUNT";

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Returns current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// API credentials.
pub struct Credentials {
    api_key: String,
    api_secret: Zeroizing<String>,
    subaccount: Option<String>,
}

impl Credentials {
    pub fn new(api_key: String, api_secret: String, subaccount: Option<String>) -> Self {
        Self {
            api_key,
            api_secret: Zeroizing::new(api_secret),
            subaccount: subaccount.filter(|s| !s.is_empty()),
        }
    }

    /// Load key and secret from the named environment variables.
    ///
    /// # Errors
    /// Returns `ClientError::Credentials` if either variable is unset or empty.
    pub fn from_env(key_var: &str, secret_var: &str, subaccount: Option<String>) -> ClientResult<Self> {
        let read = |name: &str| -> ClientResult<String> {
            match std::env::var(name) {
                Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(ClientError::Credentials(format!(
                    "environment variable {name} is not set"
                ))),
            }
        };
        Ok(Self::new(read(key_var)?, read(secret_var)?, subaccount))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn subaccount(&self) -> Option<&str> {
        self.subaccount.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("subaccount", &self.subaccount)
            .finish()
    }
}

/// Header values for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub key: String,
    pub sign: String,
    pub ts: String,
    /// URL-encoded subaccount name, if any.
    pub subaccount: Option<String>,
}

/// Builds signatures for outgoing requests.
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Compute the hex signature for a request.
    ///
    /// `path_url` is the path including the query string (e.g. `/api/orders?market=XTZ-PERP`).
    pub fn signature(&self, ts: u64, method: &str, path_url: &str, body: &str) -> ClientResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| ClientError::Credentials(format!("invalid API secret: {e}")))?;
        mac.update(ts.to_string().as_bytes());
        mac.update(method.as_bytes());
        mac.update(path_url.as_bytes());
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Produce all authentication headers for a request.
    pub fn sign(&self, ts: u64, method: &str, path_url: &str, body: &str) -> ClientResult<SignedHeaders> {
        Ok(SignedHeaders {
            key: self.credentials.api_key().to_string(),
            sign: self.signature(ts, method, path_url, body)?,
            ts: ts.to_string(),
            subaccount: self.credentials.subaccount().map(encode_subaccount),
        })
    }
}

fn encode_subaccount(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
