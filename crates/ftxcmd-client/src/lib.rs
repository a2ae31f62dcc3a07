//! Signed REST client for the derivatives exchange.
//!
//! The interpreter only ever talks to the [`Exchange`] trait; this crate
//! provides the real implementation ([`RestClient`]) and an in-memory one
//! for tests ([`MockExchange`]).
//!
//! # Key Components
//!
//! - [`Exchange`]: Order placement, cancellation and query operations
//! - [`RestClient`]: HTTPS transport with HMAC-SHA256 request signing
//! - [`RequestSigner`]: Signature payload construction and header values
//! - [`Credentials`]: API key/secret loaded from the environment

pub mod error;
pub mod exchange;
pub mod mock;
pub mod rest;
pub mod signer;
pub mod wire;

pub use error::{ClientError, ClientResult};
pub use exchange::{BoxFuture, DynExchange, Exchange};
pub use mock::{ExchangeCall, MockExchange};
pub use rest::{RestClient, RestClientConfig};
pub use signer::{Clock, Credentials, RequestSigner, SignedHeaders, SystemClock};
pub use wire::{CancelResult, OrderResult, OrderSummary, PositionSummary};
