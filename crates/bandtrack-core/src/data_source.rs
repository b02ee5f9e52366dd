//! Market data source trait and request types.
//!
//! The `MarketDataSource` contract is what the batch orchestrator consumes;
//! provider adapters implement it, and tests substitute scripted sources.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, Symbol, Timeframe};

/// Fetch-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Transport or upstream failure; transient and retryable.
    Network,
    /// Provider answered but returned no rows; retried as a provider hiccup.
    Empty,
    /// Request was malformed; never retried.
    InvalidRequest,
    /// Provider payload could not be decoded; never retried.
    Decode,
}

/// Structured fetch error surfaced by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn empty(symbol: &Symbol) -> Self {
        Self {
            kind: FetchErrorKind::Empty,
            message: format!("provider returned no data for '{symbol}'"),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Network | FetchErrorKind::Empty)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Network => "fetch.network",
            FetchErrorKind::Empty => "fetch.empty",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
            FetchErrorKind::Decode => "fetch.decode",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Request payload for historical series endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
}

impl SeriesRequest {
    pub fn new(symbol: Symbol, timeframe: Timeframe) -> Self {
        Self { symbol, timeframe }
    }
}

/// Provider adapter contract.
///
/// Implementations must be `Send + Sync`; the orchestrator drives them one
/// request at a time.
pub trait MarketDataSource: Send + Sync {
    /// Fetches the historical price series for one symbol and timeframe.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] with kind `Network` for transport failures,
    /// `Empty` when the provider answers with no rows, and `Decode` when the
    /// payload cannot be parsed.
    fn series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_empty_errors_are_retryable() {
        assert!(FetchError::network("timeout").retryable());

        let symbol = Symbol::parse("TCS").expect("valid symbol");
        assert!(FetchError::empty(&symbol).retryable());
    }

    #[test]
    fn decode_errors_are_not_retryable() {
        let error = FetchError::decode("bad payload");
        assert!(!error.retryable());
        assert_eq!(error.code(), "fetch.decode");
    }
}
