//! Batch orchestration of band scans across many symbols.
//!
//! Symbols are processed in fixed-size batches with paced upstream requests
//! and per-symbol retries. A symbol failure never aborts the run; it is
//! recorded in place so downstream rows keep the input order.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::bands::{self, BandError, BandParams, BandResult};
use crate::data_source::{FetchError, FetchErrorKind, MarketDataSource, SeriesRequest};
use crate::domain::{Symbol, Timeframe, NSE_SUFFIX};
use crate::pacing::RequestPacer;
use crate::retry::RetryConfig;

/// Settings for a batch scan run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of symbols fetched per batch.
    pub batch_size: usize,
    /// Minimum gap between successive upstream requests.
    pub request_delay: Duration,
    /// Retry policy applied per symbol.
    pub retry: RetryConfig,
    /// Band window parameters.
    pub band_params: BandParams,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            request_delay: Duration::from_millis(500),
            retry: RetryConfig::default(),
            band_params: BandParams::default(),
        }
    }
}

/// Why a symbol produced no band snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport or provider failure that survived all retries.
    Network,
    /// The provider returned no usable bars.
    Empty,
    /// The series was shorter than the band window.
    InsufficientData,
    /// Anything else, such as a malformed payload.
    Unknown,
}

/// A per-symbol failure, kept in the batch output in input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SymbolFailure {
    fn from_fetch_error(error: &FetchError) -> Self {
        let kind = match error.kind() {
            FetchErrorKind::Empty => FailureKind::Empty,
            FetchErrorKind::Network => FailureKind::Network,
            FetchErrorKind::InvalidRequest | FetchErrorKind::Decode => FailureKind::Unknown,
        };
        Self {
            kind,
            message: error.message().to_owned(),
        }
    }

    fn from_band_error(error: &BandError) -> Self {
        Self {
            kind: FailureKind::InsufficientData,
            message: error.to_string(),
        }
    }
}

/// Outcome for one input symbol. `symbol` is the original input form,
/// before any market suffix is applied.
#[derive(Debug, Clone)]
pub struct SymbolOutcome {
    pub symbol: Symbol,
    pub result: Result<BandResult, SymbolFailure>,
}

/// Outcomes for a whole run, one entry per input symbol in input order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub timeframe: Timeframe,
    pub outcomes: Vec<SymbolOutcome>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Drives paced, retried fetches and band computation over a symbol list.
pub struct BatchOrchestrator {
    config: BatchConfig,
    pacer: RequestPacer,
}

impl BatchOrchestrator {
    pub fn new(config: BatchConfig) -> Self {
        let pacer = RequestPacer::new(config.request_delay);
        Self { config, pacer }
    }

    /// Scan every symbol and return outcomes in input order.
    ///
    /// Failures are captured per symbol; the run itself only observes the
    /// counts it logs.
    pub async fn run(
        &self,
        source: &dyn MarketDataSource,
        symbols: &[Symbol],
        timeframe: Timeframe,
    ) -> BatchResult {
        let batch_size = self.config.batch_size.max(1);
        let total_batches = symbols.len().div_ceil(batch_size);

        info!(
            symbols = symbols.len(),
            batches = total_batches,
            timeframe = %timeframe,
            "starting batch scan"
        );

        let mut outcomes = Vec::with_capacity(symbols.len());
        for (batch_index, batch) in symbols.chunks(batch_size).enumerate() {
            debug!(
                batch = batch_index + 1,
                of = total_batches,
                size = batch.len(),
                "processing batch"
            );

            for symbol in batch {
                let result = self.process_symbol(source, symbol, timeframe).await;
                if let Err(failure) = &result {
                    warn!(
                        symbol = symbol.as_str(),
                        kind = ?failure.kind,
                        "symbol failed: {}",
                        failure.message
                    );
                }
                outcomes.push(SymbolOutcome {
                    symbol: symbol.clone(),
                    result,
                });
            }
        }

        let result = BatchResult {
            timeframe,
            outcomes,
        };
        info!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "batch scan finished"
        );
        result
    }

    async fn process_symbol(
        &self,
        source: &dyn MarketDataSource,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<BandResult, SymbolFailure> {
        let provider_symbol = symbol.with_market_suffix(NSE_SUFFIX);

        self.pacer.acquire().await;

        let series = self
            .fetch_with_retry(source, &provider_symbol, timeframe)
            .await
            .map_err(|e| SymbolFailure::from_fetch_error(&e))?;

        bands::compute(&series, &self.config.band_params)
            .map_err(|e| SymbolFailure::from_band_error(&e))
    }

    async fn fetch_with_retry(
        &self,
        source: &dyn MarketDataSource,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<crate::PriceSeries, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            let request = SeriesRequest::new(symbol.clone(), timeframe);
            match source.series(request).await {
                Ok(series) => return Ok(series),
                Err(error) => {
                    if !error.retryable() || attempt >= self.config.retry.max_retries {
                        return Err(error);
                    }
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    debug!(
                        symbol = symbol.as_str(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after {}",
                        error.message()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
