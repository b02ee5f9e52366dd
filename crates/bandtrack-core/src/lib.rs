//! # Bandtrack Core
//!
//! Core domain types and scan pipeline for the Bandtrack Bollinger Band
//! tracker.
//!
//! ## Overview
//!
//! This crate provides the foundational components for Bandtrack:
//!
//! - **Canonical domain models** for symbols, bars, and price series
//! - **Market data source trait** with a Yahoo Finance chart adapter
//! - **Band computation** over a 200-period rolling window
//! - **Batch orchestration** with pacing and per-symbol retries
//! - **Row assembly** for the spreadsheet layouts the tracker writes
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance chart API) |
//! | [`bands`] | Bollinger Band computation and signal classification |
//! | [`batch`] | Batched, paced, retried scans across symbol lists |
//! | [`data_source`] | Market data source trait and request/error types |
//! | [`domain`] | Domain models (Symbol, Bar, PriceSeries, Timeframe) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`pacing`] | Inter-request pacing |
//! | [`retry`] | Retry policy for transient fetch failures |
//! | [`rows`] | Worksheet row assembly |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bandtrack_core::{
//!     BatchConfig, BatchOrchestrator, Symbol, Timeframe, YahooAdapter,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = YahooAdapter::default();
//!     let orchestrator = BatchOrchestrator::new(BatchConfig::default());
//!     let symbols = vec![Symbol::parse("TCS").unwrap()];
//!
//!     let result = orchestrator.run(&source, &symbols, Timeframe::Daily).await;
//!     println!("{} of {} symbols scanned", result.succeeded(), result.len());
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result` types with structured errors.
//! Fetch errors carry a [`data_source::FetchErrorKind`] so callers can
//! distinguish retryable transport failures from bad requests.

pub mod adapters;
pub mod bands;
pub mod batch;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pacing;
pub mod retry;
pub mod rows;

// Re-export commonly used types at crate root for convenience

// Adapter implementations
pub use adapters::YahooAdapter;

// Band computation
pub use bands::{compute, BandError, BandParams, BandResult, Signal};

// Batch orchestration
pub use batch::{
    BatchConfig, BatchOrchestrator, BatchResult, FailureKind, SymbolFailure, SymbolOutcome,
};

// Data source trait and types
pub use data_source::{FetchError, FetchErrorKind, MarketDataSource, SeriesRequest};

// Domain models
pub use domain::{Bar, Category, PriceSeries, Symbol, Timeframe, UtcDateTime, NSE_SUFFIX};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Pacing
pub use pacing::RequestPacer;

// Retry logic
pub use retry::{Backoff, RetryConfig};

// Row assembly
pub use rows::{
    assemble, failure_marker, format_volume, parse_volume, DailyRow, HourlyRow, RowParseError,
    RowTable, DAILY_HEADERS, HOURLY_HEADERS,
};
