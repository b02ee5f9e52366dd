use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Duration;

use crate::data_source::{FetchError, MarketDataSource, SeriesRequest};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{Bar, PriceSeries, Symbol, Timeframe, UtcDateTime, ValidationError};

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart adapter supporting both real API calls and mock mode.
///
/// Mock mode serves deterministic seeded series so tests and `--mock` runs
/// never touch the network.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            use_real_api: false,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            use_real_api,
        }
    }
}

impl MarketDataSource for YahooAdapter {
    fn series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_series(&req).await
            } else {
                self.fetch_fake_series(&req)
            }
        })
    }
}

impl YahooAdapter {
    async fn fetch_real_series(&self, req: &SeriesRequest) -> Result<PriceSeries, FetchError> {
        let period2 = UtcDateTime::now().unix_timestamp();
        let period1 = period2 - req.timeframe.lookback_days() * 86_400;

        let endpoint = format!(
            "{}/{}?period1={}&period2={}&interval={}",
            CHART_BASE,
            urlencoding::encode(req.symbol.as_str()),
            period1,
            period2,
            req.timeframe.interval_param(),
        );

        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(10_000);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| FetchError::network(format!("yahoo transport error: {}", e.message())))?;

        if !response.is_success() {
            return Err(FetchError::network(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart_response(&response.body, &req.symbol, req.timeframe)
    }

    /// Deterministic fake series for tests and mock runs. The seeded walk
    /// always spans enough points for a 200-period window on both timeframes.
    fn fetch_fake_series(&self, req: &SeriesRequest) -> Result<PriceSeries, FetchError> {
        let count = match req.timeframe {
            Timeframe::Daily => 260,
            Timeframe::Hourly => 280,
        };

        let step = match req.timeframe {
            Timeframe::Daily => Duration::days(1),
            Timeframe::Hourly => Duration::hours(1),
        };

        let now = UtcDateTime::now().into_inner();
        let seed = symbol_seed(&req.symbol);
        let mut bars = Vec::with_capacity(count);

        for index in 0..count {
            let offset = step * (count.saturating_sub(index + 1) as i32);
            let ts = UtcDateTime::from_offset_datetime(now - offset).map_err(validation_to_error)?;
            let base = 900.0 + ((seed + index as u64) % 350) as f64 / 10.0;

            let bar = Bar::new(
                ts,
                base,
                base + 12.0,
                base - 8.0,
                base + 3.0,
                Some(20_000 + (index as u64) * 25),
            )
            .map_err(validation_to_error)?;
            bars.push(bar);
        }

        PriceSeries::new(req.symbol.clone(), req.timeframe, bars).map_err(validation_to_error)
    }
}

fn parse_chart_response(
    body: &str,
    symbol: &Symbol,
    timeframe: Timeframe,
) -> Result<PriceSeries, FetchError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(format!("failed to parse yahoo chart: {}", e)))?;

    if let Some(error) = &chart_response.chart.error {
        if !error.is_null() {
            return Err(FetchError::network(format!("yahoo chart API error: {error}")));
        }
    }

    let result = chart_response
        .chart
        .result
        .as_ref()
        .and_then(|results| results.first())
        .ok_or_else(|| FetchError::empty(symbol))?;

    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| FetchError::empty(symbol))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts_value) in timestamps.iter().enumerate() {
        // Yahoo pads halted sessions with null OHLC slots; skip them.
        let (open, high, low, close) = match (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        ) {
            (Some(open), Some(high), Some(low), Some(close)) => (open, high, low, close),
            _ => continue,
        };

        let ts = UtcDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| FetchError::decode(format!("invalid timestamp: {e}")))?;
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());

        if let Ok(bar) = Bar::new(ts, open, high, low, close, volume) {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(FetchError::empty(symbol));
    }

    PriceSeries::new(symbol.clone(), timeframe, bars).map_err(validation_to_error)
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> FetchError {
    FetchError::decode(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::FetchErrorKind;

    #[tokio::test]
    async fn mock_mode_serves_enough_points_for_the_default_window() {
        let adapter = YahooAdapter::default();
        let symbol = Symbol::parse("RELIANCE.NS").expect("valid symbol");

        for timeframe in Timeframe::ALL {
            let series = adapter
                .series(SeriesRequest::new(symbol.clone(), timeframe))
                .await
                .expect("mock fetch succeeds");
            assert!(series.is_sufficient(200));
        }
    }

    #[tokio::test]
    async fn mock_series_is_deterministic_per_symbol() {
        let adapter = YahooAdapter::default();
        let symbol = Symbol::parse("INFY.NS").expect("valid symbol");
        let req = SeriesRequest::new(symbol, Timeframe::Daily);

        let first = adapter.series(req.clone()).await.expect("fetch");
        let second = adapter.series(req).await.expect("fetch");

        let first_closes: Vec<f64> = first.closes().collect();
        let second_closes: Vec<f64> = second.closes().collect();
        assert_eq!(first_closes, second_closes);
    }

    #[test]
    fn parses_chart_payload_and_skips_null_slots() {
        let symbol = Symbol::parse("TCS.NS").expect("valid symbol");
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, null, 102.0],
                            "high": [105.0, null, 107.0],
                            "low": [99.0, null, 101.0],
                            "close": [104.0, null, 106.0],
                            "volume": [1000, null, 1200]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let series =
            parse_chart_response(body, &symbol, Timeframe::Daily).expect("payload parses");
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().map(|bar| bar.close), Some(106.0));
    }

    #[test]
    fn empty_chart_result_maps_to_empty_error() {
        let symbol = Symbol::parse("TCS.NS").expect("valid symbol");
        let body = r#"{"chart": {"result": null, "error": null}}"#;

        let error =
            parse_chart_response(body, &symbol, Timeframe::Daily).expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::Empty);
    }
}
