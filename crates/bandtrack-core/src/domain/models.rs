use serde::{Deserialize, Serialize};

use crate::{Symbol, Timeframe, UtcDateTime, ValidationError};

/// OHLCV bar record for a given interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Ordered price/volume history for one symbol and timeframe.
///
/// Bars are strictly ascending by timestamp; the constructor enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(
        symbol: Symbol,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, ValidationError> {
        for pair in bars.windows(2) {
            if pair[1].ts <= pair[0].ts {
                return Err(ValidationError::UnorderedSeries);
            }
        }

        Ok(Self {
            symbol,
            timeframe,
            bars,
        })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Whether the series holds at least `period` points.
    pub fn is_sufficient(&self, period: usize) -> bool {
        self.bars.len() >= period
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close of the bar before the most recent one.
    pub fn previous_close(&self) -> Option<f64> {
        let len = self.bars.len();
        if len < 2 {
            return None;
        }
        Some(self.bars[len - 2].close)
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("timestamp")
    }

    #[test]
    fn rejects_invalid_bar_bounds() {
        let err = Bar::new(ts("2024-01-01T00:00:00Z"), 10.0, 12.0, 9.0, 12.5, Some(10))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_unordered_series() {
        let symbol = Symbol::parse("TCS").expect("valid symbol");
        let first = Bar::new(ts("2024-01-02T00:00:00Z"), 10.0, 11.0, 9.0, 10.5, None)
            .expect("valid bar");
        let second = Bar::new(ts("2024-01-01T00:00:00Z"), 10.0, 11.0, 9.0, 10.5, None)
            .expect("valid bar");

        let err = PriceSeries::new(symbol, Timeframe::Daily, vec![first, second])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::UnorderedSeries));
    }

    #[test]
    fn previous_close_needs_two_bars() {
        let symbol = Symbol::parse("TCS").expect("valid symbol");
        let only = Bar::new(ts("2024-01-01T00:00:00Z"), 10.0, 11.0, 9.0, 10.5, None)
            .expect("valid bar");
        let series =
            PriceSeries::new(symbol, Timeframe::Daily, vec![only]).expect("valid series");

        assert!(series.previous_close().is_none());
    }
}
