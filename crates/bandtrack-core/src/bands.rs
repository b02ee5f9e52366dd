//! Bollinger Band computation and signal classification.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PriceSeries, ValidationError};

/// Band window parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParams {
    /// Rolling window length in bars.
    pub period: usize,
    /// Standard-deviation multiplier for the band width.
    pub num_std: f64,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            period: 200,
            num_std: 2.0,
        }
    }
}

/// Band computation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BandError {
    #[error("insufficient data: got {got} points, need {need}")]
    InsufficientData { got: usize, need: usize },
}

/// Position-derived classification of the current price within the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Overbought,
    NearUpper,
    Neutral,
    NearLower,
    Oversold,
}

impl Signal {
    /// Classify a band position percentage.
    ///
    /// Thresholds are strict and evaluated in order, so the boundaries fall
    /// as: exactly 95 is NearUpper, exactly 80 is Neutral, exactly 5 is
    /// NearLower, exactly 20 is Neutral.
    pub fn from_position(position_pct: f64) -> Self {
        if position_pct > 95.0 {
            Self::Overbought
        } else if position_pct > 80.0 {
            Self::NearUpper
        } else if position_pct < 5.0 {
            Self::Oversold
        } else if position_pct < 20.0 {
            Self::NearLower
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overbought => "Overbought",
            Self::NearUpper => "Near Upper",
            Self::Neutral => "Neutral",
            Self::NearLower => "Near Lower",
            Self::Oversold => "Oversold",
        }
    }

    /// Worksheet cell label, with the colored-dot prefix the sheet readers
    /// are used to.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overbought => "🔴 Overbought",
            Self::NearUpper => "🟡 Near Upper",
            Self::Neutral => "⚪ Neutral",
            Self::NearLower => "🟡 Near Lower",
            Self::Oversold => "🟢 Oversold",
        }
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = ValidationError;

    /// Accepts both plain names and the labeled cell form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value
            .trim_start_matches(['🔴', '🟡', '🟢', '⚪'])
            .trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "overbought" => Ok(Self::Overbought),
            "near upper" => Ok(Self::NearUpper),
            "neutral" => Ok(Self::Neutral),
            "near lower" => Ok(Self::NearLower),
            "oversold" => Ok(Self::Oversold),
            _ => Err(ValidationError::InvalidSignal {
                value: value.to_owned(),
            }),
        }
    }
}

/// Per-symbol band snapshot. Computed fresh each run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandResult {
    /// Display form of the ticker, without the market suffix.
    pub symbol: String,
    pub current_price: f64,
    /// Day-over-day change; only rendered for daily rows.
    pub change_pct: Option<f64>,
    pub sma: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub signal: Signal,
    pub position_pct: f64,
    /// Most recent bar volume; only rendered for daily rows.
    pub volume: Option<u64>,
}

/// Compute the Bollinger Band snapshot over the most recent `period` closes.
///
/// The standard deviation is the sample standard deviation (ddof = 1) of the
/// window, matching the reference tracker's rolling statistics. Pure function
/// of the series and parameters.
pub fn compute(series: &PriceSeries, params: &BandParams) -> Result<BandResult, BandError> {
    if !series.is_sufficient(params.period) {
        return Err(BandError::InsufficientData {
            got: series.len(),
            need: params.period,
        });
    }

    let closes: Vec<f64> = series.closes().collect();
    let window = &closes[closes.len() - params.period..];
    let n = window.len() as f64;

    let sma = window.iter().sum::<f64>() / n;
    let variance = if window.len() > 1 {
        window.iter().map(|c| (c - sma).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    let std_dev = variance.sqrt();

    let upper_band = sma + params.num_std * std_dev;
    let lower_band = sma - params.num_std * std_dev;

    let current_price = *window.last().unwrap_or(&sma);

    // Zero-variance window: the bands collapse onto the SMA, so the position
    // is pinned to the midpoint instead of dividing by zero.
    let (position_pct, signal) = if upper_band == lower_band {
        (50.0, Signal::Neutral)
    } else {
        let position = (current_price - lower_band) / (upper_band - lower_band) * 100.0;
        (position, Signal::from_position(position))
    };

    let change_pct = series
        .previous_close()
        .filter(|prev| *prev != 0.0)
        .map(|prev| (current_price - prev) / prev * 100.0);

    let volume = series.last().and_then(|bar| bar.volume);

    Ok(BandResult {
        symbol: series.symbol.display_symbol().to_owned(),
        current_price,
        change_pct,
        sma,
        upper_band,
        lower_band,
        signal,
        position_pct,
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, Symbol, Timeframe, UtcDateTime};
    use time::Duration;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let symbol = Symbol::parse("TCS.NS").expect("valid symbol");
        let start = UtcDateTime::parse("2023-01-01T00:00:00Z")
            .expect("timestamp")
            .into_inner();

        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = UtcDateTime::from_offset_datetime(start + Duration::days(i as i64))
                    .expect("UTC timestamp");
                Bar::new(ts, close, close + 1.0, (close - 1.0).max(0.0), close, Some(100))
                    .expect("valid bar")
            })
            .collect();

        PriceSeries::new(symbol, Timeframe::Daily, bars).expect("valid series")
    }

    #[test]
    fn constant_series_collapses_bands_and_stays_neutral() {
        let series = series_from_closes(&vec![250.0; 200]);
        let result = compute(&series, &BandParams::default()).expect("computes");

        assert_eq!(result.sma, 250.0);
        assert_eq!(result.upper_band, 250.0);
        assert_eq!(result.lower_band, 250.0);
        assert_eq!(result.signal, Signal::Neutral);
        assert_eq!(result.position_pct, 50.0);
    }

    #[test]
    fn short_series_fails_with_insufficient_data() {
        let series = series_from_closes(&vec![100.0; 199]);
        let err = compute(&series, &BandParams::default()).expect_err("must fail");
        assert_eq!(err, BandError::InsufficientData { got: 199, need: 200 });
    }

    #[test]
    fn window_uses_only_the_most_recent_period_closes() {
        // 100 stale closes at 10.0 followed by 200 at 20.0; the stale ones
        // must not influence the SMA.
        let mut closes = vec![10.0; 100];
        closes.extend(std::iter::repeat(20.0).take(200));
        let series = series_from_closes(&closes);

        let result = compute(&series, &BandParams::default()).expect("computes");
        assert_eq!(result.sma, 20.0);
    }

    #[test]
    fn signal_boundaries_follow_strict_thresholds() {
        assert_eq!(Signal::from_position(95.001), Signal::Overbought);
        assert_eq!(Signal::from_position(95.0), Signal::NearUpper);
        assert_eq!(Signal::from_position(94.999), Signal::NearUpper);

        assert_eq!(Signal::from_position(80.001), Signal::NearUpper);
        assert_eq!(Signal::from_position(80.0), Signal::Neutral);

        assert_eq!(Signal::from_position(20.0), Signal::Neutral);
        assert_eq!(Signal::from_position(19.999), Signal::NearLower);

        assert_eq!(Signal::from_position(5.0), Signal::NearLower);
        assert_eq!(Signal::from_position(4.999), Signal::Oversold);
    }

    #[test]
    fn signal_round_trips_from_labels() {
        for signal in [
            Signal::Overbought,
            Signal::NearUpper,
            Signal::Neutral,
            Signal::NearLower,
            Signal::Oversold,
        ] {
            assert_eq!(signal.label().parse::<Signal>().expect("parses"), signal);
            assert_eq!(signal.as_str().parse::<Signal>().expect("parses"), signal);
        }
    }

    #[test]
    fn change_pct_uses_previous_close() {
        let mut closes = vec![100.0; 200];
        *closes.last_mut().expect("non-empty") = 110.0;
        let series = series_from_closes(&closes);

        let result = compute(&series, &BandParams::default()).expect("computes");
        let change = result.change_pct.expect("has previous close");
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sample_std_dev_matches_hand_computation() {
        // Window [1, 2, 3, 4] with period 4: mean 2.5, sample variance
        // (2.25+0.25+0.25+2.25)/3 = 5/3.
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let params = BandParams {
            period: 4,
            num_std: 2.0,
        };

        let result = compute(&series, &params).expect("computes");
        let expected_std = (5.0_f64 / 3.0).sqrt();
        assert!((result.upper_band - (2.5 + 2.0 * expected_std)).abs() < 1e-9);
        assert!((result.lower_band - (2.5 - 2.0 * expected_std)).abs() < 1e-9);
    }
}
