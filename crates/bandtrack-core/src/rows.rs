//! Spreadsheet row assembly for scan results.
//!
//! Band snapshots become display rows here; failures become marker rows in
//! the same input position so the worksheet always mirrors the symbol list.

use thiserror::Error;

use crate::bands::{BandResult, Signal};
use crate::batch::{BatchResult, FailureKind};
use crate::domain::{Timeframe, UtcDateTime};

pub const DAILY_HEADERS: [&str; 9] = [
    "Stock",
    "Current Price",
    "Change %",
    "SMA(200)",
    "Upper Band",
    "Lower Band",
    "Signal",
    "Position",
    "Volume",
];

pub const HOURLY_HEADERS: [&str; 5] = [
    "Stock",
    "Current Price",
    "Lower Band",
    "SMA(200)",
    "Upper Band",
];

/// Placeholder cell used in marker rows.
const FILLER: &str = "-";

/// Errors raised when reading cells back into typed rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("expected {expected} cells, got {got}")]
    WrongWidth { got: usize, expected: usize },
    #[error("cell '{value}' in column '{column}' is not a number")]
    InvalidNumber { column: &'static str, value: String },
    #[error("unknown signal '{value}'")]
    InvalidSignal { value: String },
    #[error("unparseable volume '{value}'")]
    InvalidVolume { value: String },
    #[error("row for '{symbol}' is a failure marker: {marker}")]
    MarkerRow { symbol: String, marker: String },
}

/// A fully populated daily worksheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub stock: String,
    pub current_price: f64,
    pub change_pct: Option<f64>,
    pub sma: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub signal: Signal,
    pub position_pct: f64,
    pub volume: Option<u64>,
}

impl DailyRow {
    pub fn from_band_result(result: &BandResult) -> Self {
        Self {
            stock: result.symbol.clone(),
            current_price: result.current_price,
            change_pct: result.change_pct,
            sma: result.sma,
            upper_band: result.upper_band,
            lower_band: result.lower_band,
            signal: result.signal,
            position_pct: result.position_pct,
            volume: result.volume,
        }
    }

    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.stock.clone(),
            format!("{:.2}", self.current_price),
            self.change_pct
                .map(|c| format!("{c:.2}%"))
                .unwrap_or_else(|| FILLER.to_owned()),
            format!("{:.2}", self.sma),
            format!("{:.2}", self.upper_band),
            format!("{:.2}", self.lower_band),
            self.signal.label().to_owned(),
            format!("{:.1}%", self.position_pct),
            self.volume
                .map(format_volume)
                .unwrap_or_else(|| FILLER.to_owned()),
        ]
    }

    pub fn from_cells(cells: &[String]) -> Result<Self, RowParseError> {
        if cells.len() != DAILY_HEADERS.len() {
            return Err(RowParseError::WrongWidth {
                got: cells.len(),
                expected: DAILY_HEADERS.len(),
            });
        }
        reject_marker(&cells[0], &cells[1])?;

        let change_pct = if cells[2] == FILLER {
            None
        } else {
            Some(parse_pct(&cells[2], "Change %")?)
        };
        let volume = if cells[8] == FILLER {
            None
        } else {
            Some(parse_volume(&cells[8])?)
        };

        Ok(Self {
            stock: cells[0].clone(),
            current_price: parse_number(&cells[1], "Current Price")?,
            change_pct,
            sma: parse_number(&cells[3], "SMA(200)")?,
            upper_band: parse_number(&cells[4], "Upper Band")?,
            lower_band: parse_number(&cells[5], "Lower Band")?,
            signal: cells[6]
                .parse()
                .map_err(|_| RowParseError::InvalidSignal {
                    value: cells[6].clone(),
                })?,
            position_pct: parse_pct(&cells[7], "Position")?,
            volume,
        })
    }
}

/// A fully populated hourly worksheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub stock: String,
    pub current_price: f64,
    pub lower_band: f64,
    pub sma: f64,
    pub upper_band: f64,
}

impl HourlyRow {
    pub fn from_band_result(result: &BandResult) -> Self {
        Self {
            stock: result.symbol.clone(),
            current_price: result.current_price,
            lower_band: result.lower_band,
            sma: result.sma,
            upper_band: result.upper_band,
        }
    }

    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.stock.clone(),
            format!("{:.2}", self.current_price),
            format!("{:.2}", self.lower_band),
            format!("{:.2}", self.sma),
            format!("{:.2}", self.upper_band),
        ]
    }

    pub fn from_cells(cells: &[String]) -> Result<Self, RowParseError> {
        if cells.len() != HOURLY_HEADERS.len() {
            return Err(RowParseError::WrongWidth {
                got: cells.len(),
                expected: HOURLY_HEADERS.len(),
            });
        }
        reject_marker(&cells[0], &cells[1])?;

        Ok(Self {
            stock: cells[0].clone(),
            current_price: parse_number(&cells[1], "Current Price")?,
            lower_band: parse_number(&cells[2], "Lower Band")?,
            sma: parse_number(&cells[3], "SMA(200)")?,
            upper_band: parse_number(&cells[4], "Upper Band")?,
        })
    }
}

/// A ready-to-write table: banner metadata plus header and data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    pub title: String,
    pub updated_at: UtcDateTime,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// Marker text shown in place of the price cell when a symbol failed.
pub fn failure_marker(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Empty => "No Data",
        FailureKind::InsufficientData => "Insufficient Data",
        FailureKind::Network | FailureKind::Unknown => "Error",
    }
}

fn marker_row(symbol: &str, marker: &str, width: usize) -> Vec<String> {
    let mut cells = Vec::with_capacity(width);
    cells.push(symbol.to_owned());
    cells.push(marker.to_owned());
    cells.resize(width, FILLER.to_owned());
    cells
}

/// Turn a batch scan into a table, keeping every input symbol in position.
pub fn assemble(batch: &BatchResult, title: &str, generated_at: UtcDateTime) -> RowTable {
    let headers: Vec<String> = match batch.timeframe {
        Timeframe::Daily => DAILY_HEADERS.iter().map(|h| (*h).to_owned()).collect(),
        Timeframe::Hourly => HOURLY_HEADERS.iter().map(|h| (*h).to_owned()).collect(),
    };
    let width = headers.len();

    let rows = batch
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(result) => match batch.timeframe {
                Timeframe::Daily => DailyRow::from_band_result(result).to_cells(),
                Timeframe::Hourly => HourlyRow::from_band_result(result).to_cells(),
            },
            Err(failure) => marker_row(
                outcome.symbol.display_symbol(),
                failure_marker(failure.kind),
                width,
            ),
        })
        .collect();

    RowTable {
        title: title.to_owned(),
        updated_at: generated_at,
        headers,
        rows,
    }
}

/// Indian-market volume shorthand: crores, lakhs, thousands.
pub fn format_volume(volume: u64) -> String {
    let v = volume as f64;
    if v >= 1e7 {
        format!("{:.2} Cr", v / 1e7)
    } else if v >= 1e5 {
        format!("{:.2} L", v / 1e5)
    } else if v >= 1e3 {
        format!("{:.2} K", v / 1e3)
    } else {
        volume.to_string()
    }
}

/// Inverse of [`format_volume`], up to the two decimals it keeps.
pub fn parse_volume(value: &str) -> Result<u64, RowParseError> {
    let invalid = || RowParseError::InvalidVolume {
        value: value.to_owned(),
    };

    let trimmed = value.trim();
    let (number, scale) = if let Some(n) = trimmed.strip_suffix("Cr") {
        (n, 1e7)
    } else if let Some(n) = trimmed.strip_suffix('L') {
        (n, 1e5)
    } else if let Some(n) = trimmed.strip_suffix('K') {
        (n, 1e3)
    } else {
        (trimmed, 1.0)
    };

    let parsed: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(invalid());
    }
    Ok((parsed * scale).round() as u64)
}

fn reject_marker(symbol: &str, price_cell: &str) -> Result<(), RowParseError> {
    if matches!(price_cell, "No Data" | "Insufficient Data" | "Error") {
        return Err(RowParseError::MarkerRow {
            symbol: symbol.to_owned(),
            marker: price_cell.to_owned(),
        });
    }
    Ok(())
}

fn parse_number(value: &str, column: &'static str) -> Result<f64, RowParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| RowParseError::InvalidNumber {
            column,
            value: value.to_owned(),
        })
}

fn parse_pct(value: &str, column: &'static str) -> Result<f64, RowParseError> {
    parse_number(value.trim().trim_end_matches('%'), column)
}
