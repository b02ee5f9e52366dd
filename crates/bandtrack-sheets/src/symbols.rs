//! Symbol list sources.
//!
//! Watchlists live in per-category worksheets of the same spreadsheet the
//! tracker writes to. A static in-memory source backs mock runs and tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use bandtrack_core::{Category, HttpAuth, HttpClient, HttpRequest, Symbol};

use crate::error::SheetError;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Supplies the symbols to scan for a category.
pub trait SymbolSource: Send + Sync {
    fn list_symbols<'a>(
        &'a self,
        category: Category,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Symbol>, SheetError>> + Send + 'a>>;
}

/// Reads symbols from column A of the category's worksheet, skipping the
/// header row. Unparseable cells are logged and dropped rather than failing
/// the whole list.
pub struct SheetSymbolSource {
    http_client: Arc<dyn HttpClient>,
    spreadsheet_id: String,
    auth: HttpAuth,
}

impl SheetSymbolSource {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        spreadsheet_id: impl Into<String>,
        auth: HttpAuth,
    ) -> Self {
        Self {
            http_client,
            spreadsheet_id: spreadsheet_id.into(),
            auth,
        }
    }
}

impl SymbolSource for SheetSymbolSource {
    fn list_symbols<'a>(
        &'a self,
        category: Category,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Symbol>, SheetError>> + Send + 'a>> {
        Box::pin(async move {
            let range = urlencoding::encode(&format!("{}!A2:A1000", category.as_str())).into_owned();
            let url = format!(
                "{}/{}/values/{}",
                SHEETS_BASE, self.spreadsheet_id, range
            );

            let response = self
                .http_client
                .execute(HttpRequest::get(url).with_auth(&self.auth))
                .await
                .map_err(|e| SheetError::Http(e.message().to_owned()))?;

            if !response.is_success() {
                return Err(SheetError::Api {
                    status: response.status,
                    message: response.body.chars().take(200).collect(),
                });
            }

            let value_range: ValueRange = serde_json::from_str(&response.body)
                .map_err(|e| SheetError::Decode(format!("value range: {e}")))?;

            let mut symbols = Vec::new();
            for row in value_range.values {
                let Some(cell) = row.first() else { continue };
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match Symbol::parse(&trimmed.to_ascii_uppercase()) {
                    Ok(symbol) => symbols.push(symbol),
                    Err(error) => {
                        warn!(category = %category, cell = trimmed, "skipping symbol: {error}");
                    }
                }
            }
            Ok(symbols)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Fixed in-memory watchlists for mock runs and tests.
pub struct StaticSymbolSource {
    lists: BTreeMap<Category, Vec<Symbol>>,
}

impl StaticSymbolSource {
    pub fn new() -> Self {
        Self {
            lists: BTreeMap::new(),
        }
    }

    pub fn with_list(mut self, category: Category, symbols: Vec<Symbol>) -> Self {
        self.lists.insert(category, symbols);
        self
    }

    /// Small representative watchlists per category.
    pub fn mock_defaults() -> Self {
        fn parse_all(names: &[&str]) -> Vec<Symbol> {
            names
                .iter()
                .filter_map(|name| Symbol::parse(name).ok())
                .collect()
        }

        Self::new()
            .with_list(
                Category::Nifty50,
                parse_all(&["RELIANCE", "TCS", "HDFCBANK", "INFY", "ICICIBANK"]),
            )
            .with_list(
                Category::Smallcap100,
                parse_all(&["CDSL", "BSE", "IEX", "KPITTECH"]),
            )
            .with_list(
                Category::Midcap100,
                parse_all(&["PERSISTENT", "POLYCAB", "ASTRAL", "CUMMINSIND"]),
            )
    }
}

impl Default for StaticSymbolSource {
    fn default() -> Self {
        Self::mock_defaults()
    }
}

impl SymbolSource for StaticSymbolSource {
    fn list_symbols<'a>(
        &'a self,
        category: Category,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Symbol>, SheetError>> + Send + 'a>> {
        let symbols = self.lists.get(&category).cloned().unwrap_or_default();
        Box::pin(async move { Ok(symbols) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandtrack_core::http_client::{HttpError, HttpResponse};

    struct OneShotClient {
        body: String,
    }

    impl HttpClient for OneShotClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move { Ok(HttpResponse::ok_json(self.body.clone())) })
        }
    }

    #[tokio::test]
    async fn parses_column_values_and_skips_bad_cells() {
        let body = r#"{"values":[["tcs"],["  INFY  "],[""],["9BAD"],["RELIANCE"]]}"#;
        let source = SheetSymbolSource::new(
            Arc::new(OneShotClient {
                body: body.to_owned(),
            }),
            "sheet-1",
            HttpAuth::None,
        );

        let symbols = source
            .list_symbols(Category::Nifty50)
            .await
            .expect("list succeeds");

        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["TCS", "INFY", "RELIANCE"]);
    }

    #[tokio::test]
    async fn missing_values_key_yields_an_empty_list() {
        let source = SheetSymbolSource::new(
            Arc::new(OneShotClient {
                body: "{}".to_owned(),
            }),
            "sheet-1",
            HttpAuth::None,
        );

        let symbols = source
            .list_symbols(Category::Midcap100)
            .await
            .expect("list succeeds");
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn static_source_serves_defaults_per_category() {
        let source = StaticSymbolSource::mock_defaults();

        for category in Category::ALL {
            let symbols = source.list_symbols(category).await.expect("list succeeds");
            assert!(!symbols.is_empty());
        }
    }
}
