//! Google Sheets output.
//!
//! Each run replaces a whole worksheet: the old sheet is deleted, a fresh
//! one is added, and the banner plus rows are written in a single values
//! update. Header formatting is best effort; a worksheet with plain headers
//! is still a successful write.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use bandtrack_core::rows::RowTable;
use bandtrack_core::{Category, HttpAuth, HttpClient, HttpRequest, Timeframe};

use crate::error::SheetError;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_ENV: &str = "GSHEETS_ACCESS_TOKEN";

/// Output worksheet title for a category and timeframe.
pub fn worksheet_name(category: Category, timeframe: Timeframe) -> String {
    format!("{} {} BB", category.as_str(), timeframe.label())
}

/// Sink for assembled row tables.
pub trait SheetWriter: Send + Sync {
    /// Replaces the named worksheet with the table's banner, headers, and
    /// rows. Creates the worksheet if it does not exist yet.
    fn replace_worksheet<'a>(
        &'a self,
        worksheet: &'a str,
        table: &'a RowTable,
    ) -> Pin<Box<dyn Future<Output = Result<(), SheetError>> + Send + 'a>>;
}

/// Google Sheets v4 writer authenticated with a bearer access token.
pub struct GoogleSheetsWriter {
    http_client: Arc<dyn HttpClient>,
    spreadsheet_id: String,
    auth: HttpAuth,
}

impl GoogleSheetsWriter {
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

    /// Builds a writer with the access token taken from `GSHEETS_ACCESS_TOKEN`.
    pub fn from_env(
        http_client: Arc<dyn HttpClient>,
        spreadsheet_id: impl Into<String>,
    ) -> Result<Self, SheetError> {
        if http_client.is_mock() {
            return Ok(Self::new(http_client, spreadsheet_id, HttpAuth::None));
        }

        let token = std::env::var(TOKEN_ENV).map_err(|_| SheetError::MissingToken)?;
        Ok(Self::new(
            http_client,
            spreadsheet_id,
            HttpAuth::BearerToken(token),
        ))
    }

    async fn send(&self, request: HttpRequest) -> Result<String, SheetError> {
        let response = self
            .http_client
            .execute(request.with_auth(&self.auth))
            .await
            .map_err(|e| SheetError::Http(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(SheetError::Api {
                status: response.status,
                message: response.body.chars().take(200).collect(),
            });
        }
        Ok(response.body)
    }

    async fn lookup_sheet_id(&self, worksheet: &str) -> Result<Option<i64>, SheetError> {
        let url = format!(
            "{}/{}?fields=sheets.properties",
            SHEETS_BASE, self.spreadsheet_id
        );
        let body = self.send(HttpRequest::get(url)).await?;

        let meta: SpreadsheetMeta = serde_json::from_str(&body)
            .map_err(|e| SheetError::Decode(format!("spreadsheet metadata: {e}")))?;

        Ok(meta
            .sheets
            .iter()
            .find(|entry| entry.properties.title.as_deref() == Some(worksheet))
            .and_then(|entry| entry.properties.sheet_id))
    }

    /// Deletes the old worksheet (if any) and adds a fresh one in a single
    /// batch. Returns the new worksheet's sheet id when the API reports it.
    async fn recreate_worksheet(
        &self,
        worksheet: &str,
        existing: Option<i64>,
    ) -> Result<Option<i64>, SheetError> {
        let mut requests = Vec::new();
        if let Some(sheet_id) = existing {
            requests.push(json!({ "deleteSheet": { "sheetId": sheet_id } }));
        }
        requests.push(json!({
            "addSheet": {
                "properties": {
                    "title": worksheet,
                    "gridProperties": { "rowCount": 1000, "columnCount": 20 }
                }
            }
        }));

        let body = self
            .batch_update(json!({ "requests": requests }))
            .await?;

        let reply: BatchUpdateReply = serde_json::from_str(&body)
            .map_err(|e| SheetError::Decode(format!("batchUpdate reply: {e}")))?;

        Ok(reply
            .replies
            .iter()
            .find_map(|r| r.add_sheet.as_ref())
            .and_then(|added| added.properties.sheet_id))
    }

    async fn batch_update(&self, payload: serde_json::Value) -> Result<String, SheetError> {
        let url = format!("{}/{}:batchUpdate", SHEETS_BASE, self.spreadsheet_id);
        let request = HttpRequest::post(url)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string());
        self.send(request).await
    }

    async fn write_values(&self, worksheet: &str, table: &RowTable) -> Result<(), SheetError> {
        let mut values: Vec<Vec<String>> = Vec::with_capacity(table.rows.len() + 4);
        values.push(vec![table.title.clone()]);
        values.push(vec![format!(
            "Last Updated: {}",
            table.updated_at.format_ist_label()
        )]);
        values.push(Vec::new());
        values.push(table.headers.clone());
        values.extend(table.rows.iter().cloned());

        let range = urlencoding::encode(&format!("{worksheet}!A1")).into_owned();
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            SHEETS_BASE, self.spreadsheet_id, range
        );
        let request = HttpRequest::put(url)
            .with_header("content-type", "application/json")
            .with_body(json!({ "values": values }).to_string());

        self.send(request).await?;
        Ok(())
    }

    /// Paints the header row. Skipped when the add reply carried no sheet id,
    /// which is what the mock transport returns.
    async fn format_header(
        &self,
        worksheet: &str,
        sheet_id: Option<i64>,
        width: usize,
    ) -> Result<(), SheetError> {
        let Some(sheet_id) = sheet_id else {
            warn!(worksheet, "sheet id unknown, skipping header formatting");
            return Ok(());
        };

        let payload = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": 3,
                        "endRowIndex": 4,
                        "startColumnIndex": 0,
                        "endColumnIndex": width
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "backgroundColor": { "red": 0.2, "green": 0.4, "blue": 0.8 },
                            "textFormat": {
                                "bold": true,
                                "foregroundColor": { "red": 1.0, "green": 1.0, "blue": 1.0 }
                            }
                        }
                    },
                    "fields": "userEnteredFormat(backgroundColor,textFormat)"
                }
            }]
        });

        if let Err(error) = self.batch_update(payload).await {
            warn!(worksheet, "header formatting failed: {error}");
        }
        Ok(())
    }
}

impl SheetWriter for GoogleSheetsWriter {
    fn replace_worksheet<'a>(
        &'a self,
        worksheet: &'a str,
        table: &'a RowTable,
    ) -> Pin<Box<dyn Future<Output = Result<(), SheetError>> + Send + 'a>> {
        Box::pin(async move {
            let existing = self.lookup_sheet_id(worksheet).await?;
            debug!(worksheet, existing = ?existing, "recreating worksheet");

            let sheet_id = self.recreate_worksheet(worksheet, existing).await?;
            self.write_values(worksheet, table).await?;
            self.format_header(worksheet, sheet_id, table.width()).await?;
            Ok(())
        })
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Default, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: Option<i64>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateReply {
    #[serde(default)]
    replies: Vec<BatchReply>,
}

#[derive(Debug, Deserialize)]
struct BatchReply {
    #[serde(rename = "addSheet")]
    add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Deserialize)]
struct AddSheetReply {
    properties: SheetProperties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use bandtrack_core::http_client::{HttpError, HttpResponse};
    use bandtrack_core::{NoopHttpClient, UtcDateTime};

    fn sample_table() -> RowTable {
        RowTable {
            title: "Nifty50 Daily BB".to_owned(),
            updated_at: UtcDateTime::parse("2024-06-01T10:00:00Z").expect("timestamp"),
            headers: vec!["Stock".to_owned(), "Current Price".to_owned()],
            rows: vec![vec!["TCS".to_owned(), "3521.46".to_owned()]],
        }
    }

    /// Replays canned responses and records every request for assertions.
    struct ScriptedHttpClient {
        requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<Vec<HttpResponse>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            }
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move {
                self.requests.lock().expect("lock").push(request);
                let mut responses = self.responses.lock().expect("lock");
                if responses.is_empty() {
                    Ok(HttpResponse::ok_json("{}"))
                } else {
                    Ok(responses.remove(0))
                }
            })
        }
    }

    #[tokio::test]
    async fn replaces_an_existing_worksheet_end_to_end() {
        let meta = r#"{"sheets":[{"properties":{"sheetId":42,"title":"Nifty50 Daily BB"}}]}"#;
        let batch = r#"{"replies":[{},{"addSheet":{"properties":{"sheetId":77}}}]}"#;
        let client = Arc::new(ScriptedHttpClient::new(vec![
            HttpResponse::ok_json(meta),
            HttpResponse::ok_json(batch),
            HttpResponse::ok_json("{}"),
            HttpResponse::ok_json("{}"),
        ]));

        let writer = GoogleSheetsWriter::new(
            client.clone(),
            "sheet-1",
            HttpAuth::BearerToken("token".to_owned()),
        );
        writer
            .replace_worksheet("Nifty50 Daily BB", &sample_table())
            .await
            .expect("write succeeds");

        let requests = client.recorded();
        assert_eq!(requests.len(), 4);

        let recreate_body = requests[1].body.as_deref().expect("batch body");
        assert!(recreate_body.contains("deleteSheet"));
        assert!(recreate_body.contains("42"));
        assert!(recreate_body.contains("addSheet"));

        let values_body = requests[2].body.as_deref().expect("values body");
        assert!(values_body.contains("Nifty50 Daily BB"));
        assert!(values_body.contains("Last Updated: 2024-06-01 15:30:00 IST"));
        assert!(values_body.contains("3521.46"));

        let format_body = requests[3].body.as_deref().expect("format body");
        assert!(format_body.contains("repeatCell"));
        assert!(format_body.contains("77"));
    }

    #[tokio::test]
    async fn api_failure_status_surfaces_as_error() {
        let client = Arc::new(ScriptedHttpClient::new(vec![HttpResponse {
            status: 403,
            body: "forbidden".to_owned(),
        }]));
        let writer = GoogleSheetsWriter::new(client, "sheet-1", HttpAuth::None);

        let error = writer
            .replace_worksheet("Nifty50 Daily BB", &sample_table())
            .await
            .expect_err("must fail");
        assert!(matches!(error, SheetError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn mock_transport_completes_without_formatting() {
        let writer = GoogleSheetsWriter::from_env(Arc::new(NoopHttpClient), "sheet-1")
            .expect("mock writer needs no token");

        writer
            .replace_worksheet("Nifty50 Daily BB", &sample_table())
            .await
            .expect("mock write succeeds");
    }

    #[test]
    fn worksheet_names_follow_the_category_timeframe_template() {
        assert_eq!(
            worksheet_name(Category::Nifty50, Timeframe::Daily),
            "Nifty50 Daily BB"
        );
        assert_eq!(
            worksheet_name(Category::Midcap100, Timeframe::Hourly),
            "Midcap100 Hourly BB"
        );
    }
}
