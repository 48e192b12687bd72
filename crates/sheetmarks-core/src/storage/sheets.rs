//! Google Sheets worksheet
//!
//! Talks to the Sheets v4 REST API with a blocking HTTP client. Reads and
//! appends go through the `values` endpoints; deleting a row needs the
//! worksheet's numeric sheet id, which is looked up once and kept.
//!
//! Authentication is a bearer access token obtained elsewhere (for example
//! from a service account); this module only attaches it.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::error::{StoreError, StoreResult};
use super::worksheet::Worksheet;
use crate::config::Config;

/// Connection settings for one worksheet
#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub api_url: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl SheetsSettings {
    /// Take settings from the configuration
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(StoreError::SpreadsheetNotConfigured)?;

        Ok(Self {
            api_url: config.api_url.clone(),
            spreadsheet_id,
            worksheet: config.worksheet.clone(),
            access_token: config.access_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

/// A worksheet tab inside a Google spreadsheet
pub struct SheetsWorksheet {
    client: Client,
    api_url: Url,
    spreadsheet_id: String,
    worksheet: String,
    access_token: Option<String>,
    sheet_id: Option<i64>,
}

impl SheetsWorksheet {
    pub fn new(settings: SheetsSettings) -> StoreResult<Self> {
        let api_url = Url::parse(&settings.api_url).map_err(|e| {
            StoreError::unavailable(format!("invalid api_url '{}': {}", settings.api_url, e))
        })?;
        if api_url.cannot_be_a_base() {
            return Err(StoreError::unavailable(format!(
                "invalid api_url '{}': not a base URL",
                settings.api_url
            )));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("sheetmarks/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url,
            spreadsheet_id: settings.spreadsheet_id,
            worksheet: settings.worksheet,
            access_token: settings.access_token,
            sheet_id: None,
        })
    }

    /// Open the worksheet named in the configuration
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::new(SheetsSettings::from_config(config)?)
    }

    /// The configured tab name
    pub fn worksheet_name(&self) -> &str {
        &self.worksheet
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET` target for every value in the tab
    fn values_url(&self) -> Url {
        let range = a1_range(&self.worksheet);
        self.endpoint(&["spreadsheets", &self.spreadsheet_id, "values", &range])
    }

    /// `POST` target that appends rows below the tab's data
    fn append_url(&self) -> Url {
        let range = format!("{}:append", a1_range(&self.worksheet));
        let mut url = self.endpoint(&["spreadsheets", &self.spreadsheet_id, "values", &range]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        url
    }

    /// `GET` target listing the spreadsheet's tabs
    fn metadata_url(&self) -> Url {
        let mut url = self.endpoint(&["spreadsheets", &self.spreadsheet_id]);
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        url
    }

    /// `POST` target for structural edits
    fn batch_update_url(&self) -> Url {
        let target = format!("{}:batchUpdate", self.spreadsheet_id);
        self.endpoint(&["spreadsheets", &target])
    }

    /// Send a request and return the body of a successful response
    fn execute(&self, request: RequestBuilder) -> StoreResult<String> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_failure(status.as_u16(), &body, &self.worksheet))
        }
    }

    /// Numeric id of the configured tab, looked up on first use
    fn resolve_sheet_id(&mut self) -> StoreResult<i64> {
        if let Some(id) = self.sheet_id {
            return Ok(id);
        }

        let body = self.execute(self.client.get(self.metadata_url()))?;
        let id = parse_sheet_id(&body, &self.worksheet)?;
        debug!("Resolved worksheet '{}' to sheet id {}", self.worksheet, id);
        self.sheet_id = Some(id);
        Ok(id)
    }
}

impl Worksheet for SheetsWorksheet {
    fn read_rows(&self) -> StoreResult<Vec<Vec<String>>> {
        let url = self.values_url();
        debug!("GET {}", url);
        let body = self.execute(self.client.get(url))?;
        parse_value_range(&body)
    }

    fn append_row(&mut self, row: Vec<String>) -> StoreResult<()> {
        let url = self.append_url();
        debug!("POST {}", url);
        self.execute(self.client.post(url).json(&json!({ "values": [row] })))?;
        Ok(())
    }

    fn delete_row(&mut self, physical_row: usize) -> StoreResult<()> {
        if physical_row == 0 {
            return Err(StoreError::unavailable("row numbers start at 1"));
        }

        let sheet_id = self.resolve_sheet_id()?;
        let url = self.batch_update_url();
        debug!("POST {} (delete row {})", url, physical_row);
        self.execute(
            self.client
                .post(url)
                .json(&delete_row_request(sheet_id, physical_row)),
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "worksheet '{}' of spreadsheet {}",
            self.worksheet, self.spreadsheet_id
        )
    }
}

/// A1 notation covering a whole tab, quoted so any name is accepted
fn a1_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// `batchUpdate` body removing one 1-based row
fn delete_row_request(sheet_id: i64, physical_row: usize) -> Value {
    json!({
        "requests": [{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": physical_row - 1,
                    "endIndex": physical_row
                }
            }
        }]
    })
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Parse a `values.get` response into rows of text
fn parse_value_range(body: &str) -> StoreResult<Vec<Vec<String>>> {
    let range: ValueRange =
        serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse {
            details: e.to_string(),
        })?;

    Ok(range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Find a tab's numeric id in a spreadsheet metadata response
fn parse_sheet_id(body: &str, worksheet: &str) -> StoreResult<i64> {
    let meta: SpreadsheetMeta =
        serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse {
            details: e.to_string(),
        })?;

    meta.sheets
        .into_iter()
        .find(|s| s.properties.title == worksheet)
        .map(|s| s.properties.sheet_id)
        .ok_or_else(|| StoreError::WorksheetNotFound {
            worksheet: worksheet.to_string(),
            details: "no tab with that name".to_string(),
        })
}

/// Map a failed response to a store error
fn classify_failure(status: u16, body: &str, worksheet: &str) -> StoreError {
    let details = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status {
        401 | 403 => StoreError::PermissionDenied { status, details },
        404 => StoreError::WorksheetNotFound {
            worksheet: worksheet.to_string(),
            details,
        },
        400 if details.contains("Unable to parse range") => StoreError::WorksheetNotFound {
            worksheet: worksheet.to_string(),
            details,
        },
        _ => StoreError::Unavailable {
            reason: format!("HTTP {}: {}", status, details),
        },
    }
}
