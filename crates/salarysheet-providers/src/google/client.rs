//! Google Sheets API v4 client.
//!
//! Low-level HTTP calls only: request building, status handling and
//! response parsing. Authentication is passed in as a bearer token.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// How written values are interpreted; `USER_ENTERED` parses numbers and
/// formulas as if typed into the UI.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Google Sheets API client.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl SheetsClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            api_base: api_base.into(),
        })
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.api_base,
            urlencoding::encode(spreadsheet_id)
        )
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// Reads a range. Every cell is returned as its formatted string.
    pub async fn get_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> ProviderResult<Vec<Vec<String>>> {
        let request = self
            .http_client
            .get(self.values_url(spreadsheet_id, range))
            .bearer_auth(access_token);

        let value_range: ValueRange = send_json(request, "values.get").await?;
        let rows = value_range.into_string_rows();
        debug!(range, rows = rows.len(), "read sheet values");
        Ok(rows)
    }

    /// Lists the tabs of a spreadsheet.
    pub async fn list_sheets(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
    ) -> ProviderResult<Vec<SheetProperties>> {
        let request = self
            .http_client
            .get(self.spreadsheet_url(spreadsheet_id))
            .bearer_auth(access_token)
            .query(&[("fields", "sheets(properties(sheetId,title))")]);

        let spreadsheet: Spreadsheet = send_json(request, "spreadsheets.get").await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .collect())
    }

    /// Applies structural changes to a spreadsheet.
    pub async fn batch_update(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        requests: Vec<SheetRequest>,
    ) -> ProviderResult<BatchUpdateResponse> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url(spreadsheet_id));
        let request = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(&BatchUpdateRequest { requests });

        send_json(request, "spreadsheets.batchUpdate").await
    }

    /// Overwrites a range with `values`.
    pub async fn update_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> ProviderResult<UpdateValuesResponse> {
        let body = ValueRange {
            range: Some(range.to_string()),
            values: Some(values),
        };
        let request = self
            .http_client
            .put(self.values_url(spreadsheet_id, range))
            .bearer_auth(access_token)
            .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
            .json(&body);

        send_json(request, "values.update").await
    }
}

/// Sends a request and decodes a JSON success body.
async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    operation: &str,
) -> ProviderResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_request(operation, e))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ProviderError::network(format!("{}: failed to read response: {}", operation, e))
    })?;

    if !status.is_success() {
        return Err(ProviderError::from_status(status, &body).context(operation));
    }

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response(format!("{}: failed to parse response: {}", operation, e))
    })
}

/// A range of cell values, as read and written by the values API.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    /// Absent when the range is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Vec<Value>>>,
}

impl ValueRange {
    fn into_string_rows(self) -> Vec<Vec<String>> {
        self.values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

/// Identity of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
}

/// One structural change in a `batchUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetRequest {
    DeleteSheet {
        #[serde(rename = "sheetId")]
        sheet_id: i64,
    },
    AddSheet { properties: NewSheetProperties },
}

impl SheetRequest {
    pub fn delete(sheet_id: i64) -> Self {
        Self::DeleteSheet { sheet_id }
    }

    pub fn add(title: impl Into<String>) -> Self {
        Self::AddSheet {
            properties: NewSheetProperties {
                title: title.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSheetProperties {
    pub title: String,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest {
    requests: Vec<SheetRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<BatchUpdateReply>,
}

impl BatchUpdateResponse {
    /// The id of the tab created by the first `addSheet` reply.
    pub fn added_sheet_id(&self) -> Option<i64> {
        self.replies
            .iter()
            .find_map(|reply| reply.add_sheet.as_ref())
            .map(|added| added.properties.sheet_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateReply {
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Deserialize)]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: u64,
    #[serde(default)]
    pub updated_cells: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> SheetsClient {
        SheetsClient::new("https://sheets.googleapis.com/v4", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn values_url_encodes_range() {
        let url = client().values_url("abc123", "Employee Data!A:D");
        assert_eq!(
            url,
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Employee%20Data%21A%3AD"
        );
    }

    #[test]
    fn parse_value_range() {
        let json = r#"{
            "range": "'Employee Data'!A1:D3",
            "majorDimension": "ROWS",
            "values": [
                ["id", "name", "position", "isActive"],
                ["E1", "Ada", "Engineer", "TRUE"],
                ["E2", 42]
            ]
        }"#;

        let range: ValueRange = serde_json::from_str(json).unwrap();
        let rows = range.into_string_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][3], "TRUE");
        assert_eq!(rows[2], vec!["E2".to_string(), "42".to_string()]);
    }

    #[test]
    fn empty_range_has_no_values_key() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "Sheet1!A1:D1000", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(range.into_string_rows().is_empty());
    }

    #[test]
    fn parse_sheet_list() {
        let json = r#"{
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Employee Data"}},
                {"properties": {"sheetId": 918273, "title": "Employee Salaries"}}
            ]
        }"#;

        let spreadsheet: Spreadsheet = serde_json::from_str(json).unwrap();
        assert_eq!(spreadsheet.sheets.len(), 2);
        assert_eq!(spreadsheet.sheets[1].properties.sheet_id, 918273);
        assert_eq!(spreadsheet.sheets[0].properties.title, "Employee Data");
    }

    #[test]
    fn sheet_requests_wire_format() {
        let body = BatchUpdateRequest {
            requests: vec![SheetRequest::delete(7), SheetRequest::add("Employee Salaries")],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "requests": [
                    {"deleteSheet": {"sheetId": 7}},
                    {"addSheet": {"properties": {"title": "Employee Salaries"}}}
                ]
            })
        );
    }

    #[test]
    fn added_sheet_id_from_replies() {
        let json = r#"{
            "spreadsheetId": "abc",
            "replies": [
                {"addSheet": {"properties": {"sheetId": 55, "title": "Employee Salaries", "index": 1}}}
            ]
        }"#;

        let response: BatchUpdateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.added_sheet_id(), Some(55));

        let delete_only: BatchUpdateResponse =
            serde_json::from_str(r#"{"replies": [{}]}"#).unwrap();
        assert_eq!(delete_only.added_sheet_id(), None);
    }

    #[test]
    fn update_body_wire_format() {
        let body = ValueRange {
            range: Some("'Employee Salaries'!A1:E2".to_string()),
            values: Some(vec![vec![json!("id")], vec![json!("E1")]]),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"range": "'Employee Salaries'!A1:E2", "values": [["id"], ["E1"]]})
        );
    }
}
