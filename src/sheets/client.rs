//! Raw Sheets v4 REST calls.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::auth::TokenProvider;
use crate::error::SheetError;

const SHEETS_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Authenticated client for the Sheets values and batchUpdate endpoints.
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

impl SheetsClient {
    pub fn new(tokens: Arc<TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
        }
    }

    /// Reads a range. Cells come back as their formatted string values;
    /// absent trailing cells are simply missing from the row arrays.
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let url = values_url(spreadsheet_id, range, None)?;
        let token = self.tokens.access_token().await?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;
        let resp = check_status(resp).await?;

        let body: ValueRange = resp
            .json()
            .await
            .map_err(|e| SheetError::MalformedResponse(e.to_string()))?;
        Ok(body.values)
    }

    /// Appends rows after the table starting at `range`.
    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        let mut url = values_url(spreadsheet_id, range, Some("append"))?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let token = self.tokens.access_token().await?;

        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    /// Overwrites exactly the cells of `range`.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        let mut url = values_url(spreadsheet_id, range, None)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let token = self.tokens.access_token().await?;

        let resp = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    /// Deletes whole rows via batchUpdate. `start_row` is 1-based.
    pub async fn delete_rows(
        &self,
        spreadsheet_id: &str,
        grid_id: i64,
        start_row: u32,
        count: u32,
    ) -> Result<(), SheetError> {
        let url = batch_update_url(spreadsheet_id)?;
        let token = self.tokens.access_token().await?;

        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": grid_id,
                        "dimension": "ROWS",
                        "startIndex": start_row - 1,
                        "endIndex": start_row - 1 + count,
                    }
                }
            }]
        });

        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SheetError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(SheetError::Api { status, body })
}

/// Builds `/v4/spreadsheets/{id}/values/{range}[:method]`, percent-encoding
/// the range (worksheet titles may contain spaces and quotes).
fn values_url(
    spreadsheet_id: &str,
    range: &str,
    method: Option<&str>,
) -> Result<reqwest::Url, SheetError> {
    let mut url = reqwest::Url::parse(SHEETS_BASE)
        .map_err(|e| SheetError::MalformedResponse(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| SheetError::MalformedResponse("base url cannot hold a path".into()))?;
        segments.extend(["v4", "spreadsheets", spreadsheet_id, "values"]);
        match method {
            Some(m) => segments.push(&format!("{range}:{m}")),
            None => segments.push(range),
        };
    }
    Ok(url)
}

fn batch_update_url(spreadsheet_id: &str) -> Result<reqwest::Url, SheetError> {
    let mut url = reqwest::Url::parse(SHEETS_BASE)
        .map_err(|e| SheetError::MalformedResponse(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| SheetError::MalformedResponse("base url cannot hold a path".into()))?;
        segments.extend(["v4", "spreadsheets", &format!("{spreadsheet_id}:batchUpdate")]);
    }
    Ok(url)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_url_encodes_quoted_range() {
        let url = values_url("sheet-id", "'My Sheet'!A2:K", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/'My%20Sheet'!A2:K"
        );
    }

    #[test]
    fn values_url_appends_method_after_colon() {
        let url = values_url("id1", "'Sheet1'!A1", Some("append")).unwrap();
        assert!(url.as_str().ends_with("/values/'Sheet1'!A1:append"));
    }

    #[test]
    fn batch_update_url_shape() {
        let url = batch_update_url("abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123:batchUpdate"
        );
    }

    #[test]
    fn value_range_defaults_to_empty_when_values_missing() {
        let body: ValueRange = serde_json::from_str(r#"{"range": "Sheet1!A2:K"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn value_range_parses_rows() {
        let raw = r#"{"values": [["1", "a"], ["2"]]}"#;
        let body: ValueRange = serde_json::from_str(raw).unwrap();
        assert_eq!(body.values.len(), 2);
        assert_eq!(body.values[0][1], "a");
        assert_eq!(body.values[1].len(), 1);
    }
}
