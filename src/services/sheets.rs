use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::SavedPost;

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const EXPORT_RANGE: &str = "Sheet1!A:F";

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<[String; 6]>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<UpdateSummary>,
}

#[derive(Debug, Deserialize)]
struct UpdateSummary {
    #[serde(rename = "updatedCells")]
    updated_cells: Option<u64>,
}

/// One row per post: the six record fields in column order, with the content
/// flattened to a single line for the cell.
fn row_values(post: &SavedPost) -> [String; 6] {
    [
        post.date.clone(),
        post.platform.clone(),
        post.topic.clone(),
        post.keywords.clone(),
        post.content.replace('\n', " ").trim().to_string(),
        post.model_used.clone(),
    ]
}

/// Success means the append actually landed: at least one cell updated.
fn append_succeeded(response: &AppendResponse) -> bool {
    response
        .updates
        .as_ref()
        .and_then(|u| u.updated_cells)
        .unwrap_or(0)
        > 0
}

pub struct SheetsExporter {
    client: Client,
    access_token: String,
    sheet_id: String,
}

impl SheetsExporter {
    pub fn new(access_token: String, sheet_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            access_token,
            sheet_id,
        }
    }

    /// Append one post as a row to the target sheet. Never fails into the
    /// caller: any auth, network or response-shape problem is logged and
    /// reported as `false`.
    pub async fn export(&self, post: &SavedPost) -> bool {
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            SHEETS_API_URL, self.sheet_id, EXPORT_RANGE
        );

        let request = AppendRequest {
            values: vec![row_values(post)],
        };

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to reach Sheets API: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Sheets append failed with {}: {}", status, error_text);
            return false;
        }

        match response.json::<AppendResponse>().await {
            Ok(append_response) => append_succeeded(&append_response),
            Err(e) => {
                tracing::error!("Malformed Sheets append response: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> SavedPost {
        SavedPost {
            date: "2025-01-01 10:00:00".to_string(),
            platform: "LinkedIn (Professional)".to_string(),
            topic: "Remote work".to_string(),
            keywords: "#remotefirst".to_string(),
            content: "  Line one\nLine two\n".to_string(),
            model_used: "google/gemini-2.5-flash".to_string(),
        }
    }

    #[test]
    fn row_collapses_newlines_and_trims_content() {
        let row = row_values(&post());

        assert_eq!(row[0], "2025-01-01 10:00:00");
        assert_eq!(row[1], "LinkedIn (Professional)");
        assert_eq!(row[2], "Remote work");
        assert_eq!(row[3], "#remotefirst");
        assert_eq!(row[4], "Line one Line two");
        assert_eq!(row[5], "google/gemini-2.5-flash");
    }

    #[test]
    fn six_updated_cells_is_success() {
        let response: AppendResponse =
            serde_json::from_str(r#"{"updates": {"updatedCells": 6}}"#).unwrap();
        assert!(append_succeeded(&response));
    }

    // Any nonzero count passes the threshold, even a partial row. Kept
    // exactly as specified: the check is updatedCells > 0, nothing stricter.
    #[test]
    fn partial_update_still_counts_as_success() {
        let response: AppendResponse =
            serde_json::from_str(r#"{"updates": {"updatedCells": 2}}"#).unwrap();
        assert!(append_succeeded(&response));
    }

    #[test]
    fn zero_updated_cells_is_failure() {
        let response: AppendResponse =
            serde_json::from_str(r#"{"updates": {"updatedCells": 0}}"#).unwrap();
        assert!(!append_succeeded(&response));
    }

    #[test]
    fn missing_updates_block_is_failure() {
        let response: AppendResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!append_succeeded(&response));
    }
}
