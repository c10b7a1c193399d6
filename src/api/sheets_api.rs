use serde::{Deserialize, Serialize};
use url::Url;

pub const SHEETS_VALUES_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Spreadsheet id: the path segment right after `/d/` in a sheet link.
pub fn extract_sheet_id(sheet_url: &str) -> Option<String> {
    let url = Url::parse(sheet_url).ok()?;
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "d")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Body forwarded to the tracking webhook, which performs the actual append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppendRowRequest {
    pub spreadsheet_id: String,
    pub range: String,
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Stateless calls against the spreadsheet side.
pub struct SheetsApi;

impl SheetsApi {
    pub async fn append_row(
        client: &reqwest::Client,
        webhook: &Url,
        request: &AppendRowRequest,
    ) -> Result<(), reqwest::Error> {
        client
            .post(webhook.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Read a cell range with an API key. A sheet without data yields no rows.
    pub async fn fetch_values(
        client: &reqwest::Client,
        base: &str,
        api_key: &str,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, reqwest::Error> {
        let url = format!("{}/{sheet_id}/values/{range}", base.trim_end_matches('/'));
        let body: ValueRange = client
            .get(url)
            .query(&[("key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.values)
    }
}
