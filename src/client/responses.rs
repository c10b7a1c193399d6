use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::api_client::ClientError;
use crate::api::{SheetsApi, extract_sheet_id, sheets_api::SHEETS_VALUES_BASE};
use crate::types::responses::ClientConfigResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTally {
    pub index: usize,
    pub title: String,
    pub responses: Vec<OptionCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub questions: Vec<QuestionTally>,
    pub total_responses: usize,
}

/// Count answers per question. Row 0 holds the headers; column A is the
/// submission timestamp and is skipped.
pub fn summarize(rows: &[Vec<String>]) -> ResponseSummary {
    let [headers, data @ ..] = rows else {
        return ResponseSummary::default();
    };
    if data.is_empty() {
        return ResponseSummary::default();
    }

    let questions = headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, header)| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for answer in data.iter().filter_map(|row| row.get(index)) {
                let answer = answer.trim();
                if !answer.is_empty() {
                    *counts.entry(answer).or_default() += 1;
                }
            }
            let mut responses: Vec<OptionCount> = counts
                .into_iter()
                .map(|(option, count)| OptionCount {
                    option: option.to_string(),
                    count,
                })
                .collect();
            // Ties broken alphabetically so output is stable.
            responses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.option.cmp(&b.option)));

            let title = if header.trim().is_empty() {
                format!("Question {index}")
            } else {
                header.clone()
            };
            QuestionTally {
                index,
                title,
                responses,
            }
        })
        .collect();

    ResponseSummary {
        questions,
        total_responses: data.len(),
    }
}

/// Read-only access to response sheets with an API key.
#[derive(Clone)]
pub struct SheetsReader {
    http: reqwest::Client,
    api_key: String,
    base: String,
}

impl SheetsReader {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base: SHEETS_VALUES_BASE.to_string(),
        }
    }

    /// Point at a different values endpoint, e.g. a local stub.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Reader keyed with whatever `/config` handed out.
    pub fn from_config(http: reqwest::Client, config: &ClientConfigResponse) -> Self {
        Self::new(http, config.google_sheets.api_key.clone())
    }

    pub async fn fetch_values(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, ClientError> {
        Ok(
            SheetsApi::fetch_values(&self.http, &self.base, &self.api_key, sheet_id, range)
                .await?,
        )
    }

    /// Fetch `A:Z` from the sheet behind `sheet_url` and tally it.
    pub async fn summarize_sheet(&self, sheet_url: &str) -> Result<ResponseSummary, ClientError> {
        let sheet_id = extract_sheet_id(sheet_url).ok_or_else(|| {
            ClientError::Validation("Please provide a valid Google Sheets URL".to_string())
        })?;
        let rows = self.fetch_values(&sheet_id, "A:Z").await?;
        debug!(sheet_id = %sheet_id, rows = rows.len(), "sheet values fetched");
        Ok(summarize(&rows))
    }
}
