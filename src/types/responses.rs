use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Form, FormId, Settings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFormsResponse {
    pub success: bool,
    pub forms: Vec<Form>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMutationResponse {
    pub success: bool,
    pub form: Form,
    pub message: String,
}

/// Single form lookup; `form` is null on `/current-form` when nothing is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub success: bool,
    pub form: Option<Form>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveResponse {
    pub success: bool,
    pub message: String,
    pub current_form: Form,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub success: bool,
    pub message: String,
    pub settings: Settings,
}

/// `PUT /forms` answers with one of two shapes depending on the action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateFormsResponse {
    Active(SetActiveResponse),
    Settings(SettingsResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedFormResponse {
    pub success: bool,
    pub message: String,
    pub removed_form: Form,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetLink {
    pub id: FormId,
    pub name: String,
    pub sheet_url: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&Form> for SheetLink {
    fn from(f: &Form) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            sheet_url: f.sheet_url.clone(),
            created_at: f.created_at,
            is_active: f.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsResponse {
    pub success: bool,
    pub sheets: Vec<SheetLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub success: bool,
    pub google_sheets: GoogleSheetsConfig,
    pub app: AppInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSheetsConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub qr_refresh_interval: u64,
}
