use serde::{Deserialize, Serialize};

use crate::db::{FormId, SettingsPatch};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateFormRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub sheet_url: Option<String>,
}

/// Per-form edit. Omitted fields are left alone; an empty `sheetUrl` clears the link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFormRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub sheet_url: Option<String>,
}

/// `PUT /forms` body, dispatched on `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum FormsAction {
    #[serde(rename = "setActive")]
    SetActive {
        #[serde(default, deserialize_with = "super::coerce::opt_id")]
        id: Option<FormId>,
    },
    #[serde(rename = "updateSettings")]
    UpdateSettings(SettingsPatch),
}

impl FormsAction {
    pub const NAMES: [&'static str; 2] = ["setActive", "updateSettings"];
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormIdQuery {
    #[serde(default)]
    pub id: Option<String>,
}
