use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type FormId = i64;

pub const DEFAULT_QR_REFRESH_INTERVAL: u64 = 5000;

/// A monitored external form plus its optional response sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub sheet_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub current_form_index: usize,
    pub qr_refresh_interval: u64,
    pub auto_refresh_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_form_index: 0,
            qr_refresh_interval: DEFAULT_QR_REFRESH_INTERVAL,
            auto_refresh_enabled: true,
        }
    }
}

/// Partial settings update. Absent fields keep their stored value.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(deserialize_with = "crate::types::coerce::opt_u64")]
    pub qr_refresh_interval: Option<u64>,
    #[serde(deserialize_with = "crate::types::coerce::opt_bool")]
    pub auto_refresh_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(interval) = self.qr_refresh_interval {
            settings.qr_refresh_interval = interval;
        }
        if let Some(enabled) = self.auto_refresh_enabled {
            settings.auto_refresh_enabled = enabled;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.qr_refresh_interval.is_none() && self.auto_refresh_enabled.is_none()
    }
}

/// Full contents of the record store at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub forms: Vec<Form>,
    pub settings: Settings,
}

impl Snapshot {
    /// Sort forms by creation time and reconcile the active-form pointer.
    ///
    /// The active flag is authoritative: the first active form wins, any later
    /// active flags are cleared, and `current_form_index` is set to its rank.
    /// With no active form the stored index is only clamped into range.
    pub fn normalize(&mut self) {
        self.forms
            .sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut active = None;
        for (idx, form) in self.forms.iter_mut().enumerate() {
            if form.is_active {
                if active.is_some() {
                    form.is_active = false;
                } else {
                    active = Some(idx);
                }
            }
        }

        self.settings.current_form_index = match active {
            Some(idx) => idx,
            None => clamp_index(self.settings.current_form_index, self.forms.len()),
        };
    }

    pub fn position(&self, id: FormId) -> Option<usize> {
        self.forms.iter().position(|f| f.id == id)
    }

    pub fn active_form(&self) -> Option<&Form> {
        self.forms.iter().find(|f| f.is_active)
    }

    /// Next unused id: the current millisecond clock, bumped past every existing id.
    pub fn next_id(&self, now: DateTime<Utc>) -> FormId {
        let max_id = self.forms.iter().map(|f| f.id).max().unwrap_or(0);
        now.timestamp_millis().max(max_id + 1)
    }
}

pub fn clamp_index(index: usize, len: usize) -> usize {
    if index >= len {
        len.saturating_sub(1)
    } else {
        index
    }
}

/// Row shape of the `forms` collection in the document store.
#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub sheet_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<FormRow> for Form {
    fn from(r: FormRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            url: r.url,
            sheet_url: r.sheet_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct SettingsRow {
    pub current_form_index: i64,
    pub qr_refresh_interval: i64,
    pub auto_refresh_enabled: bool,
}

impl From<SettingsRow> for Settings {
    fn from(r: SettingsRow) -> Self {
        Self {
            current_form_index: usize::try_from(r.current_form_index).unwrap_or(0),
            qr_refresh_interval: u64::try_from(r.qr_refresh_interval)
                .unwrap_or(DEFAULT_QR_REFRESH_INTERVAL),
            auto_refresh_enabled: r.auto_refresh_enabled,
        }
    }
}
