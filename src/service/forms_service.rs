use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;

use crate::db::{Form, FormId, RecordStore, Settings, SettingsPatch, Snapshot};
use crate::error::AttendanceError;
use crate::service::tracking_notifier::TrackingNotifier;
use crate::types::coerce::MAX_STORED_U64;
use crate::types::requests::{CreateFormRequest, UpdateFormRequest};
use crate::types::responses::SheetLink;

/// Forms CRUD over a [`RecordStore`].
///
/// Every read-modify-write runs under `write_lock`, so the index computed for
/// a new form and the flag flip always see the same snapshot they commit.
#[derive(Clone)]
pub struct FormsService {
    store: Arc<dyn RecordStore>,
    notifier: TrackingNotifier,
    write_lock: Arc<Mutex<()>>,
}

impl FormsService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: TrackingNotifier) -> Self {
        Self {
            store,
            notifier,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.store.load_all().await;
        snapshot.normalize();
        snapshot
    }

    async fn commit(
        &self,
        snapshot: &Snapshot,
        context: &'static str,
    ) -> Result<(), AttendanceError> {
        self.store
            .replace_all(&snapshot.forms, &snapshot.settings)
            .await
            .map_err(AttendanceError::storage(context))
    }

    pub async fn list(&self) -> Snapshot {
        self.snapshot().await
    }

    pub async fn current_form(&self) -> Option<Form> {
        self.snapshot().await.active_form().cloned()
    }

    pub async fn get(&self, id: FormId) -> Result<Form, AttendanceError> {
        let snapshot = self.snapshot().await;
        snapshot
            .forms
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(AttendanceError::form_not_found)
    }

    pub async fn sheets(&self) -> Vec<SheetLink> {
        self.snapshot()
            .await
            .forms
            .iter()
            .filter(|f| !f.sheet_url.trim().is_empty())
            .map(SheetLink::from)
            .collect()
    }

    /// Append a form and make it the active one.
    pub async fn create(&self, req: CreateFormRequest) -> Result<Form, AttendanceError> {
        let (name, url) = required(req.name.as_deref(), req.url.as_deref())?;
        let url = parse_url(&url)?;
        let sheet_url = optional_url(req.sheet_url.as_deref())?;

        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.snapshot().await;

        let now = Utc::now();
        let form = Form {
            id: snapshot.next_id(now),
            name,
            url,
            sheet_url,
            created_at: now,
            updated_at: None,
            is_active: true,
        };
        for existing in snapshot.forms.iter_mut() {
            existing.is_active = false;
        }
        snapshot.forms.push(form.clone());
        snapshot.normalize();

        self.commit(&snapshot, "Failed to save form to database").await?;
        info!(
            form_id = form.id,
            name = %form.name,
            current_form_index = snapshot.settings.current_form_index,
            "form created"
        );

        self.notifier.form_created(&form);
        Ok(form)
    }

    pub async fn set_active(&self, id: FormId) -> Result<Form, AttendanceError> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.snapshot().await;

        let idx = snapshot
            .position(id)
            .ok_or_else(AttendanceError::form_not_found)?;
        for (i, form) in snapshot.forms.iter_mut().enumerate() {
            form.is_active = i == idx;
        }
        snapshot.settings.current_form_index = idx;

        self.commit(&snapshot, "Failed to update active form").await?;
        info!(form_id = id, current_form_index = idx, "active form changed");
        Ok(snapshot.forms[idx].clone())
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, AttendanceError> {
        if patch.qr_refresh_interval.is_some_and(|v| v > MAX_STORED_U64) {
            return Err(AttendanceError::validation(format!(
                "qrRefreshInterval must be at most {MAX_STORED_U64}"
            )));
        }

        let _guard = self.write_lock.lock().await;
        if !patch.is_empty() {
            self.store
                .upsert_settings(&patch)
                .await
                .map_err(AttendanceError::storage("Failed to update settings"))?;
            info!(?patch, "settings updated");
        }
        Ok(self.snapshot().await.settings)
    }

    pub async fn update_form(
        &self,
        id: FormId,
        req: UpdateFormRequest,
    ) -> Result<Form, AttendanceError> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let url = req
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|raw| {
                parse_url(raw).map_err(|_| AttendanceError::validation("Invalid form URL"))
            })
            .transpose()?;
        let sheet_url = req
            .sheet_url
            .as_deref()
            .map(|raw| {
                optional_url(Some(raw))
                    .map_err(|_| AttendanceError::validation("Invalid sheet URL"))
            })
            .transpose()?;

        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.snapshot().await;
        let idx = snapshot
            .position(id)
            .ok_or_else(AttendanceError::form_not_found)?;

        let form = &mut snapshot.forms[idx];
        if let Some(name) = name {
            form.name = name;
        }
        if let Some(url) = url {
            form.url = url;
        }
        if let Some(sheet_url) = sheet_url {
            form.sheet_url = sheet_url;
        }
        form.updated_at = Some(Utc::now());
        let updated = form.clone();

        self.commit(&snapshot, "Failed to update form in database").await?;
        info!(form_id = id, "form updated");
        Ok(updated)
    }

    /// Remove a form, clamping the stored index if it fell off the end.
    pub async fn delete(&self, id: FormId) -> Result<Form, AttendanceError> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.snapshot().await;

        let idx = snapshot
            .position(id)
            .ok_or_else(AttendanceError::form_not_found)?;
        let removed = snapshot.forms.remove(idx);
        snapshot.normalize();

        self.commit(&snapshot, "Failed to remove form from database").await?;
        info!(
            form_id = id,
            remaining = snapshot.forms.len(),
            current_form_index = snapshot.settings.current_form_index,
            "form removed"
        );
        Ok(removed)
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Trimmed name and url, both required.
fn required(name: Option<&str>, url: Option<&str>) -> Result<(String, String), AttendanceError> {
    let name = name.map(str::trim).unwrap_or_default();
    let url = url.map(str::trim).unwrap_or_default();
    if name.is_empty() || url.is_empty() {
        return Err(AttendanceError::validation("Form name and URL are required"));
    }
    Ok((name.to_string(), url.to_string()))
}

fn parse_url(raw: &str) -> Result<String, AttendanceError> {
    let trimmed = raw.trim();
    Url::parse(trimmed).map_err(|_| AttendanceError::validation("Please provide valid URLs"))?;
    Ok(trimmed.to_string())
}

/// Empty or absent means "no sheet"; anything else must parse.
fn optional_url(raw: Option<&str>) -> Result<String, AttendanceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(String::new()),
        Some(s) => parse_url(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_trimmed() {
        assert!(required(Some("  "), Some("https://a")).is_err());
        assert!(required(Some("A"), None).is_err());
        assert_eq!(
            required(Some(" A "), Some(" https://a ")).unwrap(),
            ("A".to_string(), "https://a".to_string())
        );
    }

    #[test]
    fn urls_must_be_absolute() {
        assert!(parse_url("not-a-url").is_err());
        assert!(parse_url("/relative/path").is_err());
        assert_eq!(parse_url(" https://a ").unwrap(), "https://a");
        assert_eq!(optional_url(Some("   ")).unwrap(), "");
        assert!(optional_url(Some("nope")).is_err());
    }
}
