use chrono::Utc;
use tracing::{error, info};
use url::Url;

use super::api_client::{ClientError, FormsApiClient};
use crate::db::Form;

pub const DEFAULT_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSfJQOOhFtkqpmmHIyNf_XE_EHAL9v5JsiPJ7D0cAnHVpagBTA/viewform";
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1FAIpQLSfJQOOhFtkqpmmHIyNf_XE_EHAL9v5JsiPJ7D0cAnHVpagBTA/edit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Instructor/admin views: the whole list, with mutation rights.
    Full,
    /// Student view: just the active form.
    CurrentOnly,
}

/// Degraded-mode form shown when the resource cannot be reached.
pub fn default_form() -> Form {
    Form {
        id: 1,
        name: "Default Attendance".to_string(),
        url: DEFAULT_FORM_URL.to_string(),
        sheet_url: DEFAULT_SHEET_URL.to_string(),
        created_at: Utc::now(),
        updated_at: None,
        is_active: true,
    }
}

/// Local mirror of the forms list. Never computes indices on its own after a
/// mutation; it always reloads what the server says.
pub struct FormManager {
    api: FormsApiClient,
    mode: LoadMode,
    forms: Vec<Form>,
    current_form_index: usize,
}

impl FormManager {
    pub fn new(api: FormsApiClient, mode: LoadMode) -> Self {
        Self {
            api,
            mode,
            forms: Vec::new(),
            current_form_index: 0,
        }
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn current_form_index(&self) -> usize {
        self.current_form_index
    }

    pub async fn init(&mut self) {
        match self.mode {
            LoadMode::Full => self.load_forms().await,
            LoadMode::CurrentOnly => self.load_current_form().await,
        }
    }

    pub async fn load_forms(&mut self) {
        match self.api.get_forms().await {
            Ok(resp) => {
                self.forms = resp.forms;
                self.current_form_index = resp.settings.current_form_index;
            }
            Err(e) => {
                error!(error = %e, "failed to load forms; using default form");
                self.fall_back();
            }
        }
    }

    pub async fn load_current_form(&mut self) {
        match self.api.get_current_form().await {
            Ok(resp) => {
                self.forms = resp.form.into_iter().collect();
                self.current_form_index = 0;
            }
            Err(e) => {
                error!(error = %e, "failed to load current form; using default form");
                self.fall_back();
            }
        }
    }

    async fn reload(&mut self) {
        match self.mode {
            LoadMode::Full => self.load_forms().await,
            LoadMode::CurrentOnly => self.load_current_form().await,
        }
    }

    fn fall_back(&mut self) {
        self.forms = vec![default_form()];
        self.current_form_index = 0;
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.forms.get(self.current_form_index)
    }

    pub async fn add_form(
        &mut self,
        name: &str,
        url: &str,
        sheet_url: Option<&str>,
    ) -> Result<Form, ClientError> {
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            return Err(ClientError::Validation(
                "Form name and URL are required".to_string(),
            ));
        }
        let sheet_url = sheet_url.map(str::trim).unwrap_or_default();
        if Url::parse(url).is_err() || (!sheet_url.is_empty() && Url::parse(sheet_url).is_err()) {
            return Err(ClientError::Validation("Please enter valid URLs".to_string()));
        }

        let resp = self.api.add_form(name, url, sheet_url).await?;
        info!(form_id = resp.form.id, "form added");
        self.reload().await;
        Ok(resp.form)
    }

    /// Remove the form at `index`; out-of-range indices are ignored.
    pub async fn remove_form(&mut self, index: usize) -> Result<Option<Form>, ClientError> {
        let Some(form) = self.forms.get(index) else {
            return Ok(None);
        };
        let resp = self.api.delete_form(form.id).await?;
        self.reload().await;
        Ok(Some(resp.removed_form))
    }

    /// Make the form at `index` active; out-of-range indices are ignored.
    pub async fn set_current_form(&mut self, index: usize) -> Result<(), ClientError> {
        let Some(form) = self.forms.get(index) else {
            return Ok(());
        };
        self.api.set_active_form(form.id).await?;
        self.reload().await;
        Ok(())
    }

    pub async fn next_form(&mut self) -> Result<(), ClientError> {
        if self.forms.len() < 2 {
            return Ok(());
        }
        let next = (self.current_form_index + 1) % self.forms.len();
        self.set_current_form(next).await
    }

    pub async fn previous_form(&mut self) -> Result<(), ClientError> {
        if self.forms.len() < 2 {
            return Ok(());
        }
        let prev = if self.current_form_index == 0 {
            self.forms.len() - 1
        } else {
            self.current_form_index - 1
        };
        self.set_current_form(prev).await
    }
}
