use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error as ThisError;
use tracing::error;
use url::Url;

use crate::db::{FormId, SettingsPatch};
use crate::error::ApiErrorResponse;
use crate::types::requests::{CreateFormRequest, UpdateFormRequest};
use crate::types::responses::{
    ClientConfigResponse, FormMutationResponse, FormResponse, ListFormsResponse,
    RemovedFormResponse, SetActiveResponse, SettingsResponse, SheetsResponse,
};

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with `{success: false, error}`.
    #[error("{message} (status {status})")]
    Api { status: StatusCode, message: String },
}

/// Typed calls against the forms resource.
#[derive(Clone)]
pub struct FormsApiClient {
    http: reqwest::Client,
    base: Url,
}

impl FormsApiClient {
    /// `base` is the resource root, e.g. `http://localhost:3000/`.
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    async fn request<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.inspect_err(|e| {
            error!(error = %e, "API request failed");
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ApiErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP error! status: {}", status.as_u16()),
            };
            error!(status = status.as_u16(), message = %message, "API request rejected");
            return Err(ClientError::Api { status, message });
        }
        Ok(resp.json().await?)
    }

    pub async fn get_forms(&self) -> Result<ListFormsResponse, ClientError> {
        self.request::<(), _>(Method::GET, self.endpoint("forms")?, None)
            .await
    }

    pub async fn get_current_form(&self) -> Result<FormResponse, ClientError> {
        self.request::<(), _>(Method::GET, self.endpoint("current-form")?, None)
            .await
    }

    pub async fn get_form(&self, id: FormId) -> Result<FormResponse, ClientError> {
        self.request::<(), _>(Method::GET, self.endpoint(&format!("forms/{id}"))?, None)
            .await
    }

    pub async fn get_sheets(&self) -> Result<SheetsResponse, ClientError> {
        self.request::<(), _>(Method::GET, self.endpoint("sheets")?, None)
            .await
    }

    /// Fails with [`ClientError::Api`] when the server has no Sheets API key.
    pub async fn get_config(&self) -> Result<ClientConfigResponse, ClientError> {
        self.request::<(), _>(Method::GET, self.endpoint("config")?, None)
            .await
    }

    pub async fn add_form(
        &self,
        name: &str,
        url: &str,
        sheet_url: &str,
    ) -> Result<FormMutationResponse, ClientError> {
        let body = CreateFormRequest {
            name: Some(name.to_string()),
            url: Some(url.to_string()),
            sheet_url: Some(sheet_url.to_string()),
        };
        self.request(Method::POST, self.endpoint("forms")?, Some(&body))
            .await
    }

    pub async fn update_form(
        &self,
        id: FormId,
        updates: &UpdateFormRequest,
    ) -> Result<FormMutationResponse, ClientError> {
        self.request(Method::PUT, self.endpoint(&format!("forms/{id}"))?, Some(updates))
            .await
    }

    pub async fn delete_form(&self, id: FormId) -> Result<RemovedFormResponse, ClientError> {
        let mut url = self.endpoint("forms")?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        self.request::<(), _>(Method::DELETE, url, None).await
    }

    pub async fn set_active_form(&self, id: FormId) -> Result<SetActiveResponse, ClientError> {
        let body = json!({ "id": id, "action": "setActive" });
        self.request(Method::PUT, self.endpoint("forms")?, Some(&body))
            .await
    }

    pub async fn update_settings(
        &self,
        patch: &SettingsPatch,
    ) -> Result<SettingsResponse, ClientError> {
        let mut body = json!({ "action": "updateSettings" });
        if let Some(interval) = patch.qr_refresh_interval {
            body["qrRefreshInterval"] = json!(interval);
        }
        if let Some(enabled) = patch.auto_refresh_enabled {
            body["autoRefreshEnabled"] = json!(enabled);
        }
        self.request(Method::PUT, self.endpoint("forms")?, Some(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let client = FormsApiClient::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:3000/api").unwrap(),
        );
        assert_eq!(
            client.endpoint("forms").unwrap().as_str(),
            "http://localhost:3000/api/forms"
        );
        assert_eq!(
            client.endpoint("/current-form").unwrap().as_str(),
            "http://localhost:3000/api/current-form"
        );
    }
}
