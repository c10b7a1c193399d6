use axum::{Json, extract::State};

use crate::config::{APP_NAME, APP_VERSION};
use crate::db::models::DEFAULT_QR_REFRESH_INTERVAL;
use crate::error::AttendanceError;
use crate::router::AppState;
use crate::types::responses::{
    AppInfo, ClientConfigResponse, FormResponse, GoogleSheetsConfig, SheetsResponse,
};

/// GET /current-form: the student view only ever sees the active form.
pub async fn current_form(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        success: true,
        form: state.forms.current_form().await,
    })
}

/// GET /sheets: forms that have a response sheet linked.
pub async fn list_sheets(State(state): State<AppState>) -> Json<SheetsResponse> {
    Json(SheetsResponse {
        success: true,
        sheets: state.forms.sheets().await,
    })
}

/// GET /config: client bootstrap for instructor-side sheet reads.
pub async fn client_config(
    State(state): State<AppState>,
) -> Result<Json<ClientConfigResponse>, AttendanceError> {
    let api_key = state.sheets_api_key.as_deref().ok_or_else(|| {
        AttendanceError::Misconfigured(
            "Google Sheets API key not configured. Set GOOGLE_SHEETS_API_KEY.".to_string(),
        )
    })?;
    Ok(Json(ClientConfigResponse {
        success: true,
        google_sheets: GoogleSheetsConfig {
            api_key: api_key.to_string(),
        },
        app: AppInfo {
            name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            qr_refresh_interval: DEFAULT_QR_REFRESH_INTERVAL,
        },
    }))
}
