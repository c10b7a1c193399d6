use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;

use crate::db::FormId;
use crate::error::AttendanceError;
use crate::middleware::ApiJson;
use crate::router::AppState;
use crate::types::requests::{CreateFormRequest, FormIdQuery, FormsAction, UpdateFormRequest};
use crate::types::responses::{
    FormMutationResponse, FormResponse, ListFormsResponse, RemovedFormResponse, SetActiveResponse,
    SettingsResponse, UpdateFormsResponse,
};

/// GET /forms
pub async fn list_forms(State(state): State<AppState>) -> Json<ListFormsResponse> {
    let snapshot = state.forms.list().await;
    Json(ListFormsResponse {
        success: true,
        forms: snapshot.forms,
        settings: snapshot.settings,
    })
}

/// POST /forms
pub async fn create_form(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateFormRequest>,
) -> Result<(StatusCode, Json<FormMutationResponse>), AttendanceError> {
    let form = state.forms.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(FormMutationResponse {
            success: true,
            form,
            message: "Form added successfully".to_string(),
        }),
    ))
}

/// PUT /forms: `setActive` or `updateSettings`.
pub async fn update_forms(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<UpdateFormsResponse>, AttendanceError> {
    let known = body
        .get("action")
        .and_then(Value::as_str)
        .is_some_and(|a| FormsAction::NAMES.iter().any(|name| *name == a));
    if !known {
        return Err(AttendanceError::validation("Invalid action"));
    }
    let action: FormsAction = serde_json::from_value(body)
        .map_err(|e| AttendanceError::validation(format!("Invalid request body: {e}")))?;

    let payload = match action {
        FormsAction::SetActive { id } => {
            let id = id.ok_or_else(|| AttendanceError::validation("Form ID is required"))?;
            let current_form = state.forms.set_active(id).await?;
            UpdateFormsResponse::Active(SetActiveResponse {
                success: true,
                message: "Active form updated".to_string(),
                current_form,
            })
        }
        FormsAction::UpdateSettings(patch) => {
            let settings = state.forms.update_settings(patch).await?;
            UpdateFormsResponse::Settings(SettingsResponse {
                success: true,
                message: "Settings updated".to_string(),
                settings,
            })
        }
    };
    Ok(Json(payload))
}

/// DELETE /forms?id=
pub async fn delete_form_by_query(
    State(state): State<AppState>,
    Query(query): Query<FormIdQuery>,
) -> Result<Json<RemovedFormResponse>, AttendanceError> {
    let id = parse_id(query.id.as_deref())?;
    remove(&state, id, "Form removed successfully").await
}

/// GET /forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormResponse>, AttendanceError> {
    let form = state.forms.get(parse_id(Some(&id))?).await?;
    Ok(Json(FormResponse {
        success: true,
        form: Some(form),
    }))
}

/// PUT /forms/{id}
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateFormRequest>,
) -> Result<Json<FormMutationResponse>, AttendanceError> {
    let form = state.forms.update_form(parse_id(Some(&id))?, req).await?;
    Ok(Json(FormMutationResponse {
        success: true,
        form,
        message: "Form updated successfully".to_string(),
    }))
}

/// DELETE /forms/{id}
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedFormResponse>, AttendanceError> {
    let id = parse_id(Some(&id))?;
    remove(&state, id, "Form deleted successfully").await
}

async fn remove(
    state: &AppState,
    id: FormId,
    message: &str,
) -> Result<Json<RemovedFormResponse>, AttendanceError> {
    let removed_form = state.forms.delete(id).await?;
    Ok(Json(RemovedFormResponse {
        success: true,
        message: message.to_string(),
        removed_form,
    }))
}

fn parse_id(raw: Option<&str>) -> Result<FormId, AttendanceError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AttendanceError::validation("Form ID is required"))?;
    raw.parse()
        .map_err(|_| AttendanceError::validation(format!("Invalid form ID: {raw}")))
}
