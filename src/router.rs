use std::sync::Arc;

use axum::{
    Json, Router,
    http::{Method, StatusCode},
    routing::get,
};

use crate::error::ApiErrorResponse;
use crate::handlers::{forms, meta};
use crate::middleware::{cors_layer, method_not_allowed};
use crate::service::FormsService;

const FORMS_ALLOW: &str = "GET, POST, PUT, DELETE, OPTIONS";
const FORM_ALLOW: &str = "GET, PUT, DELETE, OPTIONS";
const READ_ONLY_ALLOW: &str = "GET, OPTIONS";

#[derive(Clone)]
pub struct AppState {
    pub forms: FormsService,
    pub sheets_api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(forms: FormsService, sheets_api_key: Option<String>) -> Self {
        Self {
            forms,
            sheets_api_key: sheets_api_key.map(Arc::from),
        }
    }
}

pub fn attendance_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/forms",
            get(forms::list_forms)
                .post(forms::create_form)
                .put(forms::update_forms)
                .delete(forms::delete_form_by_query)
                .fallback(|method: Method| async move {
                    method_not_allowed(&method, FORMS_ALLOW)
                }),
        )
        .route(
            "/forms/{id}",
            get(forms::get_form)
                .put(forms::update_form)
                .delete(forms::delete_form)
                .fallback(|method: Method| async move {
                    method_not_allowed(&method, FORM_ALLOW)
                }),
        )
        .route(
            "/current-form",
            get(meta::current_form).fallback(|method: Method| async move {
                method_not_allowed(&method, READ_ONLY_ALLOW)
            }),
        )
        .route(
            "/sheets",
            get(meta::list_sheets).fallback(|method: Method| async move {
                method_not_allowed(&method, READ_ONLY_ALLOW)
            }),
        )
        .route(
            "/config",
            get(meta::client_config).fallback(|method: Method| async move {
                method_not_allowed(&method, READ_ONLY_ALLOW)
            }),
        )
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(ApiErrorResponse::new("API endpoint not found")),
            )
        })
        .layer(cors_layer())
        .with_state(state)
}
