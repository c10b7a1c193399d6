use axum::{
    Json,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{ALLOW, AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiErrorResponse;

/// Any origin may call the API. The layer answers every `OPTIONS` itself.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// 405 with an `Allow` header naming what the route does support.
pub fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(ALLOW, HeaderValue::from_static(allow));
    (
        StatusCode::METHOD_NOT_ALLOWED,
        headers,
        Json(ApiErrorResponse::new(format!("Method {method} Not Allowed"))),
    )
        .into_response()
}
