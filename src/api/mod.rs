pub mod admin;
pub mod public;
pub mod user;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::logging::logging_middleware;
use crate::services::StoreError;

use admin::admin_api_router;
use public::public_api_router;
use user::user_api_router;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .nest("/api", public_api_router(shared_db.clone()))
        .nest("/api", user_api_router(shared_db.clone()))
        .nest("/api/admin", admin_api_router(shared_db.clone()))
        .layer(middleware::from_fn(logging_middleware))
}

//Single place that turns a service error into an HTTP response, so every
//handler reports the same statuses for the same conditions.
pub(crate) fn error_response(err: StoreError) -> Response {
    match &err {
        StoreError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": err.to_string()
            })),
        )
            .into_response(),
        StoreError::Forbidden { .. } => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": err.to_string()
            })),
        )
            .into_response(),
        StoreError::InsufficientStock(shortage) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": err.to_string(),
                "product_id": shortage.product_id,
                "available": shortage.available,
                "requested": shortage.requested,
            })),
        )
            .into_response(),
        StoreError::Db(db_err) => {
            tracing::error!(error = %db_err, "Database failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response()
        }
    }
}
