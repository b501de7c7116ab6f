use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::api::error_response;
use crate::middleware::auth::Claims;
use crate::services::checkout::{self, CheckoutOutcome};

pub fn checkout_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/checkout", post(run_checkout))
        .layer(Extension(db))
}

async fn run_checkout(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let user_id = claims.user_id;

    match checkout::checkout(&db, user_id).await {
        Ok(CheckoutOutcome::Completed { order }) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Order placed successfully",
                "order_id": order.id
            })),
        )
            .into_response(),
        Ok(CheckoutOutcome::Rejected { shortages }) => {
            let errors: Vec<serde_json::Value> = shortages
                .iter()
                .map(|shortage| {
                    json!({
                        "product_id": shortage.product_id,
                        "name": shortage.name,
                        "available": shortage.available,
                        "requested": shortage.requested,
                        "error": format!(
                            "Not enough stock for {}: only {} left",
                            shortage.name, shortage.available
                        ),
                    })
                })
                .collect();
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "errors": errors
                })),
            )
                .into_response()
        }
        Ok(CheckoutOutcome::NoCart) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No active cart"
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
