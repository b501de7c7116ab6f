use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::api::error_response;
use crate::middleware::auth::Claims;
use crate::services::cart::{self, CartLine, CartView, Fetched, ItemUpdate};

//ROUTERS
pub fn cart_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_product))
        .route("/cart/:id", patch(patch_entry).delete(remove_product))
        .layer(Extension(db))
}

async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match cart::view_cart(&txn, user_id).await {
        Ok(CartView::Missing) => (
            StatusCode::OK,
            Json(json!({
                "empty": true
            })),
        )
            .into_response(),
        Ok(CartView::Items { lines, total }) => {
            let items: Vec<CartLineResponse> =
                lines.into_iter().map(CartLineResponse::new).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "items": items,
                    "total": total
                })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn add_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddProduct>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let quantity = payload.quantity.unwrap_or(1);
    if quantity == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Quantity should be greater than 0"
            })),
        )
            .into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match cart::add_item(&txn, user_id, payload.product_id, quantity).await {
        Ok(added) => {
            if txn.commit().await.is_err() {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response();
            }
            match added {
                Fetched::Created(item) => (
                    StatusCode::CREATED,
                    Json(json!({
                        "message": "Added successfully",
                        "item_id": item.id,
                        "quantity": item.quantity
                    })),
                )
                    .into_response(),
                Fetched::Found(item) => (
                    StatusCode::OK,
                    Json(json!({
                        "message": "Resource patched successfully",
                        "item_id": item.id,
                        "quantity": item.quantity
                    })),
                )
                    .into_response(),
            }
        }
        Err(err) => {
            let _ = txn.rollback().await;
            error_response(err)
        }
    }
}

async fn remove_product(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match cart::remove_item(&txn, user_id, id).await {
        Ok(()) => match txn.commit().await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "message": "Resource deleted successfully"
                })),
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response(),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            error_response(err)
        }
    }
}

async fn patch_entry(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCart>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match cart::update_item_quantity(&txn, user_id, id, payload.quantity).await {
        Ok(updated) => {
            if txn.commit().await.is_err() {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response();
            }
            match updated {
                ItemUpdate::Updated(item) => (
                    StatusCode::OK,
                    Json(json!({
                        "message": "Resource patched successfully",
                        "quantity": item.quantity
                    })),
                )
                    .into_response(),
                ItemUpdate::Removed => (
                    StatusCode::OK,
                    Json(json!({
                        "message": "Resource deleted successfully"
                    })),
                )
                    .into_response(),
            }
        }
        Err(err) => {
            let _ = txn.rollback().await;
            error_response(err)
        }
    }
}

//Structs
#[derive(Deserialize, Debug)]
struct AddProduct {
    product_id: i32,
    quantity: Option<u32>,
}

#[derive(Deserialize)]
struct PatchCart {
    quantity: u32,
}

#[derive(Serialize)]
struct CartLineResponse {
    id: i32,
    product_id: i32,
    name: String,
    price: Decimal,
    quantity: u32,
    line_total: Decimal,
}

impl CartLineResponse {
    fn new(line: CartLine) -> CartLineResponse {
        CartLineResponse {
            id: line.item.id,
            product_id: line.product.id,
            name: line.product.name,
            price: line.product.price,
            quantity: line.item.quantity,
            line_total: line.line_total,
        }
    }
}
