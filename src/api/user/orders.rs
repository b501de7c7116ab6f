use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    order::{self, Entity as OrderEntity},
    order_item::{self, Entity as OrderItemEntity},
    product::Entity as ProductEntity,
};
use crate::middleware::auth::Claims;

pub fn orders_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/orders", get(get_orders))
        .route("/orders/:id", get(get_order))
        .layer(Extension(db))
}

async fn get_orders(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let result = OrderEntity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .all(&*db)
        .await;

    match result {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn get_order(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let user_id = claims.user_id;
    let placed = match OrderEntity::find_by_id(id)
        .filter(order::Column::UserId.eq(user_id))
        .one(&*db)
        .await
    {
        Ok(Some(placed)) => placed,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": format!("No order with {} id was found.", id)
                })),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response();
        }
    };

    let rows = match OrderItemEntity::find()
        .filter(order_item::Column::OrderId.eq(placed.id))
        .find_also_related(ProductEntity)
        .all(&*db)
        .await
    {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response();
        }
    };

    let items: Vec<OrderItemResponse> = rows
        .into_iter()
        .map(|(item, product)| OrderItemResponse {
            product_id: item.product_id,
            name: product.map(|prod| prod.name),
            quantity: item.quantity,
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "id": placed.id,
            "created_at": placed.created_at,
            "is_completed": placed.is_completed,
            "items": items
        })),
    )
        .into_response()
}

#[derive(Serialize)]
struct OrderItemResponse {
    product_id: i32,
    name: Option<String>,
    quantity: u32,
}
