use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::api::error_response;
use crate::entities::product;
use crate::services::catalog::{self, ProductFilter};

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", get(get_products))
        .route("/product/:id", get(get_product))
        .layer(Extension(db))
}

async fn get_products(
    Query(params): Query<GetProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
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

    let filter = ProductFilter {
        search: params.q,
        category_id: params.category_id,
    };

    match catalog::list_products(&txn, &filter).await {
        Ok(products) => {
            let response: Vec<PublicProductResponse> = products
                .into_iter()
                .map(PublicProductResponse::new)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match catalog::get_product(&*db, id).await {
        Ok(prod) => (StatusCode::OK, Json(PublicProductResponse::new(prod))).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
struct GetProductsQuery {
    q: Option<String>,
    category_id: Option<i32>,
}

#[derive(Serialize)]
struct PublicProductResponse {
    id: i32,
    name: String,
    price: Decimal,
    description: String,
    stock: u32,
    category_id: i32,
}

impl PublicProductResponse {
    fn new(value: product::Model) -> PublicProductResponse {
        PublicProductResponse {
            id: value.id,
            name: value.name,
            price: value.price,
            description: value.description,
            stock: value.stock,
            category_id: value.category_id,
        }
    }
}
