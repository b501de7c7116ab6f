mod common;

use reqwest::{header, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tokio;

use storefront::api::create_api_router;
use storefront::entities::primary_setup;

async fn spawn_app(db: DatabaseConnection) -> String {
    std::env::set_var("SECRET", "integration-test-secret");

    let app = create_api_router(Arc::new(db));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

async fn login(client: &reqwest::Client, base: &str, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{base}/api/login"))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login response JSON");
    body["token"]
        .as_str()
        .expect("Token not found in login response")
        .to_owned()
}

fn bearer(token: &str) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("Failed to create Authorization header"),
    );
    headers
}

#[tokio::test]
async fn cart_requires_authentication() {
    let db = common::setup_db().await;
    let base = spawn_app(db).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .expect("Failed to send get cart request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn shopper_flow_from_register_to_checkout() {
    let db = common::setup_db().await;
    let category = common::seed_category(&db, "Pastry").await;
    let product =
        common::seed_product(&db, category.id, "Bagel", "Plain bagel", "10.00", 4).await;
    let base = spawn_app(db).await;
    let client = reqwest::Client::new();

    let register_response = client
        .post(format!("{base}/api/register"))
        .json(&json!({
            "username": "shopper",
            "password": "Muzion15"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(register_response.status(), StatusCode::CREATED);

    let token = login(&client, &base, "shopper", "Muzion15").await;
    let headers = bearer(&token);

    let add_response = client
        .post(format!("{base}/api/cart"))
        .headers(headers.clone())
        .json(&json!({
            "product_id": product.id,
            "quantity": 2
        }))
        .send()
        .await
        .expect("Failed to send add product request");
    assert_eq!(add_response.status(), StatusCode::CREATED);

    //Same product again merges into the existing row.
    let merge_response = client
        .post(format!("{base}/api/cart"))
        .headers(headers.clone())
        .json(&json!({
            "product_id": product.id
        }))
        .send()
        .await
        .expect("Failed to send merge request");
    assert_eq!(merge_response.status(), StatusCode::OK);
    let merge_body = merge_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse merge response JSON");
    assert_eq!(merge_body["quantity"].as_u64(), Some(3));

    let over_response = client
        .post(format!("{base}/api/cart"))
        .headers(headers.clone())
        .json(&json!({
            "product_id": product.id,
            "quantity": 5
        }))
        .send()
        .await
        .expect("Failed to send over-stock request");
    assert_eq!(over_response.status(), StatusCode::CONFLICT);
    let over_body = over_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse over-stock response JSON");
    assert_eq!(over_body["available"].as_u64(), Some(4));

    let cart_response = client
        .get(format!("{base}/api/cart"))
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send get cart request");
    assert_eq!(cart_response.status(), StatusCode::OK);
    let cart_body = cart_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse cart response JSON");
    let items = cart_body["items"].as_array().expect("Cart items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_u64(), Some(3));

    let checkout_response = client
        .post(format!("{base}/api/checkout"))
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(checkout_response.status(), StatusCode::CREATED);

    let emptied_response = client
        .get(format!("{base}/api/cart"))
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send get cart request");
    let emptied_body = emptied_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse cart response JSON");
    assert_eq!(emptied_body["empty"].as_bool(), Some(true));

    let orders_response = client
        .get(format!("{base}/api/orders"))
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send orders request");
    assert_eq!(orders_response.status(), StatusCode::OK);
    let orders_body = orders_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse orders response JSON");
    assert_eq!(orders_body.as_array().map(|orders| orders.len()), Some(1));

    let product_response = client
        .get(format!("{base}/api/product/{}", product.id))
        .send()
        .await
        .expect("Failed to send product request");
    let product_body = product_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");
    assert_eq!(product_body["stock"].as_u64(), Some(1));
}

#[tokio::test]
async fn admin_manages_catalog_and_users_stay_out() {
    let db = common::setup_db().await;
    primary_setup(Arc::new(db.clone())).await;
    let base = spawn_app(db).await;
    let client = reqwest::Client::new();

    let admin_token = login(&client, &base, "admin", "Secret15").await;
    let admin_headers = bearer(&admin_token);

    let category_response = client
        .post(format!("{base}/api/admin/category"))
        .headers(admin_headers.clone())
        .json(&json!({
            "name": "Pastry"
        }))
        .send()
        .await
        .expect("Failed to send create category request");
    assert_eq!(category_response.status(), StatusCode::CREATED);
    let category_body = category_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse category response JSON");
    let category_id = category_body["id"].as_i64().expect("Category id missing");

    let product_response = client
        .post(format!("{base}/api/admin/product"))
        .headers(admin_headers.clone())
        .json(&json!({
            "name": "Bagel",
            "description": "Plain bagel",
            "price": "10.00",
            "stock": 4,
            "category_id": category_id
        }))
        .send()
        .await
        .expect("Failed to send create product request");
    assert_eq!(product_response.status(), StatusCode::CREATED);
    let product_body = product_response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");
    let product_id = product_body["id"].as_i64().expect("Product id missing");

    //Restock goes through the same PATCH as any other product edit.
    let restock_response = client
        .patch(format!("{base}/api/admin/product/{}", product_id))
        .headers(admin_headers.clone())
        .json(&json!({
            "stock": 9
        }))
        .send()
        .await
        .expect("Failed to send restock request");
    assert_eq!(restock_response.status(), StatusCode::OK);

    let product_after = client
        .get(format!("{base}/api/product/{}", product_id))
        .send()
        .await
        .expect("Failed to send product request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse product response JSON");
    assert_eq!(product_after["stock"].as_u64(), Some(9));

    let register_response = client
        .post(format!("{base}/api/register"))
        .json(&json!({
            "username": "shopper",
            "password": "Muzion15"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(register_response.status(), StatusCode::CREATED);
    let user_token = login(&client, &base, "shopper", "Muzion15").await;

    let denied_response = client
        .post(format!("{base}/api/admin/category"))
        .headers(bearer(&user_token))
        .json(&json!({
            "name": "Drinks"
        }))
        .send()
        .await
        .expect("Failed to send denied request");
    assert_eq!(denied_response.status(), StatusCode::UNAUTHORIZED);
}
