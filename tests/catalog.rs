mod common;

use sea_orm::EntityTrait;
use tokio;

use storefront::entities::product::Entity as ProductEntity;
use storefront::services::catalog::{self, ProductFilter};
use storefront::services::StoreError;

#[tokio::test]
async fn list_categories_returns_all_seeded() {
    let db = common::setup_db().await;
    common::seed_category(&db, "Pastry").await;
    common::seed_category(&db, "Drinks").await;

    let categories = catalog::list_categories(&db).await.expect("List failed");
    assert_eq!(categories.len(), 2);
}

#[tokio::test]
async fn search_matches_name_or_description_case_insensitively() {
    let db = common::setup_db().await;
    let category = common::seed_category(&db, "Pastry").await;
    common::seed_product(&db, category.id, "Plain Bagel", "Boiled and baked", "10.00", 5).await;
    common::seed_product(&db, category.id, "Sesame Ring", "A crunchy bagel ring", "8.00", 5).await;
    common::seed_product(&db, category.id, "Espresso", "Strong coffee", "3.00", 5).await;

    let filter = ProductFilter {
        search: Some("BAGEL".to_owned()),
        category_id: None,
    };
    let found = catalog::list_products(&db, &filter).await.expect("Search failed");
    assert_eq!(found.len(), 2, "Name and description matches both count");

    let filter = ProductFilter {
        search: Some("coffee".to_owned()),
        category_id: None,
    };
    let found = catalog::list_products(&db, &filter).await.expect("Search failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Espresso");
}

#[tokio::test]
async fn products_filter_by_category() {
    let db = common::setup_db().await;
    let pastry = common::seed_category(&db, "Pastry").await;
    let drinks = common::seed_category(&db, "Drinks").await;
    common::seed_product(&db, pastry.id, "Bagel", "Plain bagel", "10.00", 5).await;
    common::seed_product(&db, drinks.id, "Espresso", "Strong coffee", "3.00", 5).await;

    let filter = ProductFilter {
        search: None,
        category_id: Some(drinks.id),
    };
    let found = catalog::list_products(&db, &filter).await.expect("Filter failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Espresso");

    let everything = catalog::list_products(&db, &ProductFilter::default())
        .await
        .expect("List failed");
    assert_eq!(everything.len(), 2);
}

#[tokio::test]
async fn get_product_reports_not_found() {
    let db = common::setup_db().await;

    let err = catalog::get_product(&db, 42)
        .await
        .expect_err("Missing product should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn reduce_stock_decrements_within_bounds() {
    let db = common::setup_db().await;
    let category = common::seed_category(&db, "Pastry").await;
    let product = common::seed_product(&db, category.id, "Bagel", "Plain bagel", "10.00", 5).await;

    catalog::reduce_stock(&db, &product, 3)
        .await
        .expect("Reduce failed");

    let after = ProductEntity::find_by_id(product.id)
        .one(&db)
        .await
        .expect("Lookup failed")
        .expect("Product missing");
    assert_eq!(after.stock, 2);
}

#[tokio::test]
async fn reduce_stock_refuses_to_go_negative() {
    let db = common::setup_db().await;
    let category = common::seed_category(&db, "Pastry").await;
    let product = common::seed_product(&db, category.id, "Bagel", "Plain bagel", "10.00", 2).await;

    let err = catalog::reduce_stock(&db, &product, 3)
        .await
        .expect_err("Reduce below zero should fail");
    match err {
        StoreError::InsufficientStock(shortage) => {
            assert_eq!(shortage.available, 2);
            assert_eq!(shortage.requested, 3);
        }
        other => panic!("Expected InsufficientStock, got {:?}", other),
    }

    let after = ProductEntity::find_by_id(product.id)
        .one(&db)
        .await
        .expect("Lookup failed")
        .expect("Product missing");
    assert_eq!(after.stock, 2, "Failed decrement must leave stock untouched");
}
