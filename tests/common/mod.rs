#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use storefront::entities::{self, category, product, user};

//A single-connection pool keeps every handle on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    entities::setup_schema(&db).await;
    db
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let new_user = user::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(String::new()),
        role: Set(user::Role::User),
        ..Default::default()
    };
    new_user.insert(db).await.expect("Failed to seed user")
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> category::Model {
    let new_category = category::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    };
    new_category
        .insert(db)
        .await
        .expect("Failed to seed category")
}

pub async fn seed_product(
    db: &DatabaseConnection,
    category_id: i32,
    name: &str,
    description: &str,
    price: &str,
    stock: u32,
) -> product::Model {
    let new_product = product::ActiveModel {
        name: Set(name.to_owned()),
        description: Set(description.to_owned()),
        price: Set(price.parse::<Decimal>().expect("Bad price literal")),
        stock: Set(stock),
        category_id: Set(category_id),
        ..Default::default()
    };
    new_product
        .insert(db)
        .await
        .expect("Failed to seed product")
}
