pub mod user;
pub mod category;
pub mod product;
pub mod cart;
pub mod cart_item;
pub mod order;
pub mod order_item;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Schema, Set,
    TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{
    cart::Entity as Cart,
    cart_item::Entity as CartItem,
    category::Entity as Category,
    order::Entity as Order,
    order_item::Entity as OrderItem,
    product::Entity as Product,
    user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());
    let create_user_table = schema.create_table_from_entity(User);
    let create_category_table = schema.create_table_from_entity(Category);
    let create_product_table = schema.create_table_from_entity(Product);
    let create_cart_table = schema.create_table_from_entity(Cart);
    let create_cart_item_table = schema.create_table_from_entity(CartItem);
    let create_order_table = schema.create_table_from_entity(Order);
    let create_order_item_table = schema.create_table_from_entity(OrderItem);

    db.execute(db.get_database_backend().build(&create_user_table))
        .await
        .expect("Failed to create user schema");
    db.execute(db.get_database_backend().build(&create_category_table))
        .await
        .expect("Failed to create category schema");
    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create product schema");
    db.execute(db.get_database_backend().build(&create_cart_table))
        .await
        .expect("Failed to create cart schema");
    db.execute(db.get_database_backend().build(&create_cart_item_table))
        .await
        .expect("Failed to create cart item schema");
    db.execute(db.get_database_backend().build(&create_order_table))
        .await
        .expect("Failed to create order schema");
    db.execute(db.get_database_backend().build(&create_order_item_table))
        .await
        .expect("Failed to create order item schema");
}

//Seeds the initial admin account. Skipped once any user exists, so restarts
//against a populated database stay quiet.
pub async fn primary_setup(db: Arc<DatabaseConnection>) {
    let existing = User::find()
        .count(&*db)
        .await
        .expect("Failed to count users during primary setup");
    if existing > 0 {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password("Secret15".as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    let new_admin = user::ActiveModel {
        username: Set("admin".to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    match db.begin().await {
        Ok(txn) => {
            match user::Entity::insert(new_admin).exec(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => {}
                    Err(_) => {
                        panic!("Failed to run primary setup, but function requested.");
                    }
                },
                Err(_) => {
                    let _ = txn.rollback().await;
                    panic!("Failed to run primary setup, but function requested.");
                }
            }
        }
        Err(_) => {
            panic!("Failed to run primary setup, but function requested.");
        }
    }
}
