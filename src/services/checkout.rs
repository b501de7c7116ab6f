use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entities::{
    cart::{self, Entity as CartEntity},
    cart_item::{self, Entity as CartItemEntity},
    order,
    order_item,
    product::Entity as ProductEntity,
};
use crate::services::{catalog, StockShortage, StoreError};

#[derive(Debug)]
pub enum CheckoutOutcome {
    Completed { order: order::Model },
    Rejected { shortages: Vec<StockShortage> },
    NoCart,
}

/// Converts the user's cart into an order.
///
/// Runs as one transaction from the first read to the commit: the validation
/// pass collects every shortage before anything is written, and the per-item
/// stock decrement re-validates inside the UPDATE itself, so two checkouts
/// racing over the same product can never drive stock below zero. Any
/// persistence error drops the transaction and leaves no partial order, stock
/// or cart state behind.
pub async fn checkout(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<CheckoutOutcome, StoreError> {
    let txn = db.begin().await?;

    let cart = match CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .one(&txn)
        .await?
    {
        Some(cart) => cart,
        None => return Ok(CheckoutOutcome::NoCart),
    };

    let rows = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .find_also_related(ProductEntity)
        .all(&txn)
        .await?;

    //Validation pass: every violating line is reported, not just the first.
    let mut shortages = Vec::new();
    for (item, product) in &rows {
        let product = product.as_ref().ok_or(StoreError::NotFound {
            entity: "product",
            id: item.product_id,
        })?;
        if item.quantity > product.stock {
            shortages.push(StockShortage {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock,
                requested: item.quantity,
            });
        }
    }
    if !shortages.is_empty() {
        return Ok(CheckoutOutcome::Rejected { shortages });
    }

    let new_order = order::ActiveModel {
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        is_completed: Set(false),
        ..Default::default()
    };
    let placed = new_order.insert(&txn).await?;

    for (item, product) in rows {
        let product = product.ok_or(StoreError::NotFound {
            entity: "product",
            id: item.product_id,
        })?;

        let new_order_item = order_item::ActiveModel {
            order_id: Set(placed.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            ..Default::default()
        };
        new_order_item.insert(&txn).await?;

        match catalog::reduce_stock(&txn, &product, item.quantity).await {
            Ok(()) => {}
            Err(StoreError::InsufficientStock(shortage)) => {
                //A concurrent checkout won the race after our validation pass.
                txn.rollback().await?;
                return Ok(CheckoutOutcome::Rejected {
                    shortages: vec![shortage],
                });
            }
            Err(err) => return Err(err),
        }
    }

    CartItemEntity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .exec(&txn)
        .await?;
    cart.delete(&txn).await?;

    txn.commit().await?;
    Ok(CheckoutOutcome::Completed { order: placed })
}
