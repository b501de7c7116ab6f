use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
};

use crate::entities::{
    category::{self, Entity as CategoryEntity},
    product::{self, Entity as ProductEntity},
};
use crate::services::{StockShortage, StoreError};

pub async fn list_categories<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<category::Model>, StoreError> {
    Ok(CategoryEntity::find().all(db).await?)
}

#[derive(Debug, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<i32>,
}

//`search` matches as a case-insensitive substring against name or description.
pub async fn list_products<C: ConnectionTrait>(
    db: &C,
    filter: &ProductFilter,
) -> Result<Vec<product::Model>, StoreError> {
    let mut query = ProductEntity::find();

    if let Some(search) = filter.search.as_deref() {
        query = query.filter(
            Condition::any()
                .add(product::Column::Name.contains(search))
                .add(product::Column::Description.contains(search)),
        );
    }

    if let Some(category_id) = filter.category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }

    Ok(query.all(db).await?)
}

pub async fn get_product<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<product::Model, StoreError> {
    ProductEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "product",
            id,
        })
}

/// Decrements `product.stock` by `amount` in a single conditional UPDATE.
///
/// The `stock >= amount` guard rides inside the statement, so a concurrent
/// checkout that drained the product between our read and this write shows up
/// as zero affected rows instead of negative stock.
pub async fn reduce_stock<C: ConnectionTrait>(
    db: &C,
    product: &product::Model,
    amount: u32,
) -> Result<(), StoreError> {
    let result = ProductEntity::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(amount),
        )
        .filter(product::Column::Id.eq(product.id))
        .filter(product::Column::Stock.gte(amount))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let current = get_product(db, product.id).await?;
        return Err(StoreError::InsufficientStock(StockShortage {
            product_id: product.id,
            name: product.name.clone(),
            available: current.stock,
            requested: amount,
        }));
    }

    Ok(())
}
