use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set,
};

use crate::entities::{
    cart::{self, Entity as CartEntity},
    cart_item::{self, Entity as CartItemEntity},
    product::{self, Entity as ProductEntity},
};
use crate::services::{catalog, StockShortage, StoreError};

/// Get-or-create result; call sites stay exhaustive instead of reading a
/// boolean side flag.
#[derive(Debug)]
pub enum Fetched<T> {
    Created(T),
    Found(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Found(value) => value,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

pub async fn get_or_create_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Fetched<cart::Model>, StoreError> {
    if let Some(existing) = CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(Fetched::Found(existing));
    }

    let new_cart = cart::ActiveModel {
        user_id: Set(user_id),
        ..Default::default()
    };
    Ok(Fetched::Created(new_cart.insert(db).await?))
}

/// Adds `quantity` of a product to the user's cart, merging into the existing
/// row for that product when there is one (`Found` carries the merged row,
/// `Created` a fresh one). A result that would exceed the available stock is
/// not persisted at all; the stored row keeps its prior committed quantity.
pub async fn add_item<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    product_id: i32,
    quantity: u32,
) -> Result<Fetched<cart_item::Model>, StoreError> {
    let product = catalog::get_product(db, product_id).await?;
    let cart = get_or_create_cart(db, user_id).await?.into_inner();

    let existing = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(db)
        .await?;

    let requested = match &existing {
        Some(item) => item.quantity.saturating_add(quantity),
        None => quantity,
    };

    if requested > product.stock {
        return Err(StoreError::InsufficientStock(StockShortage {
            product_id,
            name: product.name,
            available: product.stock,
            requested,
        }));
    }

    match existing {
        Some(item) => {
            let mut item: cart_item::ActiveModel = item.into();
            item.quantity = Set(requested);
            Ok(Fetched::Found(item.update(db).await?))
        }
        None => {
            let new_item = cart_item::ActiveModel {
                cart_id: Set(cart.id),
                product_id: Set(product_id),
                quantity: Set(requested),
                ..Default::default()
            };
            Ok(Fetched::Created(new_item.insert(db).await?))
        }
    }
}

pub async fn remove_item<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    item_id: i32,
) -> Result<(), StoreError> {
    let item = owned_item(db, user_id, item_id).await?;
    item.delete(db).await?;
    Ok(())
}

#[derive(Debug)]
pub enum ItemUpdate {
    Updated(cart_item::Model),
    Removed,
}

/// Sets the stored quantity of a cart item. Quantity 0 removes the row;
/// a quantity above the available stock is rejected and the row is left
/// unchanged.
pub async fn update_item_quantity<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    item_id: i32,
    quantity: u32,
) -> Result<ItemUpdate, StoreError> {
    let item = owned_item(db, user_id, item_id).await?;

    if quantity == 0 {
        item.delete(db).await?;
        return Ok(ItemUpdate::Removed);
    }

    let product = catalog::get_product(db, item.product_id).await?;
    if quantity > product.stock {
        return Err(StoreError::InsufficientStock(StockShortage {
            product_id: product.id,
            name: product.name,
            available: product.stock,
            requested: quantity,
        }));
    }

    let mut item: cart_item::ActiveModel = item.into();
    item.quantity = Set(quantity);
    Ok(ItemUpdate::Updated(item.update(db).await?))
}

#[derive(Debug)]
pub struct CartLine {
    pub item: cart_item::Model,
    pub product: product::Model,
    pub line_total: Decimal,
}

/// `Missing` is a user with no cart at all, which is not the same state as a
/// cart whose last item was just removed.
#[derive(Debug)]
pub enum CartView {
    Missing,
    Items { lines: Vec<CartLine>, total: Decimal },
}

pub async fn view_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<CartView, StoreError> {
    let cart = match CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        Some(cart) => cart,
        None => return Ok(CartView::Missing),
    };

    let rows = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .find_also_related(ProductEntity)
        .all(db)
        .await?;

    let mut lines = Vec::with_capacity(rows.len());
    let mut total = Decimal::ZERO;
    for (item, product) in rows {
        let product = product.ok_or(StoreError::NotFound {
            entity: "product",
            id: item.product_id,
        })?;
        let line_total = Decimal::from(item.quantity) * product.price;
        total += line_total;
        lines.push(CartLine {
            item,
            product,
            line_total,
        });
    }

    Ok(CartView::Items { lines, total })
}

//Resolves an item id against the requesting user; an item in someone else's
//cart is Forbidden, not NotFound, so the two cases stay distinguishable.
async fn owned_item<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    item_id: i32,
) -> Result<cart_item::Model, StoreError> {
    let item = CartItemEntity::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "cart item",
            id: item_id,
        })?;

    let cart = CartEntity::find_by_id(item.cart_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "cart",
            id: item.cart_id,
        })?;

    if cart.user_id != user_id {
        return Err(StoreError::Forbidden { id: item_id });
    }

    Ok(item)
}
