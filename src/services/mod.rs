pub mod catalog;
pub mod cart;
pub mod checkout;

use sea_orm::DbErr;
use thiserror::Error;

/// Failure taxonomy shared by the catalog, cart and checkout services.
///
/// `InsufficientStock` is a user-recoverable condition and never aborts more
/// of the flow than the single rejected write; `Db` is fatal for the current
/// operation and the owning transaction rolls back.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No {entity} with {id} id was found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Cart item {id} belongs to another user")]
    Forbidden { id: i32 },
    #[error("Not enough stock for {}: only {} left", .0.name, .0.available)]
    InsufficientStock(StockShortage),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StockShortage {
    pub product_id: i32,
    pub name: String,
    pub available: u32,
    pub requested: u32,
}
