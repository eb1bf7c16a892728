use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use storefront_core::{Entity, ProductId};

/// Decimal places a price is stored with (`NUMERIC(12, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// A catalog row.
///
/// `quantity` is the stock on hand. It is signed on purpose: the repository
/// layer subtracts without guarding, and the order use case is what keeps it
/// from going below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a fresh row from creation data, stamped with `now`.
    pub fn from_new(data: CreateProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            name: data.name,
            price: data
                .price
                .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero),
            quantity: data.quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// DTO: data needed to add a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

/// DTO: how many units of a product to take out of stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductQuantity {
    pub id: ProductId,
    pub quantity: i64,
}

/// Subtract requested quantities from catalog rows, in memory.
///
/// Every entry naming a row is subtracted from it, so a product listed twice
/// loses both amounts. Entries naming no row are ignored. Rows keep their input
/// order; only the ones that matched get `updated_at = now`.
///
/// There is no negative guard here.
pub fn apply_decrements(
    rows: Vec<Product>,
    requested: &[UpdateProductQuantity],
    now: DateTime<Utc>,
) -> Vec<Product> {
    rows.into_iter()
        .map(|mut row| {
            let mut touched = false;
            for req in requested.iter().filter(|r| r.id == row.id) {
                row.quantity -= req.quantity;
                touched = true;
            }
            if touched {
                row.updated_at = now;
            }
            row
        })
        .collect()
}
