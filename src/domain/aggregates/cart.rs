//! Cart aggregate
//!
//! A customer's cart is the set of `active` cart rows. Checkout does not
//! delete rows; it flips them to `archived` and stamps the order id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::product::VariantPricing;
use crate::domain::value_objects::line_total;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cart_item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CartItemStatus {
    Active,
    Archived,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub variant_id: Uuid,
    pub quantity: i32,
    pub status: CartItemStatus,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with what it takes to price it.
#[derive(Clone, Debug, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub available: u32,
    #[serde(flatten)]
    pub pricing: VariantPricing,
}

impl CartLine {
    pub fn quantity(&self) -> u32 {
        u32::try_from(self.item.quantity).unwrap_or(0)
    }

    pub fn total(&self) -> Decimal {
        line_total(self.pricing.unit_price, self.quantity())
    }

    pub fn pieces(&self) -> u64 {
        u64::from(self.quantity()) * u64::from(self.pricing.items_per_unit)
    }
}

/// How an add-to-cart request lands in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartChange {
    Increment { item_id: Uuid, quantity: u32 },
    Insert { quantity: u32 },
}

#[derive(Clone, Debug, Serialize)]
pub struct Cart {
    pub customer_id: Uuid,
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(customer_id: Uuid, lines: Vec<CartLine>) -> Self {
        Self {
            customer_id,
            lines: lines.into_iter().filter(|l| l.item.status == CartItemStatus::Active).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(CartLine::pieces).sum()
    }

    pub fn line(&self, item_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item.id == item_id)
    }

    /// Adding a variant that is already in the cart bumps its quantity
    /// instead of creating a second row.
    pub fn plan_add(&self, variant_id: Uuid, quantity: u32, available: u32) -> Result<CartChange, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let existing = self.lines.iter().find(|l| l.item.variant_id == variant_id);
        let wanted = existing.map_or(0, CartLine::quantity).saturating_add(quantity);
        if wanted > available {
            return Err(CartError::InsufficientStock { requested: wanted, available });
        }
        Ok(match existing {
            Some(line) => CartChange::Increment { item_id: line.item.id, quantity: wanted },
            None => CartChange::Insert { quantity },
        })
    }

    pub fn plan_update(&self, item_id: Uuid, quantity: u32) -> Result<u32, CartError> {
        let line = self.line(item_id).ok_or(CartError::ItemNotFound)?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if quantity > line.available {
            return Err(CartError::InsufficientStock { requested: quantity, available: line.available });
        }
        Ok(quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart item not found")]
    ItemNotFound,
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
}

#[cfg(test)]
pub(crate) fn line(customer_id: Uuid, variant_id: Uuid, quantity: i32, unit_price: Decimal, items_per_unit: u32, available: u32) -> CartLine {
    CartLine {
        item: CartItem {
            id: Uuid::now_v7(),
            customer_id,
            variant_id,
            quantity,
            status: CartItemStatus::Active,
            order_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        product_id: Uuid::now_v7(),
        product_name: "Basic tee".into(),
        sku: "TSHIRT-01-M".into(),
        available,
        pricing: VariantPricing { unit_price, items_per_unit, label: "M".into() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_existing_variant_increments() {
        let customer = Uuid::now_v7();
        let variant = Uuid::now_v7();
        let existing = line(customer, variant, 2, Decimal::TEN, 1, 10);
        let existing_id = existing.item.id;
        let cart = Cart::new(customer, vec![existing]);

        assert_eq!(cart.plan_add(variant, 3, 10), Ok(CartChange::Increment { item_id: existing_id, quantity: 5 }));
        assert_eq!(cart.plan_add(Uuid::now_v7(), 3, 10), Ok(CartChange::Insert { quantity: 3 }));
    }

    #[test]
    fn test_archived_rows_are_not_reused() {
        let customer = Uuid::now_v7();
        let variant = Uuid::now_v7();
        let mut archived = line(customer, variant, 2, Decimal::TEN, 1, 10);
        archived.item.status = CartItemStatus::Archived;
        archived.item.order_id = Some(Uuid::now_v7());
        let cart = Cart::new(customer, vec![archived]);

        assert!(cart.is_empty());
        assert_eq!(cart.plan_add(variant, 1, 10), Ok(CartChange::Insert { quantity: 1 }));
    }

    #[test]
    fn test_add_respects_stock() {
        let customer = Uuid::now_v7();
        let variant = Uuid::now_v7();
        let cart = Cart::new(customer, vec![line(customer, variant, 4, Decimal::TEN, 1, 5)]);
        assert_eq!(cart.plan_add(variant, 2, 5), Err(CartError::InsufficientStock { requested: 6, available: 5 }));
        assert_eq!(cart.plan_add(variant, 0, 5), Err(CartError::InvalidQuantity));
    }

    #[test]
    fn test_totals_count_grade_pieces() {
        let customer = Uuid::now_v7();
        let cart = Cart::new(
            customer,
            vec![
                line(customer, Uuid::now_v7(), 2, Decimal::new(9000, 2), 6, 10),
                line(customer, Uuid::now_v7(), 3, Decimal::new(1500, 2), 1, 10),
            ],
        );
        assert_eq!(cart.subtotal(), Decimal::new(22500, 2));
        assert_eq!(cart.total_items(), 15);
    }

    #[test]
    fn test_plan_update() {
        let customer = Uuid::now_v7();
        let l = line(customer, Uuid::now_v7(), 1, Decimal::ONE, 1, 3);
        let id = l.item.id;
        let cart = Cart::new(customer, vec![l]);
        assert_eq!(cart.plan_update(id, 3), Ok(3));
        assert_eq!(cart.plan_update(id, 4), Err(CartError::InsufficientStock { requested: 4, available: 3 }));
        assert_eq!(cart.plan_update(Uuid::now_v7(), 1), Err(CartError::ItemNotFound));
    }
}
