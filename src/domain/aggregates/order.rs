//! Order aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cart::Cart;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Invoiced,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Invoiced)
                | (Confirmed, Cancelled)
                | (Invoiced, Shipped)
                | (Shipped, Delivered)
        )
    }

    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OrderError::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Invoiced => "invoiced",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub variant_label: String,
    pub quantity: i32,
    pub items_per_unit: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// `ORD-00000042` from the next value of `order_number_seq`.
    pub fn format_number(sequence: i64) -> String {
        format!("ORD-{sequence:08}")
    }

    /// Snapshots the active cart lines into a pending order.
    pub fn from_cart(
        order_number: String,
        seller_id: Option<Uuid>,
        cart: &Cart,
        notes: Option<String>,
    ) -> Result<OrderDetail, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let id = Uuid::now_v7();
        let now = Utc::now();
        let items: Vec<OrderItem> = cart
            .lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::now_v7(),
                order_id: id,
                product_id: line.product_id,
                variant_id: line.item.variant_id,
                sku: line.sku.clone(),
                name: line.product_name.clone(),
                variant_label: line.pricing.label.clone(),
                quantity: line.item.quantity,
                items_per_unit: i32::try_from(line.pricing.items_per_unit).unwrap_or(i32::MAX),
                unit_price: line.pricing.unit_price,
                total: line.total(),
            })
            .collect();

        let order = Order {
            id,
            order_number,
            customer_id: cart.customer_id,
            seller_id,
            status: OrderStatus::Pending,
            subtotal: cart.subtotal(),
            total_items: i32::try_from(cart.total_items()).map_err(|_| OrderError::TooManyItems)?,
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: now,
            updated_at: now,
        };

        Ok(OrderDetail { order, items })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("order has too many items")]
    TooManyItems,
    #[error("order total {subtotal} is below the minimum of {minimum}")]
    BelowMinimum { subtotal: Decimal, minimum: Decimal },
    #[error("cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

/// Stores may configure a minimum order value; zero disables the check.
pub fn ensure_minimum(subtotal: Decimal, minimum: Decimal) -> Result<(), OrderError> {
    if minimum > Decimal::ZERO && subtotal < minimum {
        return Err(OrderError::BelowMinimum { subtotal, minimum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::line;

    #[test]
    fn test_order_from_cart() {
        let customer = Uuid::now_v7();
        let seller = Uuid::now_v7();
        let cart = Cart::new(
            customer,
            vec![
                line(customer, Uuid::now_v7(), 2, Decimal::new(9000, 2), 6, 10),
                line(customer, Uuid::now_v7(), 1, Decimal::new(1500, 2), 1, 10),
            ],
        );

        let detail = Order::from_cart("ORD-00000001".into(), Some(seller), &cart, Some("  leave at dock ".into())).unwrap();
        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.customer_id, customer);
        assert_eq!(detail.order.subtotal, Decimal::new(19500, 2));
        assert_eq!(detail.order.total_items, 13);
        assert_eq!(detail.order.notes.as_deref(), Some("leave at dock"));
        assert_eq!(detail.items.len(), 2);
        assert!(detail.items.iter().all(|i| i.order_id == detail.order.id));
        assert_eq!(detail.items[0].total, Decimal::new(18000, 2));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let cart = Cart::new(Uuid::now_v7(), vec![]);
        assert_eq!(Order::from_cart("ORD-1".into(), None, &cart, None).unwrap_err(), OrderError::EmptyCart);
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert_eq!(Pending.transition(Confirmed), Ok(Confirmed));
        assert_eq!(Confirmed.transition(Cancelled), Ok(Cancelled));
        assert!(Shipped.transition(Cancelled).is_err());
        assert!(Delivered.transition(Pending).is_err());
        assert!(Pending.transition(Shipped).is_err());
    }

    #[test]
    fn test_minimum_order_value() {
        assert!(ensure_minimum(Decimal::new(50, 0), Decimal::ZERO).is_ok());
        assert!(ensure_minimum(Decimal::new(500, 0), Decimal::new(300, 0)).is_ok());
        assert_eq!(
            ensure_minimum(Decimal::new(100, 0), Decimal::new(300, 0)),
            Err(OrderError::BelowMinimum { subtotal: Decimal::new(100, 0), minimum: Decimal::new(300, 0) })
        );
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(Order::format_number(42), "ORD-00000042");
        assert_eq!(Order::format_number(123_456_789), "ORD-123456789");
    }
}
