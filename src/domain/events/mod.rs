//! Domain events

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::OrderStatus;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced { order_id: Uuid, order_number: String, customer_id: Uuid, subtotal: Decimal },
    OrderStatusChanged { order_id: Uuid, from: OrderStatus, to: OrderStatus },
    OrderDeleted { order_id: Uuid },
    CustomerRegistered { customer_id: Uuid, seller_id: Option<Uuid> },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "storefront.order.placed",
            Self::OrderStatusChanged { .. } => "storefront.order.status_changed",
            Self::OrderDeleted { .. } => "storefront.order.deleted",
            Self::CustomerRegistered { .. } => "storefront.customer.registered",
        }
    }
}
