//! Customer cart and checkout

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Principal;
use crate::db;
use crate::domain::aggregates::{order, Cart, CartChange, CartError, CartItem, CartLine, Order, OrderDetail};
use crate::domain::events::DomainEvent;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_items: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self { subtotal: cart.subtotal(), total_items: cart.total_items(), items: cart.lines }
    }
}

async fn load_cart(s: &AppState, customer_id: Uuid) -> ApiResult<Cart> {
    let lines = db::cart::active_lines(&s.db, customer_id).await?;
    Ok(Cart::new(customer_id, lines))
}

/// GET /api/cart
pub async fn get_cart(State(s): State<AppState>, Extension(me): Extension<Principal>) -> ApiResult<Json<CartResponse>> {
    Ok(Json(load_cart(&s, me.id).await?.into()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub variant_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// POST /api/cart
pub async fn add_to_cart(
    State(s): State<AppState>,
    Extension(me): Extension<Principal>,
    Json(r): Json<AddToCartRequest>,
) -> ApiResult<(StatusCode, Json<CartItem>)> {
    r.validate()?;
    let quantity = r.quantity.unsigned_abs();

    let variant = db::variants::find(&s.db, r.variant_id).await?.ok_or(ApiError::NotFound("variant"))?;
    db::products::find(&s.db, variant.product_id, false).await?.ok_or(ApiError::NotFound("product"))?;

    let cart = load_cart(&s, me.id).await?;
    let (status, item) = match cart.plan_add(variant.id, quantity, variant.available())? {
        CartChange::Increment { item_id, quantity } => {
            let item = db::cart::set_quantity(&s.db, me.id, item_id, to_i32(quantity)?)
                .await?
                .ok_or(ApiError::NotFound("cart item"))?;
            (StatusCode::OK, item)
        }
        CartChange::Insert { quantity } => {
            let item = db::cart::insert(&s.db, me.id, variant.id, to_i32(quantity)?).await?;
            (StatusCode::CREATED, item)
        }
    };
    Ok((status, Json(item)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// PUT /api/cart/items/:id
pub async fn update_item(
    State(s): State<AppState>,
    Extension(me): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateCartItemRequest>,
) -> ApiResult<Json<CartItem>> {
    r.validate()?;
    let cart = load_cart(&s, me.id).await?;
    let quantity = cart.plan_update(id, r.quantity.unsigned_abs()).map_err(|e| match e {
        CartError::ItemNotFound => ApiError::NotFound("cart item"),
        other => other.into(),
    })?;
    db::cart::set_quantity(&s.db, me.id, id, to_i32(quantity)?)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("cart item"))
}

/// DELETE /api/cart/items/:id
pub async fn remove_item(State(s): State<AppState>, Extension(me): Extension<Principal>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::cart::remove(&s.db, me.id, id).await? {
        return Err(ApiError::NotFound("cart item"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// POST /api/checkout
///
/// Stock is decremented, the order written and the cart archived in a single
/// transaction; any shortfall rolls the whole checkout back.
pub async fn checkout(
    State(s): State<AppState>,
    Extension(me): Extension<Principal>,
    Json(r): Json<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<OrderDetail>)> {
    r.validate()?;
    let customer = db::customers::find_active(&s.db, me.id).await?.ok_or(ApiError::Forbidden("account disabled"))?;
    let settings = db::settings::get(&s.db).await?;

    let mut tx = s.db.begin().await?;

    db::cart::lock_active(&mut *tx, me.id).await?;
    let cart = Cart::new(me.id, db::cart::active_lines(&mut *tx, me.id).await?);
    let number = db::orders::next_number(&mut *tx).await?;
    let detail = Order::from_cart(number, customer.seller_id, &cart, r.notes)?;
    order::ensure_minimum(detail.order.subtotal, settings.minimum_order_value)?;

    for line in &cart.lines {
        if !db::variants::decrement_stock(&mut *tx, line.item.variant_id, line.item.quantity).await? {
            return Err(ApiError::bad_request(format!("insufficient stock for {} ({})", line.product_name, line.pricing.label)));
        }
    }

    db::orders::insert(&mut *tx, &detail).await?;
    let item_ids: Vec<Uuid> = cart.lines.iter().map(|l| l.item.id).collect();
    let archived = db::cart::archive(&mut *tx, me.id, &item_ids, detail.order.id).await?;
    if archived != item_ids.len() as u64 {
        // Dropping `tx` rolls back the order and the stock changes.
        return Err(ApiError::bad_request("cart changed during checkout, please try again"));
    }
    tx.commit().await?;

    tracing::info!(order_id = %detail.order.id, order_number = %detail.order.order_number, "order placed");
    s.events
        .publish(DomainEvent::OrderPlaced {
            order_id: detail.order.id,
            order_number: detail.order.order_number.clone(),
            customer_id: me.id,
            subtotal: detail.order.subtotal,
        })
        .await;

    Ok((StatusCode::CREATED, Json(detail)))
}

fn to_i32(quantity: u32) -> ApiResult<i32> {
    i32::try_from(quantity).map_err(|_| ApiError::bad_request("quantity too large"))
}
