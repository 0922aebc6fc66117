//! Orders: customers see their own, admins see and manage all

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::db::{self, orders::OrderFilter, PageRequest, Paginated};
use crate::domain::aggregates::{Order, OrderDetail, OrderStatus};
use crate::domain::events::DomainEvent;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OrderParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}

/// GET /api/orders
pub async fn list_own(
    State(s): State<AppState>,
    Extension(me): Extension<Principal>,
    Query(p): Query<OrderParams>,
) -> ApiResult<Json<Paginated<Order>>> {
    let page = PageRequest::new(p.page, p.per_page);
    let filter = OrderFilter { customer_id: Some(me.id), status: p.status };
    let (orders, total) = db::orders::list(&s.db, filter, page).await?;
    Ok(Json(Paginated::new(orders, total, page)))
}

/// GET /api/orders/:id
pub async fn get_own(State(s): State<AppState>, Extension(me): Extension<Principal>, Path(id): Path<Uuid>) -> ApiResult<Json<OrderDetail>> {
    db::orders::find(&s.db, id, Some(me.id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("order"))
}

/// GET /api/admin/orders
pub async fn list_all(State(s): State<AppState>, Query(p): Query<OrderParams>) -> ApiResult<Json<Paginated<Order>>> {
    let page = PageRequest::new(p.page, p.per_page);
    let filter = OrderFilter { customer_id: p.customer_id, status: p.status };
    let (orders, total) = db::orders::list(&s.db, filter, page).await?;
    Ok(Json(Paginated::new(orders, total, page)))
}

/// GET /api/admin/orders/:id
pub async fn get_any(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<OrderDetail>> {
    db::orders::find(&s.db, id, None).await?.map(Json).ok_or(ApiError::NotFound("order"))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/admin/orders/:id/status
pub async fn update_status(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<StatusRequest>) -> ApiResult<Json<Order>> {
    let current = db::orders::find(&s.db, id, None).await?.ok_or(ApiError::NotFound("order"))?;
    let from = current.order.status;
    let to = from.transition(r.status)?;

    // Guarded on the old status so a concurrent change is not overwritten.
    let order = db::orders::update_status(&s.db, id, from, to)
        .await?
        .ok_or_else(|| ApiError::bad_request("order status changed concurrently, reload and retry"))?;

    tracing::info!(order_id = %id, %from, %to, "order status changed");
    s.events.publish(DomainEvent::OrderStatusChanged { order_id: id, from, to }).await;
    Ok(Json(order))
}

/// DELETE /api/admin/orders/:id
pub async fn delete_order(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::orders::delete(&s.db, id).await? {
        return Err(ApiError::NotFound("order"));
    }
    tracing::info!(order_id = %id, "order deleted");
    s.events.publish(DomainEvent::OrderDeleted { order_id: id }).await;
    Ok(StatusCode::NO_CONTENT)
}
