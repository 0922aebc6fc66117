//! Back-office customer administration

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{self, customers::Customer, Paginated};
use crate::domain::value_objects::Email;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::{non_blank, ListParams};

pub async fn list_customers(State(s): State<AppState>, Query(p): Query<ListParams>) -> ApiResult<Json<Paginated<Customer>>> {
    let page = p.page();
    let (customers, total) = db::customers::list(&s.db, p.search.as_deref(), page).await?;
    Ok(Json(Paginated::new(customers, total, page)))
}

pub async fn get_customer(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Customer>> {
    db::customers::find(&s.db, id).await?.map(Json).ok_or(ApiError::NotFound("customer"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    pub trade_name: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub seller_id: Option<Uuid>,
    pub active: bool,
}

/// CNPJ is fixed at registration and not editable here.
pub async fn update_customer(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<UpdateCustomerRequest>) -> ApiResult<Json<Customer>> {
    r.validate()?;
    let email = Email::new(&r.email)?;
    if let Some(seller_id) = r.seller_id {
        if !db::sellers::exists(&s.db, seller_id).await? {
            return Err(ApiError::bad_request("seller does not exist"));
        }
    }

    let update = db::customers::CustomerUpdate {
        company_name: r.company_name.trim(),
        trade_name: non_blank(&r.trade_name),
        email: email.as_str(),
        phone: non_blank(&r.phone),
        seller_id: r.seller_id,
        active: r.active,
    };
    db::customers::update(&s.db, id, &update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("customer"))
}

pub async fn delete_customer(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::customers::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("customer"));
    }
    Ok(StatusCode::NO_CONTENT)
}
