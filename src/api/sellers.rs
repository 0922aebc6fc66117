//! Sales representatives customers can be assigned to

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{self, sellers::Seller};
use crate::domain::value_objects::Email;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::non_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct SellerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

pub async fn list_sellers(State(s): State<AppState>) -> ApiResult<Json<Vec<Seller>>> {
    Ok(Json(db::sellers::list(&s.db).await?))
}

pub async fn create_seller(State(s): State<AppState>, Json(r): Json<SellerRequest>) -> ApiResult<(StatusCode, Json<Seller>)> {
    r.validate()?;
    let email = Email::new(&r.email)?;
    let seller = db::sellers::create(&s.db, r.name.trim(), email.as_str(), non_blank(&r.phone)).await?;
    Ok((StatusCode::CREATED, Json(seller)))
}

pub async fn update_seller(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<SellerRequest>) -> ApiResult<Json<Seller>> {
    r.validate()?;
    let email = Email::new(&r.email)?;
    db::sellers::update(&s.db, id, r.name.trim(), email.as_str(), non_blank(&r.phone), r.active)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("seller"))
}

pub async fn delete_seller(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::sellers::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("seller"));
    }
    Ok(StatusCode::NO_CONTENT)
}
