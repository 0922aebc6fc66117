//! Customer invitations: admins issue a link, the customer signs up with it

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::auth::{Principal, Role};
use crate::db::{self, customers::Customer, registration_links::RegistrationLink};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Cnpj, Email};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::non_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub seller_id: Option<uuid::Uuid>,
}

/// POST /api/admin/registration-links
pub async fn create_link(
    State(s): State<AppState>,
    Extension(admin): Extension<Principal>,
    Json(r): Json<CreateLinkRequest>,
) -> ApiResult<(StatusCode, Json<RegistrationLink>)> {
    r.validate()?;
    let email = non_blank(&r.email).map(Email::new).transpose()?;
    if let Some(seller_id) = r.seller_id {
        if !db::sellers::exists(&s.db, seller_id).await? {
            return Err(ApiError::bad_request("seller does not exist"));
        }
    }

    let expires_at = Utc::now() + s.registration_link_ttl;
    let link = db::registration_links::create(&s.db, email.as_ref().map(Email::as_str), r.seller_id, admin.id, expires_at).await?;
    tracing::info!(link_id = %link.id, "registration link issued");
    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/admin/registration-links
pub async fn list_links(State(s): State<AppState>) -> ApiResult<Json<Vec<RegistrationLink>>> {
    Ok(Json(db::registration_links::list(&s.db).await?))
}

#[derive(Serialize)]
pub struct LinkStatus {
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// GET /api/registration/:token
pub async fn check(State(s): State<AppState>, Path(token): Path<String>) -> ApiResult<Json<LinkStatus>> {
    let link = db::registration_links::find_by_token(&s.db, &token)
        .await?
        .ok_or(ApiError::NotFound("registration link"))?;
    if !link.is_usable(Utc::now()) {
        return Err(ApiError::bad_request("registration link expired or already used"));
    }
    Ok(Json(LinkStatus { email: link.email, expires_at: link.expires_at }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    pub trade_name: Option<String>,
    pub cnpj: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub customer: Customer,
}

/// POST /api/customers/register
pub async fn register(State(s): State<AppState>, Json(r): Json<RegisterRequest>) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    r.validate()?;
    let cnpj = Cnpj::parse(&r.cnpj)?;
    let email = Email::new(&r.email)?;
    let password_hash = hash_password(&r.password)?;

    let mut tx = s.db.begin().await?;

    let link = db::registration_links::find_by_token(&mut *tx, r.token.trim())
        .await?
        .ok_or(ApiError::NotFound("registration link"))?;
    if !link.is_usable(Utc::now()) {
        return Err(ApiError::bad_request("registration link expired or already used"));
    }
    if link.email.as_deref().is_some_and(|invited| invited != email.as_str()) {
        return Err(ApiError::bad_request("this link was issued for a different email"));
    }

    let customer = db::customers::create(
        &mut *tx,
        &db::customers::NewCustomer {
            company_name: r.company_name.trim(),
            trade_name: non_blank(&r.trade_name),
            cnpj: cnpj.digits(),
            email: email.as_str(),
            phone: non_blank(&r.phone),
            password_hash: &password_hash,
            seller_id: link.seller_id,
        },
    )
    .await?;
    db::registration_links::mark_used(&mut *tx, link.id, customer.id).await?;
    tx.commit().await?;

    tracing::info!(customer_id = %customer.id, "customer registered");
    s.events
        .publish(DomainEvent::CustomerRegistered { customer_id: customer.id, seller_id: customer.seller_id })
        .await;

    let token = s.tokens.issue(customer.id, Role::Customer)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { token, customer })))
}
