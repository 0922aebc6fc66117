//! Login endpoints for back-office users and customers

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::verify_password;
use crate::auth::{Principal, Role};
use crate::db::{self, customers::Customer, users::User};
use crate::domain::value_objects::Email;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct CustomerLoginResponse {
    pub token: String,
    pub customer: Customer,
}

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// POST /api/auth/login
pub async fn admin_login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> ApiResult<Json<AdminLoginResponse>> {
    r.validate()?;
    let email = Email::new(&r.email)?;

    let user = db::users::find_by_email(&s.db, email.as_str())
        .await?
        .filter(|u| verify_password(&r.password, &u.password_hash))
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;
    if !user.active {
        return Err(ApiError::Forbidden("account disabled"));
    }

    let token = s.tokens.issue(user.id, Role::Admin)?;
    tracing::info!(user_id = %user.id, "admin login");
    Ok(Json(AdminLoginResponse { token, user }))
}

/// POST /api/customers/login
pub async fn customer_login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> ApiResult<Json<CustomerLoginResponse>> {
    r.validate()?;
    let email = Email::new(&r.email)?;

    let customer = db::customers::find_by_email(&s.db, email.as_str())
        .await?
        .filter(|c| verify_password(&r.password, &c.password_hash))
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;
    if !customer.active {
        return Err(ApiError::Forbidden("account disabled"));
    }

    let token = s.tokens.issue(customer.id, Role::Customer)?;
    Ok(Json(CustomerLoginResponse { token, customer }))
}

/// GET /api/me
pub async fn me(State(s): State<AppState>, Extension(principal): Extension<Principal>) -> ApiResult<Json<Customer>> {
    db::customers::find(&s.db, principal.id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("customer"))
}
