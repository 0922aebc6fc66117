//! Back-office user accounts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, MIN_PASSWORD_LEN};
use crate::auth::Principal;
use crate::db::{self, users::User};
use crate::domain::value_objects::Email;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Required on create; omit on update to keep the current password.
    pub password: Option<String>,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

fn hash_if_present(password: Option<&str>) -> ApiResult<Option<String>> {
    match password {
        Some(p) if p.len() < MIN_PASSWORD_LEN => {
            Err(ApiError::bad_request(format!("password must be at least {MIN_PASSWORD_LEN} characters")))
        }
        Some(p) => Ok(Some(hash_password(p)?)),
        None => Ok(None),
    }
}

pub async fn list_users(State(s): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(db::users::list(&s.db).await?))
}

pub async fn create_user(State(s): State<AppState>, Json(r): Json<UserRequest>) -> ApiResult<(StatusCode, Json<User>)> {
    r.validate()?;
    let email = Email::new(&r.email)?;
    let hash = hash_if_present(r.password.as_deref())?.ok_or(ApiError::bad_request("password is required"))?;
    let user = db::users::create(&s.db, r.name.trim(), email.as_str(), &hash).await?;
    tracing::info!(user_id = %user.id, "back-office user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<UserRequest>) -> ApiResult<Json<User>> {
    r.validate()?;
    let email = Email::new(&r.email)?;
    let hash = hash_if_present(r.password.as_deref())?;
    db::users::update(&s.db, id, r.name.trim(), email.as_str(), hash.as_deref(), r.active)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("user"))
}

pub async fn delete_user(State(s): State<AppState>, Extension(me): Extension<Principal>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if me.id == id {
        return Err(ApiError::bad_request("you cannot delete your own account"));
    }
    if !db::users::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("user"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_if_present() {
        assert!(hash_if_present(None).unwrap().is_none());
        assert!(hash_if_present(Some("short")).is_err());
        assert!(hash_if_present(Some("long enough")).unwrap().is_some());
    }
}
