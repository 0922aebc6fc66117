//! Bearer-token authentication
//!
//! Admin users and customers both log in for an HS256 token whose `sub` is
//! their id and whose `role` decides which router they may call.

pub mod password;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// Authenticated caller, inserted into request extensions by the middleware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, id: Uuid, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: id,
            role,
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, ApiError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            tracing::debug!("token validation failed: {e}");
            ApiError::Unauthorized("invalid or expired token")
        })?;
        Ok(Principal { id: data.claims.sub, role: data.claims.role })
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized("invalid Authorization format"))?;
        self.verify(token)
    }
}

async fn require_role(state: &AppState, role: Role, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let principal = state.tokens.authenticate(request.headers())?;
    if principal.role != role {
        return Err(ApiError::Forbidden(match role {
            Role::Admin => "admin access required",
            Role::Customer => "customer access required",
        }));
    }
    // Tokens outlive account changes; a disabled or deleted account is cut
    // off on its next request.
    let active = match role {
        Role::Admin => db::users::find_active(&state.db, principal.id).await?.is_some(),
        Role::Customer => db::customers::find_active(&state.db, principal.id).await?.is_some(),
    };
    if !active {
        return Err(ApiError::Unauthorized("account disabled or removed"));
    }
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&state, Role::Admin, request, next).await
}

pub async fn require_customer(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&state, Role::Customer, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_issue_and_verify() {
        let keys = TokenKeys::new("secret", 1);
        let id = Uuid::now_v7();
        let token = keys.issue(id, Role::Customer).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), Principal { id, role: Role::Customer });
    }

    #[test]
    fn test_wrong_secret_and_expired_tokens_fail() {
        let token = TokenKeys::new("secret", 1).issue(Uuid::now_v7(), Role::Admin).unwrap();
        assert!(TokenKeys::new("other", 1).verify(&token).is_err());

        let expired = TokenKeys::new("secret", -2).issue(Uuid::now_v7(), Role::Admin).unwrap();
        assert!(TokenKeys::new("secret", 1).verify(&expired).is_err());
    }

    #[test]
    fn test_authorization_header_parsing() {
        let keys = TokenKeys::new("secret", 1);
        let mut headers = HeaderMap::new();
        assert!(matches!(keys.authenticate(&headers), Err(ApiError::Unauthorized("missing Authorization header"))));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(matches!(keys.authenticate(&headers), Err(ApiError::Unauthorized("invalid Authorization format"))));

        let id = Uuid::now_v7();
        let token = keys.issue(id, Role::Admin).unwrap();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        assert_eq!(keys.authenticate(&headers).unwrap().id, id);
    }
}
