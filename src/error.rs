//! API error type
//!
//! Every handler returns `Result<_, ApiError>`; the response body is always
//! `{ "error": "<message>" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::domain::aggregates::{CartError, GradeError, OrderError, ProductError};
use crate::domain::value_objects::ValueError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("internal server error")]
    Database(#[source] sqlx::Error),

    #[error("internal server error")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Database(e) => tracing::error!(error = %e, "database error"),
            Self::Internal(e) => tracing::error!(error = %e, "internal error"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "request rejected"),
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Maps a unique-constraint violation to the message shown to the user.
fn duplicate_message(detail: &str) -> &'static str {
    let detail = detail.to_lowercase();
    if detail.contains("cnpj") {
        "CNPJ already registered"
    } else if detail.contains("email") {
        "email already registered"
    } else if detail.contains("sku") {
        "SKU already exists"
    } else if detail.contains("slug") {
        "slug already in use"
    } else if detail.contains("token") {
        "token already exists"
    } else {
        "record already exists"
    }
}

/// Maps a foreign-key violation to the entity that was referenced but does
/// not exist. Postgres names these constraints `<table>_<column>_fkey`.
fn missing_reference_message(constraint: &str) -> &'static str {
    let constraint = constraint.to_lowercase();
    [
        ("category_id", "category does not exist"),
        ("seller_id", "seller does not exist"),
        ("grade_id", "grade does not exist"),
        ("variant_id", "variant does not exist"),
        ("product_id", "product does not exist"),
        ("customer_id", "customer does not exist"),
        ("order_id", "order does not exist"),
        ("created_by", "user does not exist"),
    ]
    .into_iter()
    .find(|(column, _)| constraint.contains(column))
    .map_or("referenced record does not exist", |(_, message)| message)
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => Self::NotFound("record"),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let detail = db.constraint().unwrap_or_else(|| db.message());
                Self::BadRequest(duplicate_message(detail).to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                let detail = db.constraint().unwrap_or_else(|| db.message());
                Self::BadRequest(missing_reference_message(detail).to_string())
            }
            _ => Self::Database(e),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token signing failed: {e}"))
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing failed: {e}"))
    }
}

macro_rules! bad_request_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ApiError {
            fn from(e: $ty) -> Self {
                Self::BadRequest(e.to_string())
            }
        })*
    };
}

bad_request_from!(ValueError, GradeError, CartError, OrderError);

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::MissingGrade(_) => Self::Internal(e.to_string()),
            _ => Self::BadRequest(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(duplicate_message("customers_email_key"), "email already registered");
        assert_eq!(duplicate_message("customers_cnpj_key"), "CNPJ already registered");
        assert_eq!(duplicate_message("products_sku_key"), "SKU already exists");
        assert_eq!(duplicate_message("pages_slug_key"), "slug already in use");
        assert_eq!(duplicate_message("something_else"), "record already exists");
    }

    #[test]
    fn test_missing_reference_messages() {
        assert_eq!(missing_reference_message("products_category_id_fkey"), "category does not exist");
        assert_eq!(missing_reference_message("product_variants_product_id_fkey"), "product does not exist");
        assert_eq!(missing_reference_message("product_variants_grade_id_fkey"), "grade does not exist");
        assert_eq!(missing_reference_message("cart_items_variant_id_fkey"), "variant does not exist");
        assert_eq!(missing_reference_message("customers_seller_id_fkey"), "seller does not exist");
        assert_eq!(missing_reference_message("mystery_fkey"), "referenced record does not exist");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(sqlx::Error::RowNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(sqlx::Error::PoolTimedOut).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(CartError::InvalidQuantity).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ProductError::MissingGrade(Uuid::nil())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Forbidden("admin access required").status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::Internal("secret detail".into());
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(ApiError::NotFound("order").to_string(), "order not found");
    }
}
