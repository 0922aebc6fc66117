//! Product categories

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{self, categories::Category};
use crate::domain::value_objects::slugify;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::non_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    fn slug(&self) -> ApiResult<String> {
        self.validate()?;
        let slug = slugify(&self.name);
        if slug.is_empty() {
            return Err(ApiError::bad_request("category name must contain letters or digits"));
        }
        Ok(slug)
    }
}

pub async fn list_categories(State(s): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(db::categories::list(&s.db).await?))
}

pub async fn create_category(State(s): State<AppState>, Json(r): Json<CategoryRequest>) -> ApiResult<(StatusCode, Json<Category>)> {
    let slug = r.slug()?;
    let c = db::categories::create(&s.db, r.name.trim(), &slug, non_blank(&r.description)).await?;
    Ok((StatusCode::CREATED, Json(c)))
}

pub async fn update_category(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<CategoryRequest>) -> ApiResult<Json<Category>> {
    let slug = r.slug()?;
    db::categories::update(&s.db, id, r.name.trim(), &slug, non_blank(&r.description))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("category"))
}

pub async fn delete_category(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::categories::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("category"));
    }
    Ok(StatusCode::NO_CONTENT)
}
