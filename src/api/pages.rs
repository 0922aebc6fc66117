//! Content pages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{self, pages::Page};
use crate::domain::value_objects::slugify;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/pages/:slug
pub async fn get_published(State(s): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Page>> {
    db::pages::find_published(&s.db, &slug).await?.map(Json).ok_or(ApiError::NotFound("page"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PageRequest {
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub published: bool,
}

impl PageRequest {
    fn slug(&self) -> ApiResult<String> {
        self.validate()?;
        let slug = slugify(self.slug.as_deref().unwrap_or(&self.title));
        if slug.is_empty() {
            return Err(ApiError::bad_request("page slug must contain letters or digits"));
        }
        Ok(slug)
    }
}

pub async fn list_pages(State(s): State<AppState>) -> ApiResult<Json<Vec<Page>>> {
    Ok(Json(db::pages::list(&s.db).await?))
}

pub async fn create_page(State(s): State<AppState>, Json(r): Json<PageRequest>) -> ApiResult<(StatusCode, Json<Page>)> {
    let slug = r.slug()?;
    let page = db::pages::create(&s.db, &slug, r.title.trim(), &r.content, r.published).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn update_page(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<PageRequest>) -> ApiResult<Json<Page>> {
    let slug = r.slug()?;
    db::pages::update(&s.db, id, &slug, r.title.trim(), &r.content, r.published)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("page"))
}

pub async fn delete_page(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::pages::delete(&s.db, id).await? {
        return Err(ApiError::NotFound("page"));
    }
    Ok(StatusCode::NO_CONTENT)
}
