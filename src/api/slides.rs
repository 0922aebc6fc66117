//! Hero slider with impression and click counters

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{
    self,
    slides::{Counter, HeroSlide, SlideInput},
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::non_blank;

/// GET /api/slides
pub async fn list_active(State(s): State<AppState>) -> ApiResult<Json<Vec<HeroSlide>>> {
    Ok(Json(db::slides::list(&s.db, true).await?))
}

async fn record(s: &AppState, id: Uuid, counter: Counter) -> ApiResult<StatusCode> {
    if !db::slides::record(&s.db, id, counter).await? {
        return Err(ApiError::NotFound("slide"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/slides/:id/impression
pub async fn record_impression(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    record(&s, id, Counter::Impression).await
}

/// POST /api/slides/:id/click
pub async fn record_click(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    record(&s, id, Counter::Click).await
}

#[derive(Debug, Deserialize, Validate)]
pub struct SlideRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub subtitle: Option<String>,
    #[validate(length(min = 1))]
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

impl SlideRequest {
    fn input(&self) -> SlideInput<'_> {
        SlideInput {
            title: self.title.trim(),
            subtitle: non_blank(&self.subtitle),
            image_url: self.image_url.trim(),
            link_url: non_blank(&self.link_url),
            position: self.position,
            active: self.active,
        }
    }
}

/// GET /api/admin/slides
pub async fn list_all(State(s): State<AppState>) -> ApiResult<Json<Vec<HeroSlide>>> {
    Ok(Json(db::slides::list(&s.db, false).await?))
}

pub async fn create_slide(State(s): State<AppState>, Json(r): Json<SlideRequest>) -> ApiResult<(StatusCode, Json<HeroSlide>)> {
    r.validate()?;
    let slide = db::slides::create(&s.db, &r.input()).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

pub async fn update_slide(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<SlideRequest>) -> ApiResult<Json<HeroSlide>> {
    r.validate()?;
    db::slides::update(&s.db, id, &r.input()).await?.map(Json).ok_or(ApiError::NotFound("slide"))
}

pub async fn delete_slide(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::slides::delete(&s.db, id).await? {
        return Err(ApiError::NotFound("slide"));
    }
    Ok(StatusCode::NO_CONTENT)
}
