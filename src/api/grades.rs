//! Grade (size pack) administration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db;
use crate::domain::aggregates::Grade;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub name: String,
    pub sizes: BTreeMap<String, u32>,
}

impl GradeRequest {
    fn normalized(self) -> ApiResult<(String, BTreeMap<String, u32>)> {
        let sizes: BTreeMap<String, u32> = self.sizes.into_iter().map(|(size, qty)| (size.trim().to_uppercase(), qty)).collect();
        Grade::validate_sizes(&self.name, &sizes)?;
        Ok((self.name.trim().to_string(), sizes))
    }
}

pub async fn list_grades(State(s): State<AppState>) -> ApiResult<Json<Vec<Grade>>> {
    Ok(Json(db::grades::list(&s.db).await?))
}

pub async fn create_grade(State(s): State<AppState>, Json(r): Json<GradeRequest>) -> ApiResult<(StatusCode, Json<Grade>)> {
    let (name, sizes) = r.normalized()?;
    let grade = db::grades::create(&s.db, &name, &sizes).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

pub async fn update_grade(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<GradeRequest>) -> ApiResult<Json<Grade>> {
    let (name, sizes) = r.normalized()?;
    db::grades::update(&s.db, id, &name, &sizes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("grade"))
}

pub async fn delete_grade(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if db::grades::in_use(&s.db, id).await? {
        return Err(ApiError::bad_request("grade is used by product variants"));
    }
    if !db::grades::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("grade"));
    }
    Ok(StatusCode::NO_CONTENT)
}
