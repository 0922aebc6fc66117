//! Products and their variants

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{
    self,
    products::{ProductFilter, ProductInput},
    variants::VariantInput,
    Paginated,
};
use crate::domain::aggregates::{Product, ProductDetail, ProductVariant, StockSummary, VariantKind};
use crate::domain::value_objects::{ensure_price, Sku};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::non_blank;

#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

async fn list(s: &AppState, p: ProductParams, include_inactive: bool) -> ApiResult<Json<Paginated<Product>>> {
    let page = db::PageRequest::new(p.page, p.per_page);
    let filter = ProductFilter { category_id: p.category, search: p.search, include_inactive };
    let (products, total) = db::products::list(&s.db, &filter, page).await?;
    Ok(Json(Paginated::new(products, total, page)))
}

async fn detail(s: &AppState, id: Uuid, include_inactive: bool) -> ApiResult<Json<ProductDetail>> {
    let product = db::products::find(&s.db, id, include_inactive)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    let variants = db::variants::list_for_product(&s.db, id).await?;
    let grade_ids: Vec<Uuid> = variants.iter().filter_map(|v| v.grade_id).collect();
    let grades = db::grades::find_many(&s.db, &grade_ids).await?;
    let stock = StockSummary::aggregate(&product, variants, &grades)?;
    Ok(Json(ProductDetail { product, stock }))
}

/// GET /api/products
pub async fn list_products(State(s): State<AppState>, Query(p): Query<ProductParams>) -> ApiResult<Json<Paginated<Product>>> {
    list(&s, p, false).await
}

/// GET /api/products/:id
pub async fn get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<ProductDetail>> {
    detail(&s, id, false).await
}

/// GET /api/admin/products
pub async fn admin_list_products(State(s): State<AppState>, Query(p): Query<ProductParams>) -> ApiResult<Json<Paginated<Product>>> {
    list(&s, p, true).await
}

/// GET /api/admin/products/:id
pub async fn admin_get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<ProductDetail>> {
    detail(&s, id, true).await
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    pub sku: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub wholesale_price: Decimal,
    pub retail_price: Option<Decimal>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

fn default_true() -> bool {
    true
}

struct CheckedProduct {
    sku: Sku,
    wholesale_price: Decimal,
    retail_price: Option<Decimal>,
}

impl ProductRequest {
    fn check(&self) -> ApiResult<CheckedProduct> {
        self.validate()?;
        Ok(CheckedProduct {
            sku: Sku::new(&self.sku)?,
            wholesale_price: ensure_price(self.wholesale_price)?,
            retail_price: self.retail_price.map(ensure_price).transpose()?,
        })
    }

    fn input<'a>(&'a self, checked: &'a CheckedProduct) -> ProductInput<'a> {
        ProductInput {
            sku: checked.sku.as_str(),
            name: self.name.trim(),
            description: non_blank(&self.description),
            category_id: self.category_id,
            wholesale_price: checked.wholesale_price,
            retail_price: checked.retail_price,
            active: self.active,
            image_urls: &self.image_urls,
        }
    }
}

/// POST /api/admin/products
pub async fn create_product(State(s): State<AppState>, Json(r): Json<ProductRequest>) -> ApiResult<(StatusCode, Json<Product>)> {
    let checked = r.check()?;
    let product = db::products::create(&s.db, &r.input(&checked)).await?;
    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/admin/products/:id
pub async fn update_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ProductRequest>) -> ApiResult<Json<Product>> {
    let checked = r.check()?;
    db::products::update(&s.db, id, &r.input(&checked))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("product"))
}

/// DELETE /api/admin/products/:id
pub async fn delete_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::products::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("product"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
pub struct VariantRequest {
    pub sku: String,
    pub kind: VariantKind,
    pub size: Option<String>,
    pub grade_id: Option<Uuid>,
    #[validate(range(min = 0))]
    pub stock: i32,
}

impl VariantRequest {
    async fn check(&self, s: &AppState) -> ApiResult<Sku> {
        self.validate()?;
        let size = non_blank(&self.size);
        ProductVariant::check_shape(self.kind, size, self.grade_id)?;
        if let Some(grade_id) = self.grade_id {
            db::grades::find(&s.db, grade_id).await?.ok_or(ApiError::bad_request("grade does not exist"))?;
        }
        Ok(Sku::new(&self.sku)?)
    }

    fn input<'a>(&'a self, sku: &'a Sku) -> VariantInput<'a> {
        VariantInput {
            sku: sku.as_str(),
            kind: self.kind,
            size: non_blank(&self.size),
            grade_id: self.grade_id,
            stock: self.stock,
        }
    }
}

/// POST /api/admin/products/:id/variants
pub async fn create_variant(
    State(s): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(r): Json<VariantRequest>,
) -> ApiResult<(StatusCode, Json<ProductVariant>)> {
    let sku = r.check(&s).await?;
    db::products::find(&s.db, product_id, true).await?.ok_or(ApiError::NotFound("product"))?;
    let variant = db::variants::create(&s.db, product_id, &r.input(&sku)).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// PUT /api/admin/variants/:id
pub async fn update_variant(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<VariantRequest>) -> ApiResult<Json<ProductVariant>> {
    let sku = r.check(&s).await?;
    db::variants::update(&s.db, id, &r.input(&sku))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("variant"))
}

/// DELETE /api/admin/variants/:id
pub async fn delete_variant(State(s): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !db::variants::soft_delete(&s.db, id).await? {
        return Err(ApiError::NotFound("variant"));
    }
    Ok(StatusCode::NO_CONTENT)
}
