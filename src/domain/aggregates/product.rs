//! Product aggregate: base product, its variants and stock aggregation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use super::grade::Grade;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub wholesale_price: Decimal,
    pub retail_price: Option<Decimal>,
    pub active: bool,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "variant_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Size,
    Grade,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub kind: VariantKind,
    pub size: Option<String>,
    pub grade_id: Option<Uuid>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductVariant {
    /// A size variant names its size; a grade variant points at a grade.
    pub fn check_shape(kind: VariantKind, size: Option<&str>, grade_id: Option<Uuid>) -> Result<(), ProductError> {
        match (kind, size.map(str::trim), grade_id) {
            (VariantKind::Size, Some(s), None) if !s.is_empty() => Ok(()),
            (VariantKind::Grade, None, Some(_)) => Ok(()),
            (VariantKind::Size, _, _) => Err(ProductError::SizeVariantShape),
            (VariantKind::Grade, _, _) => Err(ProductError::GradeVariantShape),
        }
    }

    pub fn available(&self) -> u32 {
        u32::try_from(self.stock).unwrap_or(0)
    }
}

/// What one unit of a variant costs and how many pieces it contains.
#[derive(Clone, Debug, Serialize)]
pub struct VariantPricing {
    pub unit_price: Decimal,
    pub items_per_unit: u32,
    pub label: String,
}

impl VariantPricing {
    pub fn for_variant(variant: &ProductVariant, grade: Option<&Grade>, wholesale_price: Decimal) -> Result<Self, ProductError> {
        match variant.kind {
            VariantKind::Size => Ok(Self {
                unit_price: wholesale_price,
                items_per_unit: 1,
                label: variant.size.clone().unwrap_or_default(),
            }),
            VariantKind::Grade => {
                let grade = grade.ok_or(ProductError::MissingGrade(variant.id))?;
                Ok(Self {
                    unit_price: grade.price_per_grade(wholesale_price),
                    items_per_unit: grade.total_items(),
                    label: grade.label(),
                })
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VariantView {
    #[serde(flatten)]
    pub variant: ProductVariant,
    #[serde(flatten)]
    pub pricing: VariantPricing,
}

#[derive(Clone, Debug, Serialize)]
pub struct StockSummary {
    /// Sellable units across variants (a grade counts once).
    pub total_stock: u64,
    /// Individual pieces across variants (a grade counts its sizes).
    pub total_items: u64,
    pub variants: Vec<VariantView>,
}

impl StockSummary {
    pub fn aggregate(product: &Product, variants: Vec<ProductVariant>, grades: &HashMap<Uuid, Grade>) -> Result<Self, ProductError> {
        let mut total_stock = 0u64;
        let mut total_items = 0u64;
        let mut views = Vec::with_capacity(variants.len());

        for variant in variants {
            let grade = variant.grade_id.and_then(|id| grades.get(&id));
            let pricing = VariantPricing::for_variant(&variant, grade, product.wholesale_price)?;
            let units = u64::from(variant.available());
            total_stock += units;
            total_items += units * u64::from(pricing.items_per_unit);
            views.push(VariantView { variant, pricing });
        }

        Ok(Self { total_stock, total_items, variants: views })
    }

    pub fn in_stock(&self) -> bool {
        self.total_stock > 0
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub stock: StockSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("size variants require a size and no grade")]
    SizeVariantShape,
    #[error("grade variants require a grade and no size")]
    GradeVariantShape,
    #[error("grade for variant {0} not found")]
    MissingGrade(Uuid),
}

#[cfg(test)]
pub(crate) fn product(wholesale: Decimal) -> Product {
    Product {
        id: Uuid::now_v7(),
        sku: "TSHIRT-01".into(),
        name: "Basic tee".into(),
        description: None,
        category_id: None,
        wholesale_price: wholesale,
        retail_price: None,
        active: true,
        image_urls: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
pub(crate) fn variant(product_id: Uuid, kind: VariantKind, size: Option<&str>, grade_id: Option<Uuid>, stock: i32) -> ProductVariant {
    ProductVariant {
        id: Uuid::now_v7(),
        product_id,
        sku: format!("V-{stock}"),
        kind,
        size: size.map(str::to_string),
        grade_id,
        stock,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::grade::grade;

    #[test]
    fn test_variant_shape() {
        assert!(ProductVariant::check_shape(VariantKind::Size, Some("M"), None).is_ok());
        assert!(ProductVariant::check_shape(VariantKind::Grade, None, Some(Uuid::now_v7())).is_ok());
        assert_eq!(ProductVariant::check_shape(VariantKind::Size, Some(" "), None), Err(ProductError::SizeVariantShape));
        assert_eq!(
            ProductVariant::check_shape(VariantKind::Size, Some("M"), Some(Uuid::now_v7())),
            Err(ProductError::SizeVariantShape)
        );
        assert_eq!(ProductVariant::check_shape(VariantKind::Grade, Some("M"), None), Err(ProductError::GradeVariantShape));
    }

    #[test]
    fn test_stock_aggregation_mixes_sizes_and_grades() {
        let p = product(Decimal::new(1500, 2));
        let g = grade("Adult", &[("P", 2), ("M", 2), ("G", 2)]);
        let grades = HashMap::from([(g.id, g.clone())]);
        let variants = vec![
            variant(p.id, VariantKind::Size, Some("P"), None, 4),
            variant(p.id, VariantKind::Size, Some("M"), None, 0),
            variant(p.id, VariantKind::Grade, None, Some(g.id), 3),
        ];

        let summary = StockSummary::aggregate(&p, variants, &grades).unwrap();
        assert_eq!(summary.total_stock, 7);
        assert_eq!(summary.total_items, 4 + 3 * 6);
        assert!(summary.in_stock());

        let grade_view = &summary.variants[2];
        assert_eq!(grade_view.pricing.items_per_unit, 6);
        assert_eq!(grade_view.pricing.unit_price, Decimal::new(9000, 2));
        assert_eq!(summary.variants[0].pricing.unit_price, Decimal::new(1500, 2));
    }

    #[test]
    fn test_negative_stock_counts_as_zero() {
        let p = product(Decimal::ONE);
        let summary = StockSummary::aggregate(&p, vec![variant(p.id, VariantKind::Size, Some("U"), None, -2)], &HashMap::new()).unwrap();
        assert_eq!(summary.total_stock, 0);
        assert!(!summary.in_stock());
    }

    #[test]
    fn test_missing_grade_is_an_error() {
        let p = product(Decimal::ONE);
        let v = variant(p.id, VariantKind::Grade, None, Some(Uuid::now_v7()), 1);
        let id = v.id;
        assert_eq!(StockSummary::aggregate(&p, vec![v], &HashMap::new()).unwrap_err(), ProductError::MissingGrade(id));
    }
}
