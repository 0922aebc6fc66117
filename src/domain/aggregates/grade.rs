//! Grade: a named bundle of sizes sold as a single catalog unit

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Grade {
    pub id: Uuid,
    pub name: String,
    /// Size label -> pieces of that size in one grade.
    pub sizes: Json<BTreeMap<String, u32>>,
    pub created_at: DateTime<Utc>,
}

/// Upper bound on the pieces of one size in a grade.
pub const MAX_PIECES_PER_SIZE: u32 = 10_000;
/// Upper bound on the pieces in a whole grade.
pub const MAX_PIECES_PER_GRADE: u32 = 100_000;

impl Grade {
    pub fn validate_sizes(name: &str, sizes: &BTreeMap<String, u32>) -> Result<(), GradeError> {
        if name.trim().is_empty() {
            return Err(GradeError::MissingName);
        }
        if sizes.is_empty() {
            return Err(GradeError::NoSizes);
        }
        let invalid = |(size, qty): &(&String, &u32)| size.trim().is_empty() || **qty == 0 || **qty > MAX_PIECES_PER_SIZE;
        if let Some((size, _)) = sizes.iter().find(invalid) {
            return Err(GradeError::InvalidSize(size.clone()));
        }
        let total = sizes.values().try_fold(0u32, |acc, qty| acc.checked_add(*qty));
        if total.map_or(true, |t| t > MAX_PIECES_PER_GRADE) {
            return Err(GradeError::TooManyPieces);
        }
        Ok(())
    }

    /// Saturates instead of overflowing on rows stored before the bounds
    /// above were enforced.
    pub fn total_items(&self) -> u32 {
        self.sizes.values().fold(0u32, |acc, qty| acc.saturating_add(*qty))
    }

    pub fn price_per_grade(&self, wholesale_price: Decimal) -> Decimal {
        wholesale_price * Decimal::from(self.total_items())
    }

    /// `"P:2 M:3 G:1"` style label used on order lines.
    pub fn label(&self) -> String {
        let sizes: Vec<String> = self.sizes.iter().map(|(s, q)| format!("{s}:{q}")).collect();
        format!("{} ({})", self.name, sizes.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("grade name is required")]
    MissingName,
    #[error("grade must contain at least one size")]
    NoSizes,
    #[error("invalid quantity for size '{0}' (1 to {max} pieces)", max = MAX_PIECES_PER_SIZE)]
    InvalidSize(String),
    #[error("a grade may hold at most {} pieces", MAX_PIECES_PER_GRADE)]
    TooManyPieces,
}

#[cfg(test)]
pub(crate) fn grade(name: &str, sizes: &[(&str, u32)]) -> Grade {
    Grade {
        id: Uuid::now_v7(),
        name: name.to_string(),
        sizes: Json(sizes.iter().map(|(s, q)| (s.to_string(), *q)).collect()),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_items_and_price() {
        let g = grade("Adult", &[("P", 2), ("M", 3), ("G", 3), ("GG", 2)]);
        assert_eq!(g.total_items(), 10);
        assert_eq!(g.price_per_grade(Decimal::new(2490, 2)), Decimal::new(24900, 2));
        assert_eq!(g.label(), "Adult (G:3 GG:2 M:3 P:2)");
    }

    #[test]
    fn test_validate_sizes() {
        let mut sizes = BTreeMap::new();
        assert_eq!(Grade::validate_sizes("Kids", &sizes), Err(GradeError::NoSizes));
        sizes.insert("4".to_string(), 2);
        assert_eq!(Grade::validate_sizes(" ", &sizes), Err(GradeError::MissingName));
        assert!(Grade::validate_sizes("Kids", &sizes).is_ok());
        sizes.insert("6".to_string(), 0);
        assert_eq!(Grade::validate_sizes("Kids", &sizes), Err(GradeError::InvalidSize("6".into())));
    }

    #[test]
    fn test_validate_sizes_bounds_quantities() {
        let huge: BTreeMap<String, u32> = [("P".to_string(), u32::MAX), ("M".to_string(), 1)].into();
        assert_eq!(Grade::validate_sizes("Adult", &huge), Err(GradeError::InvalidSize("P".into())));

        let at_limit: BTreeMap<String, u32> = [("P".to_string(), MAX_PIECES_PER_SIZE)].into();
        assert!(Grade::validate_sizes("Adult", &at_limit).is_ok());

        let too_many: BTreeMap<String, u32> = (0..11).map(|i| (format!("S{i}"), MAX_PIECES_PER_SIZE)).collect();
        assert_eq!(Grade::validate_sizes("Adult", &too_many), Err(GradeError::TooManyPieces));
    }

    #[test]
    fn test_total_items_saturates_on_oversized_rows() {
        let g = grade("Legacy", &[("P", u32::MAX), ("M", 1)]);
        assert_eq!(g.total_items(), u32::MAX);
        assert!(g.price_per_grade(Decimal::ONE) > Decimal::ZERO);
    }
}
