//! Value objects for the wholesale catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// SKU (Stock Keeping Unit) value object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() {
            return Err(ValueError::EmptySku);
        }
        if value.len() > 50 {
            return Err(ValueError::SkuTooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cased e-mail address with a minimal shape check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValueError> {
        let value = value.as_ref().trim().to_lowercase();
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
            }
            None => false,
        };
        if !valid || value.contains(char::is_whitespace) {
            return Err(ValueError::InvalidEmail);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Brazilian company registry number (CNPJ), stored as 14 digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cnpj(String);

impl Cnpj {
    const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    /// Accepts `00.000.000/0000-00` or bare digits.
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let digits: Vec<u32> = value
            .chars()
            .filter(|c| !matches!(c, '.' | '/' | '-' | ' '))
            .map(|c| c.to_digit(10).ok_or(ValueError::InvalidCnpj))
            .collect::<Result<_, _>>()?;

        if digits.len() != 14 || digits.iter().all(|d| *d == digits[0]) {
            return Err(ValueError::InvalidCnpj);
        }
        if Self::check_digit(&digits[..12], &Self::FIRST_WEIGHTS) != digits[12]
            || Self::check_digit(&digits[..13], &Self::SECOND_WEIGHTS) != digits[13]
        {
            return Err(ValueError::InvalidCnpj);
        }

        Ok(Self(digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect()))
    }

    fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            0 | 1 => 0,
            rest => 11 - rest,
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(f, "{}.{}.{}/{}-{}", &d[0..2], &d[2..5], &d[5..8], &d[8..12], &d[12..14])
    }
}

/// Rejects negative prices; zero is allowed for samples.
pub fn ensure_price(amount: Decimal) -> Result<Decimal, ValueError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValueError::NegativePrice);
    }
    Ok(amount.round_dp(2))
}

pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Lowercase, dash-separated ASCII slug.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("SKU must not be empty")]
    EmptySku,
    #[error("SKU must be at most 50 characters")]
    SkuTooLong,
    #[error("invalid e-mail address")]
    InvalidEmail,
    #[error("invalid CNPJ")]
    InvalidCnpj,
    #[error("price must not be negative")]
    NegativePrice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku() {
        let sku = Sku::new(" prod-001 ").unwrap();
        assert_eq!(sku.as_str(), "PROD-001");
        assert_eq!(Sku::new("   "), Err(ValueError::EmptySku));
        assert_eq!(Sku::new("x".repeat(51)), Err(ValueError::SkuTooLong));
    }

    #[test]
    fn test_email() {
        assert_eq!(Email::new(" Buyer@Shop.COM ").unwrap().as_str(), "buyer@shop.com");
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("a@b").is_err());
        assert!(Email::new("a b@c.com").is_err());
    }

    #[test]
    fn test_cnpj_accepts_formatted_and_bare() {
        let formatted = Cnpj::parse("11.222.333/0001-81").unwrap();
        let bare = Cnpj::parse("11222333000181").unwrap();
        assert_eq!(formatted, bare);
        assert_eq!(bare.digits(), "11222333000181");
        assert_eq!(bare.to_string(), "11.222.333/0001-81");
    }

    #[test]
    fn test_cnpj_rejects_bad_check_digits() {
        assert!(Cnpj::parse("11.222.333/0001-82").is_err());
        assert!(Cnpj::parse("11111111111111").is_err());
        assert!(Cnpj::parse("1122233300018").is_err());
        assert!(Cnpj::parse("11.222.333/0001-8a").is_err());
    }

    #[test]
    fn test_price_and_line_total() {
        assert_eq!(ensure_price(Decimal::new(1999, 2)).unwrap(), Decimal::new(1999, 2));
        assert_eq!(ensure_price(Decimal::new(-1, 0)), Err(ValueError::NegativePrice));
        assert_eq!(line_total(Decimal::new(1050, 2), 3), Decimal::new(3150, 2));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Summer  Collection 2024!"), "summer-collection-2024");
        assert_eq!(slugify("  --Kids--  "), "kids");
    }
}
