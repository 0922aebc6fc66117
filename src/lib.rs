//! Wholesale Storefront
//!
//! B2B storefront and back office for a clothing wholesaler.
//!
//! ## Features
//! - Product catalog with per-size and per-grade (size pack) variants
//! - Invitation-only customer registration with CNPJ validation
//! - Persistent carts and transactional checkout
//! - Order workflow with status transitions
//! - Store settings, hero slider and content pages

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod publisher;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
