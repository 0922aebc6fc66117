//! Aggregates module
pub mod cart;
pub mod grade;
pub mod order;
pub mod product;

pub use cart::{Cart, CartChange, CartError, CartItem, CartItemStatus, CartLine};
pub use grade::{Grade, GradeError};
pub use order::{Order, OrderDetail, OrderError, OrderItem, OrderStatus};
pub use product::{Product, ProductDetail, ProductError, ProductVariant, StockSummary, VariantKind, VariantPricing};
