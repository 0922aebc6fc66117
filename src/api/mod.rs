//! HTTP routes
//!
//! Three routers share one state: public storefront routes, customer routes
//! behind a customer token and back-office routes under `/api/admin` behind an
//! admin token.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod categories;
pub mod customers;
pub mod grades;
pub mod orders;
pub mod pages;
pub mod registration;
pub mod sellers;
pub mod settings;
pub mod slides;
pub mod users;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{require_admin, require_customer};
use crate::db::PageRequest;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::admin_login))
        .route("/api/customers/login", post(auth::customer_login))
        .route("/api/customers/register", post(registration::register))
        .route("/api/registration/:token", get(registration::check))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/:id", get(catalog::get_product))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/settings", get(settings::get_settings))
        .route("/api/slides", get(slides::list_active))
        .route("/api/slides/:id/impression", post(slides::record_impression))
        .route("/api/slides/:id/click", post(slides::record_click))
        .route("/api/pages/:slug", get(pages::get_published));

    let customer = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/api/cart/items/:id", put(cart::update_item).delete(cart::remove_item))
        .route("/api/checkout", post(cart::checkout))
        .route("/api/orders", get(orders::list_own))
        .route("/api/orders/:id", get(orders::get_own))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_customer));

    let admin = Router::new()
        .route("/products", get(catalog::admin_list_products).post(catalog::create_product))
        .route("/products/:id", get(catalog::admin_get_product).put(catalog::update_product).delete(catalog::delete_product))
        .route("/products/:id/variants", post(catalog::create_variant))
        .route("/variants/:id", put(catalog::update_variant).delete(catalog::delete_variant))
        .route("/grades", get(grades::list_grades).post(grades::create_grade))
        .route("/grades/:id", put(grades::update_grade).delete(grades::delete_grade))
        .route("/categories", post(categories::create_category))
        .route("/categories/:id", put(categories::update_category).delete(categories::delete_category))
        .route("/customers", get(customers::list_customers))
        .route("/customers/:id", get(customers::get_customer).put(customers::update_customer).delete(customers::delete_customer))
        .route("/registration-links", get(registration::list_links).post(registration::create_link))
        .route("/orders", get(orders::list_all))
        .route("/orders/:id", get(orders::get_any).delete(orders::delete_order))
        .route("/orders/:id/status", put(orders::update_status))
        .route("/sellers", get(sellers::list_sellers).post(sellers::create_seller))
        .route("/sellers/:id", put(sellers::update_seller).delete(sellers::delete_seller))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", put(users::update_user).delete(users::delete_user))
        .route("/settings", put(settings::update_settings))
        .route("/slides", get(slides::list_all).post(slides::create_slide))
        .route("/slides/:id", put(slides::update_slide).delete(slides::delete_slide))
        .route("/pages", get(pages::list_pages).post(pages::create_page))
        .route("/pages/:id", put(pages::update_page).delete(pages::delete_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "wholesale-storefront"})) }))
        .merge(public)
        .merge(customer)
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Trims optional text input, mapping blanks to `None`.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
