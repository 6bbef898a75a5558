pub mod auth;
pub mod handlers;
pub mod params;

use std::sync::Arc;
use axum::{routing::get, Router};

pub use handlers::{get_chef, get_dish, health, list_chefs, list_dishes, most_popular_chef, AppState};

/// Read-only JSON API
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/chefs", get(list_chefs))
        .route("/api/chefs/:id", get(get_chef))
        .route("/api/most-popular-chef", get(most_popular_chef))
        .route("/api/dishes", get(list_dishes))
        .route("/api/dishes/:dish_id", get(get_dish))
}
