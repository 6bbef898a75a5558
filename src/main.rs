mod api;
mod bootstrap;
mod config;
mod db;
mod error;
mod model;
mod repository;
mod service;
mod web_ui;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::auth::AuthManager;
use api::AppState;
use config::AppConfig;
use error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Storage and application state
    let repos = config.repository.build().await?;
    let state = Arc::new(AppState::new(&repos, AuthManager::new(config.session_ttl)));
    state
        .auth
        .ensure_admin_user(&config.admin_username, &config.admin_password);
    for (username, password) in &config.viewers {
        state.auth.add_viewer(username, password);
    }

    if config.seed {
        bootstrap::seed(&state.chefs, &state.dishes).await?;
    }

    let chef_count = state.chefs.count().await?;
    let dish_count = state.dishes.count().await?;
    tracing::info!("Loaded {} chefs and {} dishes", chef_count, dish_count);

    let app = Router::new()
        // JSON API and health check
        .merge(api::router())
        // Wizard, admin and login pages
        .merge(web_ui::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Kitchen server starting on http://{}", config.bind_addr);
    tracing::info!("Admin account: {}", config.admin_username);

    axum::serve(listener, app).await?;
    Ok(())
}
