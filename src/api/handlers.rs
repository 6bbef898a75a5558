use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::auth::AuthManager;
use super::params::DishFilter;
use crate::error::{Result, ServerError};
use crate::model::{ChefDetails, ChefSummary, Dish};
use crate::repository::Repositories;
use crate::service::{self, ChefService, DishService};

/// Application state shared across handlers
pub struct AppState {
    pub chefs: ChefService,
    pub dishes: DishService,
    pub auth: AuthManager,
}

impl AppState {
    pub fn new(repos: &Repositories, auth: AuthManager) -> Self {
        let (chefs, dishes) = service::build(repos);
        Self { chefs, dishes, auth }
    }

    /// Empty in-memory state with the default admin account
    #[cfg(test)]
    pub fn in_memory() -> Self {
        let state = Self::new(&Repositories::in_memory(), AuthManager::default());
        state.auth.ensure_admin_user("admin", "admin");
        state
    }
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// All chefs with their dish counts
pub async fn list_chefs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ChefSummary>>> {
    Ok(Json(state.chefs.list_summaries().await?))
}

/// One chef with its dishes
pub async fn get_chef(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ChefDetails>> {
    Ok(Json(state.chefs.details(id).await?))
}

/// Chef owning the most dishes, `null` when there are no chefs
pub async fn most_popular_chef(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<ChefSummary>>> {
    Ok(Json(state.chefs.find_most_popular_chef().await?))
}

/// Dishes, optionally filtered by `rating` and `chefId`
pub async fn list_dishes(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DishFilter>,
) -> Result<Json<Vec<Dish>>> {
    Ok(Json(filter.apply(&state.dishes).await?))
}

/// One dish by its external id
pub async fn get_dish(
    State(state): State<Arc<AppState>>,
    Path(dish_id): Path<String>,
) -> Result<Json<Dish>> {
    state
        .dishes
        .find_by_dish_id(&dish_id)
        .await?
        .map(Json)
        .ok_or(ServerError::DishNotFound(dish_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::bootstrap;

    async fn app() -> axum::Router {
        let state = Arc::new(AppState::in_memory());
        bootstrap::seed(&state.chefs, &state.dishes).await.unwrap();
        super::super::router().with_state(state)
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(app().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_and_get_chef() {
        let (status, json) = get_json(app().await, "/api/chefs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["chef"]["last_name"], "Ramsay");
        assert_eq!(json[0]["dish_count"], 0);

        let (status, json) = get_json(app().await, "/api/chefs/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chef"]["first_name"], "Jamie");
        assert!(json["dishes"].as_array().unwrap().is_empty());

        let (status, _) = get_json(app().await, "/api/chefs/77").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dishes_filters() {
        let (status, json) = get_json(app().await, "/api/dishes?rating=4").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Chicken Tikka Masala", "Sushi Platter"]);

        let (status, _) = get_json(app().await, "/api/dishes?rating=11").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = get_json(app().await, "/api/dishes/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Coq au Vin");
        assert_eq!(json["rating"], 5);
        assert_eq!(json["chef_id"], Value::Null);

        let (status, _) = get_json(app().await, "/api/dishes/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_most_popular_chef() {
        let state = Arc::new(AppState::in_memory());
        let (status, json) = get_json(
            super::super::router().with_state(state.clone()),
            "/api/most-popular-chef",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, Value::Null);

        bootstrap::seed(&state.chefs, &state.dishes).await.unwrap();
        state.chefs.add_dish_to_chef(3, "4").await.unwrap();
        let (_, json) = get_json(
            super::super::router().with_state(state),
            "/api/most-popular-chef",
        )
        .await;
        assert_eq!(json["chef"]["last_name"], "Pierre White");
        assert_eq!(json["dish_count"], 1);
    }
}
