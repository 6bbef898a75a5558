//! The three-step chef/dish wizard.
//!
//! Nothing is remembered between steps: each page carries the chef id
//! forward in its form.

use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use crate::api::params::parse_id;
use crate::api::AppState;
use crate::error::{Result, ServerError};
use super::utils::{
    add_user_to_context, current_user, dish_rows, page, render_error, render_template, require_admin,
};

/// Step 1 submission
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefChoice {
    #[serde(default)]
    pub chef_id: String,
}

/// Step 2 submission
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishChoice {
    #[serde(default)]
    pub chef_id: String,
    #[serde(default)]
    pub dish_id: String,
}

/// Step 1: pick a chef (GET / and /listChefs)
pub async fn list_chefs(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page(list_chefs_view(&state, &headers).await)
}

async fn list_chefs_view(state: &AppState, headers: &HeaderMap) -> Result<Response> {
    let mut context = Context::new();
    add_user_to_context(&mut context, current_user(state, headers).as_ref());
    context.insert("chefs", &state.chefs.list_chefs().await?);
    Ok(render_template("list_chefs.html", &context))
}

/// Step 2: pick a dish for the chosen chef (POST /dish)
pub async fn select_dish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(choice): Form<ChefChoice>,
) -> Response {
    page(select_dish_view(&state, &headers, &choice).await)
}

async fn select_dish_view(state: &AppState, headers: &HeaderMap, choice: &ChefChoice) -> Result<Response> {
    let chef_id = parse_id(&choice.chef_id, "chefId")?;
    let chef = state.chefs.find_by_id(chef_id).await?;
    let chefs = state.chefs.list_chefs().await?;
    let dishes = state.dishes.list_dishes().await?;

    let mut context = Context::new();
    add_user_to_context(&mut context, current_user(state, headers).as_ref());
    context.insert("selected_chef", &chef);
    context.insert("dishes", &dish_rows(dishes, &chefs));
    Ok(render_template("select_dish.html", &context))
}

/// Step 3: attach the dish and show the chef (POST /chefDetails)
pub async fn attach_dish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(choice): Form<DishChoice>,
) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };

    page(
        async {
            let chef_id = parse_id(&choice.chef_id, "chefId")?;
            let details = state.chefs.add_dish_to_chef(chef_id, &choice.dish_id).await?;
            let chefs = state.chefs.list_chefs().await?;

            let mut context = Context::new();
            add_user_to_context(&mut context, Some(&admin));
            context.insert("chef", &details.chef);
            context.insert("dishes", &dish_rows(details.dishes, &chefs));
            context.insert("attached", choice.dish_id.trim());
            Ok::<_, ServerError>(render_template("chef_details.html", &context))
        }
        .await,
    )
}

/// Landing on step 3 without a submission (GET /chefDetails)
pub async fn chef_details_hint(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut context = Context::new();
    add_user_to_context(&mut context, current_user(&state, &headers).as_ref());
    render_template("chef_details_hint.html", &context)
}

/// Fallback for unknown pages
pub async fn not_found() -> Response {
    render_error(StatusCode::NOT_FOUND, "Page not found")
}
