//! Chef administration pages.

use axum::{
    extract::{Form, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;

use crate::api::auth::Principal;
use crate::api::params::parse_id;
use crate::api::AppState;
use crate::error::ServerError;
use crate::model::{Chef, ChefDraft, ChefId};
use super::utils::{
    add_user_to_context, current_user, describe_error, dish_rows, error_code, page,
    redirect_with_error, render_server_error, render_template, require_admin,
};

/// Chef form data
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

impl ChefForm {
    fn from_chef(chef: &Chef) -> Self {
        Self {
            first_name: chef.first_name.clone(),
            last_name: chef.last_name.clone(),
            bio: chef.bio.clone(),
        }
    }

    fn into_draft(self) -> ChefDraft {
        ChefDraft::new(self.first_name.trim(), self.last_name.trim(), self.bio.trim())
    }
}

/// Path id for chef pages; anything unparseable counts as an unknown chef
fn chef_id(raw: &str) -> Option<ChefId> {
    parse_id(raw, "id").ok()
}

fn chef_not_found() -> Response {
    redirect_with_error("/chefs", "ChefNotFound")
}

/// Chef list with dish counts (GET /chefs)
pub async fn chefs_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    page(async {
        let mut context = Context::new();
        add_user_to_context(&mut context, current_user(&state, &headers).as_ref());

        let summaries = state.chefs.list_summaries().await?;
        let most_popular = state.chefs.find_most_popular_chef().await?;
        context.insert("chefs", &summaries);
        context.insert("most_popular", &most_popular);
        if let Some(error) = query.get("error") {
            context.insert("error", describe_error(error));
        }

        Ok::<_, ServerError>(render_template("chefs.html", &context))
    }
    .await)
}

/// One chef with its dishes (GET /chefs/details/:id)
pub async fn chef_details_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = chef_id(&raw_id) else {
        return chef_not_found();
    };

    let details = match state.chefs.details(id).await {
        Ok(details) => details,
        Err(ServerError::ChefNotFound(_)) => return chef_not_found(),
        Err(e) => return render_server_error(&e),
    };

    page(async {
        let chefs = state.chefs.list_chefs().await?;
        let mut context = Context::new();
        add_user_to_context(&mut context, current_user(&state, &headers).as_ref());
        context.insert("chef", &details.chef);
        context.insert("dishes", &dish_rows(details.dishes, &chefs));
        Ok::<_, ServerError>(render_template("chef_details.html", &context))
    }
    .await)
}

fn render_chef_form(
    user: Option<&Principal>,
    title: &str,
    action: &str,
    form: &ChefForm,
    error: Option<&String>,
) -> Response {
    let mut context = Context::new();
    add_user_to_context(&mut context, user);
    context.insert("title", title);
    context.insert("action", action);
    context.insert("form", form);
    if let Some(code) = error {
        context.insert("error", describe_error(code));
    }
    render_template("chef_form.html", &context)
}

/// Empty chef form (GET /chefs/chef-form)
pub async fn new_chef_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    render_chef_form(
        Some(&admin),
        "Add chef",
        "/chefs/add",
        &ChefForm::default(),
        query.get("error"),
    )
}

/// Prefilled chef form (GET /chefs/chef-form/:id)
pub async fn edit_chef_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    let Some(id) = chef_id(&raw_id) else {
        return chef_not_found();
    };

    match state.chefs.find_by_id(id).await {
        Ok(chef) => render_chef_form(
            Some(&admin),
            "Edit chef",
            &format!("/chefs/edit/{}", chef.id),
            &ChefForm::from_chef(&chef),
            query.get("error"),
        ),
        Err(ServerError::ChefNotFound(_)) => chef_not_found(),
        Err(e) => render_server_error(&e),
    }
}

/// Create a chef (POST /chefs/add)
pub async fn add_chef(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ChefForm>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }

    match state.chefs.create(form.into_draft()).await {
        Ok(_) => Redirect::to("/chefs").into_response(),
        Err(e @ ServerError::InvalidRequest(_)) => redirect_with_error("/chefs/chef-form", error_code(&e)),
        Err(e) => render_server_error(&e),
    }
}

/// Update a chef (POST /chefs/edit/:id)
pub async fn edit_chef(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Form(form): Form<ChefForm>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }
    let Some(id) = chef_id(&raw_id) else {
        return chef_not_found();
    };

    match state.chefs.update(id, form.into_draft()).await {
        Ok(_) => Redirect::to("/chefs").into_response(),
        Err(ServerError::ChefNotFound(_)) => chef_not_found(),
        Err(e @ ServerError::InvalidRequest(_)) => {
            redirect_with_error(&format!("/chefs/chef-form/{}", id), error_code(&e))
        }
        Err(e) => render_server_error(&e),
    }
}

/// Delete a chef and its dishes (GET or POST /chefs/delete/:id)
pub async fn delete_chef(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }
    let Some(id) = chef_id(&raw_id) else {
        return chef_not_found();
    };

    match state.chefs.delete(id).await {
        Ok(()) => Redirect::to("/chefs").into_response(),
        Err(e) => render_server_error(&e),
    }
}
