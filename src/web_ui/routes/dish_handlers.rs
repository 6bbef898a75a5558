//! Dish administration pages.

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
use crate::api::params::{parse_id, parse_optional_id, parse_optional_rating, DishFilter};
use crate::api::AppState;
use crate::error::{Result, ServerError};
use crate::model::{Dish, DishDraft, DishKey};
use super::utils::{
    add_user_to_context, chef_options, current_user, describe_error, dish_rows, error_code, page,
    rating_options, redirect_with_error, render_server_error, render_template, require_admin,
};

/// Dish form data. Numbers stay text until validated so bad input can be
/// reported instead of rejected by the extractor.
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishForm {
    #[serde(default)]
    pub dish_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub preparation_time: String,
    #[serde(default)]
    pub chef_id: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl DishForm {
    fn from_dish(dish: &Dish) -> Self {
        Self {
            dish_id: dish.dish_id.clone(),
            name: dish.name.clone(),
            cuisine: dish.cuisine.clone(),
            preparation_time: dish.preparation_time.to_string(),
            chef_id: dish.chef_id.map(|id| id.to_string()),
            rating: dish.rating.map(|r| r.value().to_string()),
        }
    }

    fn into_draft(self) -> Result<DishDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ServerError::InvalidRequest("Name is required".to_string()));
        }
        let preparation_time: u32 = self.preparation_time.trim().parse().map_err(|_| {
            ServerError::InvalidRequest(format!(
                "Preparation time must be a whole number of minutes, got '{}'",
                self.preparation_time
            ))
        })?;

        let mut draft = DishDraft::new(&self.dish_id, name, self.cuisine.trim(), preparation_time);
        if let Some(chef_id) = parse_optional_id(self.chef_id.as_deref(), "chefId")? {
            draft = draft.with_chef(chef_id);
        }
        if let Some(rating) = parse_optional_rating(self.rating.as_deref())? {
            draft = draft.with_rating(rating);
        }
        Ok(draft)
    }
}

fn dish_key(raw: &str) -> Option<DishKey> {
    parse_id(raw, "id").ok()
}

fn dish_not_found() -> Response {
    redirect_with_error("/dishes", "DishNotFound")
}

/// Dish list with filters (GET /dishes)
pub async fn dishes_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let filter = DishFilter {
        rating: query.get("rating").cloned(),
        chef_id: query.get("chefId").cloned(),
    };

    page(async {
        let mut context = Context::new();
        add_user_to_context(&mut context, current_user(&state, &headers).as_ref());

        let chefs = state.chefs.list_chefs().await?;
        let dishes = match filter.apply(&state.dishes).await {
            Ok(dishes) => dishes,
            Err(e @ ServerError::InvalidRequest(_)) => {
                context.insert("error", describe_error(error_code(&e)));
                state.dishes.list_dishes().await?
            }
            Err(e) => return Err(e),
        };

        context.insert("dishes", &dish_rows(dishes, &chefs));
        context.insert("rating_options", &rating_options(filter.rating().ok().flatten()));
        context.insert("chef_options", &chef_options(&chefs, filter.chef_id().ok().flatten()));
        if let Some(error) = query.get("error") {
            context.insert("error", describe_error(error));
        }

        Ok::<_, ServerError>(render_template("dishes.html", &context))
    }
    .await)
}

async fn render_dish_form(
    state: &AppState,
    user: &Principal,
    title: &str,
    action: &str,
    form: &DishForm,
    error: Option<&String>,
) -> Result<Response> {
    let chefs = state.chefs.list_chefs().await?;
    let selected_chef = parse_optional_id(form.chef_id.as_deref(), "chefId").ok().flatten();
    let selected_rating = parse_optional_rating(form.rating.as_deref()).ok().flatten();

    let mut context = Context::new();
    add_user_to_context(&mut context, Some(user));
    context.insert("title", title);
    context.insert("action", action);
    context.insert("form", form);
    context.insert("chef_options", &chef_options(&chefs, selected_chef));
    context.insert("rating_options", &rating_options(selected_rating));
    if let Some(code) = error {
        context.insert("error", describe_error(code));
    }
    Ok(render_template("dish_form.html", &context))
}

/// Empty dish form (GET /dishes/dish-form)
pub async fn new_dish_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    page(
        render_dish_form(
            &state,
            &admin,
            "Add dish",
            "/dishes/add",
            &DishForm::default(),
            query.get("error"),
        )
        .await,
    )
}

/// Prefilled dish form (GET /dishes/dish-form/:id)
pub async fn edit_dish_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    let Some(id) = dish_key(&raw_id) else {
        return dish_not_found();
    };

    let dish = match state.dishes.find_by_id(id).await {
        Ok(dish) => dish,
        Err(ServerError::DishNotFound(_)) => return dish_not_found(),
        Err(e) => return render_server_error(&e),
    };

    page(
        render_dish_form(
            &state,
            &admin,
            "Edit dish",
            &format!("/dishes/edit/{}", dish.id),
            &DishForm::from_dish(&dish),
            query.get("error"),
        )
        .await,
    )
}

/// Create a dish (POST /dishes/add)
pub async fn add_dish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<DishForm>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }

    let result = match form.into_draft() {
        Ok(draft) => state.dishes.create(draft).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Redirect::to("/dishes").into_response(),
        Err(e) if is_form_error(&e) => redirect_with_error("/dishes/dish-form", error_code(&e)),
        Err(e) => render_server_error(&e),
    }
}

/// Update a dish (POST /dishes/edit/:id)
pub async fn edit_dish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Form(form): Form<DishForm>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }
    let Some(id) = dish_key(&raw_id) else {
        return dish_not_found();
    };

    let result = match form.into_draft() {
        Ok(draft) => state.dishes.update(id, draft).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Redirect::to("/dishes").into_response(),
        Err(ServerError::DishNotFound(_)) => dish_not_found(),
        Err(e) if is_form_error(&e) => {
            redirect_with_error(&format!("/dishes/dish-form/{}", id), error_code(&e))
        }
        Err(e) => render_server_error(&e),
    }
}

/// Delete a dish (GET or POST /dishes/delete/:id)
pub async fn delete_dish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }
    let Some(id) = dish_key(&raw_id) else {
        return dish_not_found();
    };

    match state.dishes.delete(id).await {
        Ok(()) => Redirect::to("/dishes").into_response(),
        Err(e) => render_server_error(&e),
    }
}

/// Errors the visitor can fix by correcting the form
fn is_form_error(err: &ServerError) -> bool {
    matches!(
        err,
        ServerError::EmptyDishId | ServerError::DishIdTaken(_) | ServerError::InvalidRequest(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(dish_id: &str, minutes: &str) -> DishForm {
        DishForm {
            dish_id: dish_id.to_string(),
            name: "Tacos".to_string(),
            cuisine: "Mexican".to_string(),
            preparation_time: minutes.to_string(),
            chef_id: Some(String::new()),
            rating: Some("4".to_string()),
        }
    }

    #[test]
    fn test_form_into_draft() {
        let draft = form("6", " 25 ").into_draft().unwrap();
        assert_eq!(draft.preparation_time, 25);
        assert_eq!(draft.chef_id, None);
        assert_eq!(draft.rating.map(|r| r.value()), Some(4));

        assert!(matches!(
            form("6", "soon").into_draft(),
            Err(ServerError::InvalidRequest(_))
        ));
        assert!(form("6", "-5").into_draft().is_err());

        let mut owned = form("6", "10");
        owned.chef_id = Some("3".to_string());
        owned.rating = None;
        let draft = owned.into_draft().unwrap();
        assert_eq!(draft.chef_id, Some(3));
        assert_eq!(draft.rating, None);

        let mut bad_rating = form("6", "10");
        bad_rating.rating = Some("7".to_string());
        assert!(bad_rating.into_draft().is_err());
    }

    #[test]
    fn test_form_error_classification() {
        assert!(is_form_error(&ServerError::EmptyDishId));
        assert!(is_form_error(&ServerError::DishIdTaken("1".to_string())));
        assert!(!is_form_error(&ServerError::DishNotFound("1".to_string())));
        assert!(!is_form_error(&ServerError::Internal("x".to_string())));
    }
}
