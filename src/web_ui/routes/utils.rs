//! Shared utilities and helper functions for web UI.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;
use tera::Context;

use crate::api::auth::Principal;
use crate::api::AppState;
use crate::error::{Result, ServerError};
use crate::model::{Chef, ChefId, Dish, Rating};
use crate::web_ui::templates;

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "session";

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Response {
    match templates::render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Helper to render an error page with the given status
pub fn render_error(status: StatusCode, message: &str) -> Response {
    let mut context = Context::new();
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

/// Error page for a failed operation
pub fn render_server_error(err: &ServerError) -> Response {
    if err.status() == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {:?}", err);
    }
    render_error(err.status(), &err.public_message())
}

/// Redirect to `path` carrying an `error` query value
pub fn redirect_with_error(path: &str, error: &str) -> Response {
    Redirect::to(&format!("{}?error={}", path, urlencoding::encode(error))).into_response()
}

/// Session token from the `session` cookie
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find(|token| !token.is_empty())
}

/// Who is making the request, from the session cookie or Basic credentials
pub fn current_user(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    if let Some(principal) = session_token(headers).and_then(|t| state.auth.validate_token(t).ok()) {
        return Some(principal);
    }

    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    state.auth.authenticate_basic(auth_header).ok()
}

/// Admin principal, or the response that turns the request away.
///
/// Anonymous visitors go to the login page; other users get a 403 page.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> std::result::Result<Principal, Response> {
    match current_user(state, headers) {
        Some(principal) if principal.is_admin() => Ok(principal),
        Some(principal) => {
            tracing::debug!("{} tried an admin page", principal.username);
            Err(render_server_error(&ServerError::PermissionDenied))
        }
        None => Err(redirect_with_error("/login", error_code(&ServerError::AuthRequired))),
    }
}

/// Add current user to context if logged in
pub fn add_user_to_context(context: &mut Context, user: Option<&Principal>) {
    if let Some(principal) = user {
        context.insert("current_user", &principal.username);
    }
    context.insert("is_admin", &user.is_some_and(Principal::is_admin));
}

/// A dish prepared for display
#[derive(Serialize)]
pub struct DishRow {
    pub id: i64,
    pub dish_id: String,
    pub name: String,
    pub cuisine: String,
    pub preparation_time: u32,
    pub rating: Option<u8>,
    pub stars: String,
    pub chef_name: Option<String>,
}

/// Attach owner names to dishes
pub fn dish_rows(dishes: Vec<Dish>, chefs: &[Chef]) -> Vec<DishRow> {
    let names: HashMap<ChefId, String> = chefs.iter().map(|c| (c.id, c.full_name())).collect();

    dishes
        .into_iter()
        .map(|dish| DishRow {
            chef_name: dish.chef_id.and_then(|id| names.get(&id).cloned()),
            stars: dish.rating.map(stars).unwrap_or_default(),
            rating: dish.rating.map(Rating::value),
            id: dish.id,
            dish_id: dish.dish_id,
            name: dish.name,
            cuisine: dish.cuisine,
            preparation_time: dish.preparation_time,
        })
        .collect()
}

fn stars(rating: Rating) -> String {
    "★".repeat(usize::from(rating.value()))
}

/// Entry in a chef drop-down
#[derive(Serialize)]
pub struct ChefOption {
    pub id: i64,
    pub label: String,
    pub selected: bool,
}

pub fn chef_options(chefs: &[Chef], selected: Option<ChefId>) -> Vec<ChefOption> {
    chefs
        .iter()
        .map(|chef| ChefOption {
            id: chef.id,
            label: chef.full_name(),
            selected: selected == Some(chef.id),
        })
        .collect()
}

/// Entry in a rating drop-down
#[derive(Serialize)]
pub struct RatingOption {
    pub value: u8,
    pub selected: bool,
}

pub fn rating_options(selected: Option<Rating>) -> Vec<RatingOption> {
    Rating::all()
        .map(|rating| RatingOption {
            value: rating.value(),
            selected: selected == Some(rating),
        })
        .collect()
}

/// Code carried in an `?error=` redirect. Only codes travel in URLs, so a
/// crafted link cannot put its own text on a page.
pub fn error_code(err: &ServerError) -> &'static str {
    match err {
        ServerError::ChefNotFound(_) => "ChefNotFound",
        ServerError::DishNotFound(_) => "DishNotFound",
        ServerError::EmptyDishId => "EmptyDishId",
        ServerError::DishIdTaken(_) => "DishIdTaken",
        ServerError::InvalidRequest(_) => "InvalidInput",
        ServerError::AuthRequired => "LoginRequired",
        ServerError::AuthFailed => "InvalidCredentials",
        ServerError::PermissionDenied => "PermissionDenied",
        _ => "Internal",
    }
}

/// Readable text for an `error` code; unknown codes get a generic message
pub fn describe_error(code: &str) -> &'static str {
    match code {
        "ChefNotFound" => "Chef not found",
        "DishNotFound" => "Dish not found",
        "EmptyDishId" => "Dish ID cannot be empty",
        "DishIdTaken" => "That dish ID is already in use",
        "InvalidInput" => "Some values were not valid, please check the form",
        "LoginRequired" => "Please log in as an administrator",
        "InvalidCredentials" => "Invalid username or password",
        "PermissionDenied" => "You do not have permission to do that",
        _ => "Something went wrong",
    }
}

/// Shorthand for handlers that fail with an error page
pub fn page(result: Result<Response>) -> Response {
    result.unwrap_or_else(|e| render_server_error(&e))
}
