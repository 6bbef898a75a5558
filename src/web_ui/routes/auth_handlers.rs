//! Authentication route handlers for login and logout.

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;

use crate::api::AppState;
use crate::error::ServerError;
use super::utils::{
    add_user_to_context, current_user, describe_error, error_code, redirect_with_error, render_template,
    session_token, SESSION_COOKIE,
};

/// Login form data
#[derive(serde::Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page (GET)
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut context = Context::new();
    add_user_to_context(&mut context, current_user(&state, &headers).as_ref());
    if let Some(code) = query.get("error") {
        context.insert("error", describe_error(code));
    }
    render_template("login.html", &context)
}

/// Login submit (POST)
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.authenticate(&form.username, &form.password) {
        Ok(session) => {
            tracing::info!("{} logged in", session.principal.username);
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, session.token
            );
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, "/dishes".to_string()), (header::SET_COOKIE, cookie)],
            )
                .into_response()
        }
        Err(_) => {
            tracing::warn!("Failed login for '{}'", form.username);
            redirect_with_error("/login", error_code(&ServerError::AuthFailed))
        }
    }
}

/// Logout (GET or POST)
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.auth.revoke_token(token);
    }
    state.auth.cleanup_expired_sessions();
    tracing::debug!("Logged out, {} sessions active", state.auth.session_count());

    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/dishes".to_string()), (header::SET_COOKIE, cookie)],
    )
        .into_response()
}
