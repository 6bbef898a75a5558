//! Web UI route handlers.

mod auth_handlers;
mod chef_handlers;
mod dish_handlers;
mod utils;
mod wizard_handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::AppState;
use auth_handlers::{login_page, login_submit, logout};
use chef_handlers::{
    add_chef, chef_details_page, chefs_page, delete_chef, edit_chef, edit_chef_form, new_chef_form,
};
use dish_handlers::{
    add_dish, delete_dish, dishes_page, edit_dish, edit_dish_form, new_dish_form,
};
use wizard_handlers::{attach_dish, chef_details_hint, list_chefs, not_found, select_dish};

/// Create the web UI router with the wizard, admin and login pages
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Wizard
        .route("/", get(list_chefs))
        .route("/listChefs", get(list_chefs))
        .route("/dish", post(select_dish))
        .route("/chefDetails", get(chef_details_hint).post(attach_dish))
        // Chefs
        .route("/chefs", get(chefs_page))
        .route("/chefs/details/:id", get(chef_details_page))
        .route("/chefs/chef-form", get(new_chef_form))
        .route("/chefs/chef-form/:id", get(edit_chef_form))
        .route("/chefs/add", post(add_chef))
        .route("/chefs/edit/:id", post(edit_chef))
        .route("/chefs/delete/:id", get(delete_chef).post(delete_chef))
        // Dishes
        .route("/dishes", get(dishes_page))
        .route("/dishes/dish-form", get(new_dish_form))
        .route("/dishes/dish-form/:id", get(edit_dish_form))
        .route("/dishes/add", post(add_dish))
        .route("/dishes/edit/:id", post(edit_dish))
        .route("/dishes/delete/:id", get(delete_dish).post(delete_dish))
        // Auth
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout).post(logout))
        .fallback(not_found)
}
