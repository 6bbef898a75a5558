use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Chef not found with id: {0}")]
    ChefNotFound(i64),

    #[error("Dish not found with id: {0}")]
    DishNotFound(String),

    #[error("Dish ID cannot be empty")]
    EmptyDishId,

    #[error("Dish ID already in use: {0}")]
    DishIdTaken(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::ChefNotFound(_) | ServerError::DishNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::EmptyDishId | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::DishIdTaken(_) => StatusCode::CONFLICT,
            ServerError::AuthRequired => StatusCode::UNAUTHORIZED,
            ServerError::AuthFailed | ServerError::PermissionDenied => StatusCode::FORBIDDEN,
            ServerError::Config(_)
            | ServerError::Internal(_)
            | ServerError::Database(_)
            | ServerError::Template(_)
            | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a visitor.
    pub fn public_message(&self) -> String {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:?}", self);
        }

        (status, self.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServerError::ChefNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::DishNotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::EmptyDishId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::DishIdTaken("1".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ServerError::AuthRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServerError::PermissionDenied.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ServerError::Internal("disk on fire".into());
        assert_eq!(err.public_message(), "Internal server error");

        let err = ServerError::ChefNotFound(3);
        assert_eq!(err.public_message(), "Chef not found with id: 3");
    }
}
