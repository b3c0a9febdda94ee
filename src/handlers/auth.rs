// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{config::Config, error::AppError, utils::jwt::sign_admin_token};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Exchanges the shared admin password for a time-boxed signed token.
///
/// Empty password is 400, wrong password 401. The token is the only admin
/// state there is; there is no session store.
pub async fn login(
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.password != config.admin_password {
        return Err(AppError::AuthError("Wrong password".to_string()));
    }

    let token = sign_admin_token(&config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
    })))
}
