//! User signup and login

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde_json::json;
use tracing::{info, warn};

use super::issue_token;
use crate::{
    auth::password::{hash_password, verify_password},
    error::{ApiError, ApiResult, INVALID_CREDENTIALS},
    models::{LoginRequest, NewUser, PrincipalKind, SignupRequest},
    state::AppState,
    store::StoreError,
    validation::validate_signup,
};

/// `POST /user/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_signup(&req).map_err(ApiError::Validation)?;

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = match state
        .store
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(StoreError::UniqueViolation(_)) => {
            warn!("User signup rejected: email already registered");
            return Err(ApiError::validation(INVALID_CREDENTIALS));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state, user.id, PrincipalKind::User)?;
    info!("User signed up: {}", user.id);

    Ok(Json(json!({
        "message": "user created successfully",
        "user_id": user.id,
        "token": token,
    })))
}

/// `POST /user/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let Some(user) = state.store.find_user_by_email(&req.email).await? else {
        warn!("User login failed: unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_password(&user.password_hash, &req.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        warn!("User login failed: wrong password for {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state, user.id, PrincipalKind::User)?;
    info!("User logged in: {}", user.id);

    Ok(Json(json!({
        "message": "login successful",
        "token": token,
        "user_id": user.id,
        "role": user.role,
    })))
}
