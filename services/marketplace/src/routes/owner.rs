//! Property owner signup and login

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde_json::json;
use tracing::{info, warn};

use super::issue_token;
use crate::{
    auth::password::{hash_password, verify_password},
    error::{ApiError, ApiResult, INVALID_CREDENTIALS},
    models::{LoginRequest, NewPropertyOwner, PrincipalKind, SignupRequest},
    state::AppState,
    store::StoreError,
    validation::validate_signup,
};

/// `POST /property/owner/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_signup(&req).map_err(ApiError::Validation)?;

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let owner = match state
        .store
        .create_owner(NewPropertyOwner {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await
    {
        Ok(owner) => owner,
        Err(StoreError::UniqueViolation(_)) => {
            warn!("Owner signup rejected: email already registered");
            return Err(ApiError::validation(INVALID_CREDENTIALS));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state, owner.id, PrincipalKind::PropertyOwner)?;
    info!("Property owner signed up: {}", owner.id);

    Ok(Json(json!({
        "message": "property owner created successfully",
        "owner_id": owner.id,
        "role": owner.role,
        "token": token,
    })))
}

/// `POST /property/owner/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let Some(owner) = state.store.find_owner_by_email(&req.email).await? else {
        warn!("Owner login failed: unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_password(&owner.password_hash, &req.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        warn!("Owner login failed: wrong password for {}", owner.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state, owner.id, PrincipalKind::PropertyOwner)?;
    info!("Property owner logged in: {}", owner.id);

    Ok(Json(json!({
        "message": "login successful",
        "token": token,
        "owner_id": owner.id,
        "role": owner.role,
    })))
}
