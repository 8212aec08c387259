//! Marketplace HTTP routes
//!
//! Public routes (signup, login, property browsing, cancellation) sit beside
//! two guarded groups: one behind [`require_user`] and one behind
//! [`require_owner`].

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

use crate::{
    auth::{require_owner, require_user},
    error::{ApiError, ApiResult},
    models::PrincipalKind,
    state::AppState,
};

pub mod booking;
pub mod owner;
pub mod property;
pub mod user;

/// Create the router for the marketplace service
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/user/booking", get(booking::list_user_bookings))
        .route(
            "/user/booking/:id",
            post(booking::create_booking).get(booking::get_user_booking),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let owner_routes = Router::new()
        .route("/property/create", post(property::create_property))
        .route("/property/owner", get(property::list_owner_properties))
        .route("/property/:id", get(property::get_property))
        .route("/owner/booking/all", get(booking::list_owner_bookings))
        .route(
            "/owner/booking/:id",
            get(booking::get_owner_booking).put(booking::confirm_booking),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_owner));

    Router::new()
        .route("/health", get(health_check))
        .route("/user/signup", post(user::signup))
        .route("/user/login", post(user::login))
        .route("/property/owner/signup", post(owner::signup))
        .route("/property/owner/login", post(owner::login))
        .route("/property/all", get(property::list_all_properties))
        .route("/cancel/booking/:id", delete(booking::cancel_booking))
        .merge(user_routes)
        .merge(owner_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "marketplace"
            })),
        ),
        Err(e) => {
            error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "marketplace"
                })),
            )
        }
    }
}

/// Parse a path identifier, naming the entity in the error
pub(crate) fn parse_id(raw: &str, entity: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("invalid {} ID", entity)))
}

/// Issue a token after signup or login
pub(crate) fn issue_token(state: &AppState, id: Uuid, kind: PrincipalKind) -> ApiResult<String> {
    state.tokens.issue(id, kind).map_err(|e| {
        error!("Failed to issue {} token: {}", kind, e);
        ApiError::Internal(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "booking").unwrap(), id);

        match parse_id("42", "booking") {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "invalid booking ID"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
