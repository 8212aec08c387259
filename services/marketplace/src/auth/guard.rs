//! Middleware guarding routes by principal kind
//!
//! Each guard reads the bearer credential, validates it for its own kind,
//! resolves the principal and stores it in the request extensions, where
//! handlers pick it up with `Extension<User>` or `Extension<PropertyOwner>`.
//! Nothing is kept between requests.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::{ResolveError, TokenError, TokenService};
use crate::{error::ApiError, models::PrincipalKind, state::AppState};

/// Extract the credential from the Authorization header.
///
/// Accepts either `Bearer <token>` or the bare token; surrounding whitespace
/// is ignored.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let raw = match headers.get(AUTHORIZATION) {
        None => return Err(ApiError::unauthorized("Authorization header is required")),
        Some(value) if value.is_empty() => {
            return Err(ApiError::unauthorized("Authorization header is required"));
        }
        Some(value) => value
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid authorization header format"))?,
    };

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized("Invalid authorization header format"));
    }

    Ok(token)
}

/// Validate the request's credential for `kind` and return the principal ID
pub fn authenticate(
    tokens: &TokenService,
    headers: &HeaderMap,
    kind: PrincipalKind,
) -> Result<Uuid, ApiError> {
    let token = bearer_token(headers)?;

    tokens.validate(token, kind).map_err(|e| {
        warn!("Rejected {} token: {}", kind, e);
        match e {
            TokenError::KindMismatch { .. } => ApiError::unauthorized("Invalid token claims"),
            _ => ApiError::unauthorized("Invalid token"),
        }
    })
}

fn resolve_rejection(err: ResolveError) -> ApiError {
    match err {
        ResolveError::PrincipalNotFound { kind, id } => {
            warn!("Token refers to missing {} {}", kind, id);
            match kind {
                PrincipalKind::User => ApiError::unauthorized("User not found"),
                PrincipalKind::PropertyOwner => ApiError::unauthorized("Property owner not found"),
            }
        }
        ResolveError::Store(e) => ApiError::Persistence(e),
    }
}

/// Require a valid user token
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let id = authenticate(&state.tokens, req.headers(), PrincipalKind::User)?;
    let user = state
        .resolver
        .resolve_user(id)
        .await
        .map_err(resolve_rejection)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require a valid property-owner token
pub async fn require_owner(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let id = authenticate(&state.tokens, req.headers(), PrincipalKind::PropertyOwner)?;
    let owner = state
        .resolver
        .resolve_owner(id)
        .await
        .map_err(resolve_rejection)?;

    req.extensions_mut().insert(owner);
    Ok(next.run(req).await)
}
