//! Property listing routes

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use super::parse_id;
use crate::{
    error::{ApiError, ApiResult},
    models::{CreatePropertyRequest, NewProperty, PropertyList, PropertyOwner},
    state::AppState,
    validation::validate_property,
};

/// `POST /property/create`
pub async fn create_property(
    State(state): State<AppState>,
    Extension(owner): Extension<PropertyOwner>,
    payload: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_property(&req).map_err(ApiError::Validation)?;

    let property = state
        .store
        .create_property(NewProperty {
            name: req.property_name,
            description: req.description,
            price: req.price,
            owner_id: owner.id,
        })
        .await?;

    info!("Owner {} listed property {}", owner.id, property.id);

    Ok(Json(json!({
        "message": "property created successfully",
        "property_id": property.id,
    })))
}

/// `GET /property/:id`
pub async fn get_property(
    State(state): State<AppState>,
    Extension(_owner): Extension<PropertyOwner>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let property_id = parse_id(&raw_id, "property")?;

    let property = state
        .store
        .property_view(property_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("property not found".to_string()))?;

    Ok(Json(property))
}

/// `GET /property/owner`
pub async fn list_owner_properties(
    State(state): State<AppState>,
    Extension(owner): Extension<PropertyOwner>,
) -> ApiResult<impl IntoResponse> {
    let properties = state.store.property_views_by_owner(owner.id).await?;
    Ok(Json(PropertyList { properties }))
}

/// `GET /property/all`
pub async fn list_all_properties(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let properties = state.store.property_views().await?;
    Ok(Json(PropertyList { properties }))
}
