//! Booking routes for users, owners and cancellation

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use super::parse_id;
use crate::{
    error::{ApiError, ApiResult},
    models::{BookingList, PropertyOwner, User},
    state::AppState,
};

fn booking_not_found() -> ApiError {
    ApiError::NotFound("booking not found".to_string())
}

/// `POST /user/booking/:id` where the ID names the property
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let property_id = parse_id(&raw_id, "property")?;
    let booking = state.bookings.create_booking(&user, property_id).await?;

    Ok(Json(json!({
        "message": "successfully booked",
        "booking": booking,
    })))
}

/// `GET /user/booking`
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    let bookings = state.bookings.list_user_bookings(&user).await?;
    Ok(Json(BookingList { bookings }))
}

/// `GET /user/booking/:id`
pub async fn get_user_booking(
    State(state): State<AppState>,
    Extension(_user): Extension<User>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let booking_id = parse_id(&raw_id, "booking")?;
    let booking = state
        .bookings
        .get_user_booking(booking_id)
        .await?
        .ok_or_else(booking_not_found)?;

    Ok(Json(booking))
}

/// `DELETE /cancel/booking/:id`
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let booking_id = parse_id(&raw_id, "booking")?;
    state.bookings.cancel_booking(booking_id).await?;

    Ok(Json(json!({ "message": "booking cancelled" })))
}

/// `GET /owner/booking/all`
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    Extension(owner): Extension<PropertyOwner>,
) -> ApiResult<impl IntoResponse> {
    let bookings = state.bookings.list_owner_bookings(&owner).await?;
    Ok(Json(BookingList { bookings }))
}

/// `GET /owner/booking/:id`
pub async fn get_owner_booking(
    State(state): State<AppState>,
    Extension(_owner): Extension<PropertyOwner>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let booking_id = parse_id(&raw_id, "booking")?;
    let booking = state
        .bookings
        .get_owner_booking(booking_id)
        .await?
        .ok_or_else(booking_not_found)?;

    Ok(Json(booking))
}

/// `PUT /owner/booking/:id`
pub async fn confirm_booking(
    State(state): State<AppState>,
    Extension(owner): Extension<PropertyOwner>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let booking_id = parse_id(&raw_id, "booking")?;
    state.bookings.confirm_booking(&owner, booking_id).await?;

    Ok(Json(json!({ "message": "booking confirmed" })))
}
