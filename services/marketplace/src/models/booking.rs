//! Bookings and the projections served to users and owners

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// Booking status.
///
/// Bookings start `Pending` and move to `Confirmed` when an owner confirms
/// them. Cancellation deletes the row, so `Cancelled` is never assigned by the
/// service; it is only recognised when read back from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not one of the known values
#[derive(Debug, Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New booking creation payload
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub status: BookingStatus,
}

/// Booking joined with the booked property's name, as seen by users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBookingView {
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub property_name: String,
    pub status: BookingStatus,
}

/// Booking as seen by property owners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerBookingView {
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
}

/// Response wrapper for booking listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingList<T> {
    pub bookings: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_stored_values() {
        assert_eq!("pending".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert_eq!(
            "confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            "cancelled".parse::<BookingStatus>().unwrap(),
            BookingStatus::Cancelled
        );
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let err = "Pending".parse::<BookingStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown booking status: Pending");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }
}
