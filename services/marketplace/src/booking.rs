//! Booking lifecycle
//!
//! ```text
//! create ──> pending ──confirm──> confirmed
//!               │                     │
//!               └──────cancel─────────┴──> (row deleted)
//! ```
//!
//! Each operation is exactly one store call. Lookups by booking ID are not
//! scoped to the caller, confirmation does not check which owner holds the
//! property or what the current status is, and cancellation is a hard
//! delete that succeeds whether or not the row existed.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{
        Booking, BookingStatus, NewBooking, OwnerBookingView, PropertyOwner, User,
        UserBookingView,
    },
    store::{MarketplaceStore, StoreResult},
};

#[derive(Clone)]
pub struct BookingLifecycle {
    store: Arc<dyn MarketplaceStore>,
}

impl BookingLifecycle {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Book a property for `user`. No availability or duplicate check is made.
    pub async fn create_booking(&self, user: &User, property_id: Uuid) -> StoreResult<Booking> {
        let booking = self
            .store
            .create_booking(NewBooking {
                user_id: user.id,
                property_id,
                status: BookingStatus::Pending,
            })
            .await?;

        info!(
            "User {} booked property {} (booking {})",
            user.id, property_id, booking.id
        );
        Ok(booking)
    }

    pub async fn list_user_bookings(&self, user: &User) -> StoreResult<Vec<UserBookingView>> {
        self.store.user_booking_views(user.id).await
    }

    pub async fn get_user_booking(&self, booking_id: Uuid) -> StoreResult<Option<UserBookingView>> {
        self.store.user_booking_view(booking_id).await
    }

    /// Bookings across every property `owner` holds
    pub async fn list_owner_bookings(
        &self,
        owner: &PropertyOwner,
    ) -> StoreResult<Vec<OwnerBookingView>> {
        self.store.owner_booking_views(owner.id).await
    }

    pub async fn get_owner_booking(
        &self,
        booking_id: Uuid,
    ) -> StoreResult<Option<OwnerBookingView>> {
        self.store.owner_booking_view(booking_id).await
    }

    /// Mark a booking confirmed. Unknown IDs are not reported.
    pub async fn confirm_booking(&self, owner: &PropertyOwner, booking_id: Uuid) -> StoreResult<()> {
        let updated = self
            .store
            .update_booking_status(booking_id, BookingStatus::Confirmed)
            .await?;

        info!(
            "Owner {} confirmed booking {} ({} row(s) updated)",
            owner.id, booking_id, updated
        );
        Ok(())
    }

    /// Delete a booking. Deleting a missing booking is not an error.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> StoreResult<()> {
        let removed = self.store.delete_booking(booking_id).await?;
        info!("Cancelled booking {} ({} row(s) removed)", booking_id, removed);
        Ok(())
    }
}
