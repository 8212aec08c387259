//! Persistence gateway for the marketplace
//!
//! [`MarketplaceStore`] is the only way business logic touches storage. Every
//! method is a single storage operation; lookups return `Ok(None)` when the
//! row is absent so that "not found" never gets confused with a failing
//! backend. Cross-entity reads are explicit join methods rather than lazily
//! loaded associations.
//!
//! Two implementations exist: [`PgStore`] over PostgreSQL and [`MemoryStore`],
//! an in-process store with the same constraint semantics.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Booking, BookingStatus, NewBooking, NewProperty, NewPropertyOwner, NewUser,
    OwnerBookingView, Property, PropertyOwner, PropertyView, UpdateProperty, User,
    UserBookingView,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by storage backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. duplicate email)
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Transport, decoding or any other backend failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations consumed by the token, guard and booking layers
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Confirm the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    // Property owners
    async fn create_owner(&self, new_owner: NewPropertyOwner) -> StoreResult<PropertyOwner>;
    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<PropertyOwner>>;
    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<PropertyOwner>>;

    // Properties
    async fn create_property(&self, new_property: NewProperty) -> StoreResult<Property>;
    async fn find_property_by_id(&self, id: Uuid) -> StoreResult<Option<Property>>;
    /// Returns the updated row, or `None` when no property has this id
    async fn update_property(
        &self,
        id: Uuid,
        changes: UpdateProperty,
    ) -> StoreResult<Option<Property>>;
    /// Returns the number of rows removed
    async fn delete_property(&self, id: Uuid) -> StoreResult<u64>;
    async fn property_view(&self, id: Uuid) -> StoreResult<Option<PropertyView>>;
    async fn property_views_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<PropertyView>>;
    async fn property_views(&self) -> StoreResult<Vec<PropertyView>>;

    // Bookings
    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking>;
    async fn find_booking_by_id(&self, id: Uuid) -> StoreResult<Option<Booking>>;
    async fn bookings_by_property(&self, property_id: Uuid) -> StoreResult<Vec<Booking>>;
    /// Returns the number of rows updated
    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<u64>;
    /// Returns the number of rows removed
    async fn delete_booking(&self, id: Uuid) -> StoreResult<u64>;

    // Booking projections
    async fn user_booking_views(&self, user_id: Uuid) -> StoreResult<Vec<UserBookingView>>;
    async fn user_booking_view(&self, booking_id: Uuid) -> StoreResult<Option<UserBookingView>>;
    async fn owner_booking_views(&self, owner_id: Uuid) -> StoreResult<Vec<OwnerBookingView>>;
    async fn owner_booking_view(&self, booking_id: Uuid)
    -> StoreResult<Option<OwnerBookingView>>;
}
