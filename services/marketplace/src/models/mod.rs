//! Marketplace domain models and request/response payloads

pub mod booking;
pub mod property;
pub mod user;

// Re-export for convenience
pub use booking::{
    Booking, BookingList, BookingStatus, NewBooking, OwnerBookingView, UnknownStatus,
    UserBookingView,
};
pub use property::{
    CreatePropertyRequest, NewProperty, Property, PropertyList, PropertyView, UpdateProperty,
};
pub use user::{
    LoginRequest, NewPropertyOwner, NewUser, OwnerSummary, PrincipalKind, PropertyOwner,
    SignupRequest, User,
};
