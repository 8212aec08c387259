//! Booking marketplace service
//!
//! Users sign up, browse properties and book them; property owners list
//! properties and confirm bookings. Both kinds of principal authenticate with
//! bearer tokens issued at signup or login.
//!
//! The binary wires [`routes::create_router`] to either the PostgreSQL store
//! or the in-memory store depending on configuration.

pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
