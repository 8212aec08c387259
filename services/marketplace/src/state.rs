//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    auth::{PrincipalResolver, TokenService},
    booking::BookingLifecycle,
    store::MarketplaceStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketplaceStore>,
    pub tokens: TokenService,
    pub resolver: PrincipalResolver,
    pub bookings: BookingLifecycle,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketplaceStore>, tokens: TokenService) -> Self {
        Self {
            resolver: PrincipalResolver::new(store.clone()),
            bookings: BookingLifecycle::new(store.clone()),
            store,
            tokens,
        }
    }
}
