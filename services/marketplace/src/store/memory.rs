//! In-process implementation of the persistence gateway
//!
//! Mirrors the relational constraints of the PostgreSQL schema: emails are
//! unique per principal table, properties must reference an existing owner and
//! bookings must reference an existing user and property. Each operation takes
//! the lock once, which gives the same single-statement atomicity the SQL
//! backend relies on.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{MarketplaceStore, StoreError, StoreResult};
use crate::models::{
    Booking, BookingStatus, NewBooking, NewProperty, NewPropertyOwner, NewUser,
    OwnerBookingView, OwnerSummary, PrincipalKind, Property, PropertyOwner, PropertyView,
    UpdateProperty, User, UserBookingView,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    owners: HashMap<Uuid, PropertyOwner>,
    properties: HashMap<Uuid, Property>,
    bookings: HashMap<Uuid, Booking>,
}

impl Tables {
    fn property_view(&self, property: &Property) -> Option<PropertyView> {
        let owner = self.owners.get(&property.owner_id)?;
        Some(PropertyView {
            property_id: property.id,
            property_name: property.name.clone(),
            description: property.description.clone(),
            price: property.price,
            property_owner: OwnerSummary {
                owner_id: owner.id,
                name: owner.name.clone(),
                email: owner.email.clone(),
            },
        })
    }

    fn user_booking_view(&self, booking: &Booking) -> Option<UserBookingView> {
        let property = self.properties.get(&booking.property_id)?;
        Some(UserBookingView {
            booking_id: booking.id,
            property_id: property.id,
            property_name: property.name.clone(),
            status: booking.status,
        })
    }

    /// Properties in creation time order, ties broken by ID
    fn sorted_properties(&self) -> Vec<&Property> {
        let mut properties: Vec<&Property> = self.properties.values().collect();
        properties.sort_by_key(|p| (p.created_at, p.id));
        properties
    }

    /// Bookings in creation time order, ties broken by ID
    fn sorted_bookings(&self) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self.bookings.values().collect();
        bookings.sort_by_key(|b| (b.created_at, b.id));
        bookings
    }
}

fn owner_booking_view(booking: &Booking) -> OwnerBookingView {
    OwnerBookingView {
        booking_id: booking.id,
        property_id: booking.property_id,
        user_id: booking.user_id,
        status: booking.status,
    }
}

/// Store keeping every table in process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: PrincipalKind::User.role().to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_owner(&self, new_owner: NewPropertyOwner) -> StoreResult<PropertyOwner> {
        let mut tables = self.tables.write().await;
        if tables.owners.values().any(|o| o.email == new_owner.email) {
            return Err(StoreError::UniqueViolation(
                "property_owners_email_key".to_string(),
            ));
        }

        let now = Utc::now();
        let owner = PropertyOwner {
            id: Uuid::new_v4(),
            name: new_owner.name,
            email: new_owner.email,
            password_hash: new_owner.password_hash,
            role: PrincipalKind::PropertyOwner.role().to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.owners.insert(owner.id, owner.clone());
        Ok(owner)
    }

    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<PropertyOwner>> {
        Ok(self.tables.read().await.owners.get(&id).cloned())
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<PropertyOwner>> {
        let tables = self.tables.read().await;
        Ok(tables.owners.values().find(|o| o.email == email).cloned())
    }

    async fn create_property(&self, new_property: NewProperty) -> StoreResult<Property> {
        let mut tables = self.tables.write().await;
        if !tables.owners.contains_key(&new_property.owner_id) {
            return Err(StoreError::ForeignKeyViolation(
                "properties_owner_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            name: new_property.name,
            description: new_property.description,
            price: new_property.price,
            owner_id: new_property.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn find_property_by_id(&self, id: Uuid) -> StoreResult<Option<Property>> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn update_property(
        &self,
        id: Uuid,
        changes: UpdateProperty,
    ) -> StoreResult<Option<Property>> {
        let mut tables = self.tables.write().await;
        let Some(property) = tables.properties.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            property.name = name;
        }
        if let Some(description) = changes.description {
            property.description = description;
        }
        if let Some(price) = changes.price {
            property.price = price;
        }
        property.updated_at = Utc::now();

        Ok(Some(property.clone()))
    }

    async fn delete_property(&self, id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.property_id == id) {
            return Err(StoreError::ForeignKeyViolation(
                "bookings_property_id_fkey".to_string(),
            ));
        }
        Ok(tables.properties.remove(&id).map_or(0, |_| 1))
    }

    async fn property_view(&self, id: Uuid) -> StoreResult<Option<PropertyView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .get(&id)
            .and_then(|p| tables.property_view(p)))
    }

    async fn property_views_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<PropertyView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_properties()
            .into_iter()
            .filter(|p| p.owner_id == owner_id)
            .filter_map(|p| tables.property_view(p))
            .collect())
    }

    async fn property_views(&self) -> StoreResult<Vec<PropertyView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_properties()
            .into_iter()
            .filter_map(|p| tables.property_view(p))
            .collect())
    }

    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new_booking.user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "bookings_user_id_fkey".to_string(),
            ));
        }
        if !tables.properties.contains_key(&new_booking.property_id) {
            return Err(StoreError::ForeignKeyViolation(
                "bookings_property_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: new_booking.user_id,
            property_id: new_booking.property_id,
            check_in: None,
            check_out: None,
            status: new_booking.status,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking_by_id(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn bookings_by_property(&self, property_id: Uuid) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_bookings()
            .into_iter()
            .filter(|b| b.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&id) {
            Some(booking) => {
                booking.status = status;
                booking.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        Ok(tables.bookings.remove(&id).map_or(0, |_| 1))
    }

    async fn user_booking_views(&self, user_id: Uuid) -> StoreResult<Vec<UserBookingView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_bookings()
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| tables.user_booking_view(b))
            .collect())
    }

    async fn user_booking_view(&self, booking_id: Uuid) -> StoreResult<Option<UserBookingView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .get(&booking_id)
            .and_then(|b| tables.user_booking_view(b)))
    }

    async fn owner_booking_views(&self, owner_id: Uuid) -> StoreResult<Vec<OwnerBookingView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_bookings()
            .into_iter()
            .filter(|b| {
                tables
                    .properties
                    .get(&b.property_id)
                    .is_some_and(|p| p.owner_id == owner_id)
            })
            .map(owner_booking_view)
            .collect())
    }

    async fn owner_booking_view(
        &self,
        booking_id: Uuid,
    ) -> StoreResult<Option<OwnerBookingView>> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.get(&booking_id).map(owner_booking_view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &MemoryStore) -> (User, PropertyOwner, Property) {
        let user = store
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let owner = store
            .create_owner(NewPropertyOwner {
                name: "Olivia".to_string(),
                email: "olivia@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let property = store
            .create_property(NewProperty {
                name: "Lake House".to_string(),
                description: "By the water".to_string(),
                price: 12_000,
                owner_id: owner.id,
            })
            .await
            .unwrap();
        (user, owner, property)
    }

    #[tokio::test]
    async fn test_email_unique_per_principal_table() {
        let store = MemoryStore::new();
        seed(&store).await;

        let duplicate = store
            .create_user(NewUser {
                name: "Other".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(matches!(duplicate, Err(StoreError::UniqueViolation(_))));

        // The same address is still free on the owner side
        let owner = store
            .create_owner(NewPropertyOwner {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(owner.is_ok());
    }

    #[tokio::test]
    async fn test_booking_requires_existing_property_and_user() {
        let store = MemoryStore::new();
        let (user, _, property) = seed(&store).await;

        let missing_property = store
            .create_booking(NewBooking {
                user_id: user.id,
                property_id: Uuid::new_v4(),
                status: BookingStatus::Pending,
            })
            .await;
        assert!(matches!(
            missing_property,
            Err(StoreError::ForeignKeyViolation(_))
        ));

        let missing_user = store
            .create_booking(NewBooking {
                user_id: Uuid::new_v4(),
                property_id: property.id,
                status: BookingStatus::Pending,
            })
            .await;
        assert!(matches!(missing_user, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_property() {
        let store = MemoryStore::new();
        let (_, owner, property) = seed(&store).await;

        let updated = store
            .update_property(
                property.id,
                UpdateProperty {
                    price: Some(15_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("property exists");
        assert_eq!(updated.price, 15_000);
        assert_eq!(updated.name, "Lake House");
        assert_eq!(updated.owner_id, owner.id);

        assert!(
            store
                .update_property(Uuid::new_v4(), UpdateProperty::default())
                .await
                .unwrap()
                .is_none()
        );

        assert_eq!(store.delete_property(property.id).await.unwrap(), 1);
        assert_eq!(store.delete_property(property.id).await.unwrap(), 0);
        assert!(store.find_property_by_id(property.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_property_with_bookings_cannot_be_deleted() {
        let store = MemoryStore::new();
        let (user, _, property) = seed(&store).await;
        store
            .create_booking(NewBooking {
                user_id: user.id,
                property_id: property.id,
                status: BookingStatus::Pending,
            })
            .await
            .unwrap();

        let result = store.delete_property(property.id).await;
        assert!(matches!(result, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_booking_projections_join_through_property() {
        let store = MemoryStore::new();
        let (user, owner, property) = seed(&store).await;
        let booking = store
            .create_booking(NewBooking {
                user_id: user.id,
                property_id: property.id,
                status: BookingStatus::Pending,
            })
            .await
            .unwrap();

        let user_views = store.user_booking_views(user.id).await.unwrap();
        assert_eq!(user_views.len(), 1);
        assert_eq!(user_views[0].property_name, "Lake House");

        let owner_views = store.owner_booking_views(owner.id).await.unwrap();
        assert_eq!(owner_views.len(), 1);
        assert_eq!(owner_views[0].user_id, user.id);

        let other_owner = store.owner_booking_views(Uuid::new_v4()).await.unwrap();
        assert!(other_owner.is_empty());

        let by_property = store.bookings_by_property(property.id).await.unwrap();
        assert_eq!(by_property.len(), 1);
        assert_eq!(by_property[0].id, booking.id);
    }

    #[tokio::test]
    async fn test_status_update_and_delete_report_rows_affected() {
        let store = MemoryStore::new();
        let (user, _, property) = seed(&store).await;
        let booking = store
            .create_booking(NewBooking {
                user_id: user.id,
                property_id: property.id,
                status: BookingStatus::Pending,
            })
            .await
            .unwrap();

        assert_eq!(
            store
                .update_booking_status(booking.id, BookingStatus::Confirmed)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .update_booking_status(Uuid::new_v4(), BookingStatus::Confirmed)
                .await
                .unwrap(),
            0
        );

        assert_eq!(store.delete_booking(booking.id).await.unwrap(), 1);
        assert_eq!(store.delete_booking(booking.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listings_sorted_by_creation_time_then_id() {
        let store = MemoryStore::new();
        let (user, _, property) = seed(&store).await;
        for _ in 0..8 {
            store
                .create_booking(NewBooking {
                    user_id: user.id,
                    property_id: property.id,
                    status: BookingStatus::Pending,
                })
                .await
                .unwrap();
        }

        let bookings = store.bookings_by_property(property.id).await.unwrap();
        assert_eq!(bookings.len(), 8);
        assert!(
            bookings
                .windows(2)
                .all(|w| (w[0].created_at, w[0].id) <= (w[1].created_at, w[1].id))
        );
    }
}
