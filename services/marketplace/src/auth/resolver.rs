//! Principal resolution: turn a validated token subject into a stored record

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{PrincipalKind, PropertyOwner, User},
    store::{MarketplaceStore, StoreError},
};

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The token was valid but its principal no longer exists
    #[error("{kind} {id} not found")]
    PrincipalNotFound { kind: PrincipalKind, id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Looks principals up by ID; no caching
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn MarketplaceStore>,
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_user(&self, id: Uuid) -> Result<User, ResolveError> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or(ResolveError::PrincipalNotFound {
                kind: PrincipalKind::User,
                id,
            })
    }

    pub async fn resolve_owner(&self, id: Uuid) -> Result<PropertyOwner, ResolveError> {
        self.store
            .find_owner_by_id(id)
            .await?
            .ok_or(ResolveError::PrincipalNotFound {
                kind: PrincipalKind::PropertyOwner,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{NewPropertyOwner, NewUser},
        store::MemoryStore,
    };

    #[tokio::test]
    async fn test_resolves_existing_principals() {
        let store = Arc::new(MemoryStore::new());
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
        let resolver = PrincipalResolver::new(store);

        assert_eq!(resolver.resolve_user(user.id).await.unwrap().email, "alice@x.com");
        assert_eq!(
            resolver.resolve_owner(owner.id).await.unwrap().email,
            "olivia@x.com"
        );
    }

    #[tokio::test]
    async fn test_lookups_do_not_cross_principal_tables() {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let resolver = PrincipalResolver::new(store);

        let err = resolver.resolve_owner(user.id).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::PrincipalNotFound {
                kind: PrincipalKind::PropertyOwner,
                ..
            }
        ));
    }
}
