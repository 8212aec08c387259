//! Property listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::OwnerSummary;

/// Property entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New property creation payload
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub owner_id: Uuid,
}

/// Property update payload; the owner is never reassigned
#[derive(Debug, Clone, Default)]
pub struct UpdateProperty {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

/// Request body for `POST /property/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyRequest {
    pub property_name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
}

/// Property joined with its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyView {
    pub property_id: Uuid,
    pub property_name: String,
    pub description: String,
    pub price: i64,
    pub property_owner: OwnerSummary,
}

/// Response wrapper for property listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyList {
    pub properties: Vec<PropertyView>,
}
