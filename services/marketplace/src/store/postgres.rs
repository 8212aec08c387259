//! PostgreSQL implementation of the persistence gateway

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info};
use uuid::Uuid;

use super::{MarketplaceStore, StoreError, StoreResult};
use crate::models::{
    Booking, BookingStatus, NewBooking, NewProperty, NewPropertyOwner, NewUser,
    OwnerBookingView, OwnerSummary, PrincipalKind, Property, PropertyOwner, PropertyView,
    UpdateProperty, User, UserBookingView,
};

const PROPERTY_VIEW_SELECT: &str = r#"
    SELECT p.id AS property_id, p.name AS property_name, p.description, p.price,
           o.id AS owner_id, o.name AS owner_name, o.email AS owner_email
    FROM properties p
    JOIN property_owners o ON o.id = p.owner_id
"#;

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> DatabaseResult<()> {
        info!("Applying database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        Ok(())
    }
}

/// Sort constraint failures out of generic sqlx errors
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation(constraint);
        }
    }
    StoreError::Database(err)
}

fn booking_from_row(row: &PgRow) -> StoreResult<Booking> {
    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        property_id: row.try_get("property_id")?,
        check_in: row.try_get("check_in")?,
        check_out: row.try_get("check_out")?,
        status: status_from_row(row)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn status_from_row(row: &PgRow) -> StoreResult<BookingStatus> {
    let raw: String = row.try_get("status")?;
    raw.parse()
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

fn property_view_from_row(row: &PgRow) -> StoreResult<PropertyView> {
    Ok(PropertyView {
        property_id: row.try_get("property_id")?,
        property_name: row.try_get("property_name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        property_owner: OwnerSummary {
            owner_id: row.try_get("owner_id")?,
            name: row.try_get("owner_name")?,
            email: row.try_get("owner_email")?,
        },
    })
}

fn user_booking_view_from_row(row: &PgRow) -> StoreResult<UserBookingView> {
    Ok(UserBookingView {
        booking_id: row.try_get("booking_id")?,
        property_id: row.try_get("property_id")?,
        property_name: row.try_get("property_name")?,
        status: status_from_row(row)?,
    })
}

fn owner_booking_view_from_row(row: &PgRow) -> StoreResult<OwnerBookingView> {
    Ok(OwnerBookingView {
        booking_id: row.try_get("booking_id")?,
        property_id: row.try_get("property_id")?,
        user_id: row.try_get("user_id")?,
        status: status_from_row(row)?,
    })
}

#[async_trait]
impl MarketplaceStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        debug!("Creating user: {}", new_user.email);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(PrincipalKind::User.role())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_owner(&self, new_owner: NewPropertyOwner) -> StoreResult<PropertyOwner> {
        debug!("Creating property owner: {}", new_owner.email);

        sqlx::query_as::<_, PropertyOwner>(
            r#"
            INSERT INTO property_owners (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_owner.name)
        .bind(&new_owner.email)
        .bind(&new_owner.password_hash)
        .bind(PrincipalKind::PropertyOwner.role())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<PropertyOwner>> {
        let owner = sqlx::query_as::<_, PropertyOwner>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM property_owners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<PropertyOwner>> {
        let owner = sqlx::query_as::<_, PropertyOwner>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM property_owners
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    async fn create_property(&self, new_property: NewProperty) -> StoreResult<Property> {
        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (id, name, description, price, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_property.name)
        .bind(&new_property.description)
        .bind(new_property.price)
        .bind(new_property.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_property_by_id(&self, id: Uuid) -> StoreResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, description, price, owner_id, created_at, updated_at
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn update_property(
        &self,
        id: Uuid,
        changes: UpdateProperty,
    ) -> StoreResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(property)
    }

    async fn delete_property(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected())
    }

    async fn property_view(&self, id: Uuid) -> StoreResult<Option<PropertyView>> {
        let sql = format!("{PROPERTY_VIEW_SELECT} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(property_view_from_row).transpose()
    }

    async fn property_views_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<PropertyView>> {
        let sql = format!("{PROPERTY_VIEW_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at");
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(property_view_from_row).collect()
    }

    async fn property_views(&self) -> StoreResult<Vec<PropertyView>> {
        let sql = format!("{PROPERTY_VIEW_SELECT} ORDER BY p.created_at");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(property_view_from_row).collect()
    }

    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking> {
        let row = sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, property_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, property_id, check_in, check_out, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_booking.user_id)
        .bind(new_booking.property_id)
        .bind(new_booking.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        booking_from_row(&row)
    }

    async fn find_booking_by_id(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, property_id, check_in, check_out, status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn bookings_by_property(&self, property_id: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, property_id, check_in, check_out, status, created_at, updated_at
            FROM bookings
            WHERE property_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected())
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn user_booking_views(&self, user_id: Uuid) -> StoreResult<Vec<UserBookingView>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id AS booking_id, b.property_id, p.name AS property_name, b.status
            FROM bookings b
            JOIN properties p ON b.property_id = p.id
            WHERE b.user_id = $1
            ORDER BY b.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_booking_view_from_row).collect()
    }

    async fn user_booking_view(&self, booking_id: Uuid) -> StoreResult<Option<UserBookingView>> {
        let row = sqlx::query(
            r#"
            SELECT b.id AS booking_id, p.id AS property_id, p.name AS property_name, b.status
            FROM bookings b
            JOIN properties p ON b.property_id = p.id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_booking_view_from_row).transpose()
    }

    async fn owner_booking_views(&self, owner_id: Uuid) -> StoreResult<Vec<OwnerBookingView>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id AS booking_id, b.property_id, b.user_id, b.status
            FROM bookings b
            JOIN properties p ON b.property_id = p.id
            WHERE p.owner_id = $1
            ORDER BY b.created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(owner_booking_view_from_row).collect()
    }

    async fn owner_booking_view(
        &self,
        booking_id: Uuid,
    ) -> StoreResult<Option<OwnerBookingView>> {
        let row = sqlx::query(
            r#"
            SELECT b.id AS booking_id, b.property_id, b.user_id, b.status
            FROM bookings b
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(owner_booking_view_from_row).transpose()
    }
}
