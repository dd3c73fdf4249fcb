//! Repository for the `properties` table.

use rigel_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{lock_admin, AdminWrite};
use crate::models::property::{CreateProperty, Property, UpdateProperty};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, area, price, size, bedrooms, bathrooms, status, golden_visa, \
                       purchase_price, transfer_fees, renovation_cost, selling_price, images, \
                       description, completion_year, created_at";

/// Provides CRUD operations for property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row.
    pub async fn create(
        pool: &PgPool,
        actor: DbId,
        input: &CreateProperty,
    ) -> Result<AdminWrite<Property>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let query = format!(
            "INSERT INTO properties
                (title, area, price, size, bedrooms, bathrooms, status, golden_visa,
                 purchase_price, transfer_fees, renovation_cost, selling_price, images,
                 description, completion_year)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(&input.title)
            .bind(&input.area)
            .bind(input.price)
            .bind(input.size)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.status.as_str())
            .bind(input.golden_visa)
            .bind(input.purchase_price)
            .bind(input.transfer_fees)
            .bind(input.renovation_cost)
            .bind(input.selling_price)
            .bind(Json(&input.images))
            .bind(&input.description)
            .bind(input.completion_year)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(property))
    }

    /// Find a property by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all properties, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties ORDER BY created_at DESC");
        sqlx::query_as::<_, Property>(&query).fetch_all(pool).await
    }

    /// Update a property. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `Applied(None)` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        actor: DbId,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<AdminWrite<Option<Property>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let query = format!(
            "UPDATE properties SET
                title = COALESCE($2, title),
                area = COALESCE($3, area),
                price = COALESCE($4, price),
                size = COALESCE($5, size),
                bedrooms = COALESCE($6, bedrooms),
                bathrooms = COALESCE($7, bathrooms),
                status = COALESCE($8, status),
                golden_visa = COALESCE($9, golden_visa),
                purchase_price = COALESCE($10, purchase_price),
                transfer_fees = COALESCE($11, transfer_fees),
                renovation_cost = COALESCE($12, renovation_cost),
                selling_price = COALESCE($13, selling_price),
                images = COALESCE($14, images),
                description = COALESCE($15, description),
                completion_year = COALESCE($16, completion_year)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.area)
            .bind(input.price)
            .bind(input.size)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.golden_visa)
            .bind(input.purchase_price)
            .bind(input.transfer_fees)
            .bind(input.renovation_cost)
            .bind(input.selling_price)
            .bind(input.images.as_ref().map(Json))
            .bind(&input.description)
            .bind(input.completion_year)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(property))
    }

    /// Delete a property. Grants and inquiries referencing it cascade.
    ///
    /// Returns `Applied(true)` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        actor: DbId,
        id: DbId,
    ) -> Result<AdminWrite<bool>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(result.rows_affected() > 0))
    }
}
