//! Repository for the `profiles` table.

use rigel_core::types::DbId;
use sqlx::PgPool;

use super::{lock_admin, AdminWrite};
use crate::models::profile::Profile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, is_admin, is_premium, created_at";

/// SQLSTATE raised by the roster function for non-admin callers.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Provides read and role-flag operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by user id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create the profile for a newly seen session, or refresh its email.
    ///
    /// Role flags of an existing row are left untouched.
    pub async fn ensure(pool: &PgPool, id: DbId, email: &str) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email)
             VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Full user roster through the `get_all_users_for_admin()` function.
    ///
    /// The function refuses callers whose `app.user_id` is not an admin, so
    /// the actor is bound to the transaction before it is called.
    pub async fn list_for_admin(
        pool: &PgPool,
        actor: DbId,
    ) -> Result<AdminWrite<Vec<Profile>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT set_config('app.user_id', $1::text, true)")
            .bind(actor)
            .execute(&mut *tx)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM get_all_users_for_admin()");
        let result = sqlx::query_as::<_, Profile>(&query)
            .fetch_all(&mut *tx)
            .await;

        match result {
            Ok(profiles) => {
                tx.commit().await?;
                Ok(AdminWrite::Applied(profiles))
            }
            Err(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) =>
            {
                Ok(AdminWrite::Denied)
            }
            Err(e) => Err(e),
        }
    }

    /// Set `is_premium` on `target`. Returns `Applied(None)` if the target
    /// does not exist.
    pub async fn set_premium(
        pool: &PgPool,
        actor: DbId,
        target: DbId,
        is_premium: bool,
    ) -> Result<AdminWrite<Option<Profile>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let query = format!(
            "UPDATE profiles SET is_premium = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(target)
            .bind(is_premium)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(profile))
    }

    /// Set `is_admin` on `target`. Granting admin also sets `is_premium`,
    /// so admin implies premium in storage too. Revoking admin leaves
    /// `is_premium` as it is.
    pub async fn set_admin(
        pool: &PgPool,
        actor: DbId,
        target: DbId,
        is_admin: bool,
    ) -> Result<AdminWrite<Option<Profile>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let query = format!(
            "UPDATE profiles SET
                is_admin = $2,
                is_premium = CASE WHEN $2 THEN TRUE ELSE is_premium END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(target)
            .bind(is_admin)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(profile))
    }
}
