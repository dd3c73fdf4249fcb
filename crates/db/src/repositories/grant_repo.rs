//! Repositories for the two grant relations: `user_project_access` and
//! `public_project_access`.

use rigel_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::{lock_admin, AdminWrite};
use crate::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};

const USER_COLUMNS: &str = "id, user_id, project_id, granted_by, granted_at";
const PUBLIC_COLUMNS: &str = "project_id, is_public, made_public_by, made_public_at";

/// Per-user project grants.
pub struct UserAccessRepo;

impl UserAccessRepo {
    /// Ids of every project `user_id` holds a grant for.
    pub async fn list_project_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT project_id FROM user_project_access WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// A user's grants with the project title and area, newest grant first.
    pub async fn list_details(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserGrantDetail>, sqlx::Error> {
        sqlx::query_as::<_, UserGrantDetail>(
            "SELECT a.project_id, a.granted_at, p.title, p.area
             FROM user_project_access a
             JOIN properties p ON p.id = a.project_id
             WHERE a.user_id = $1
             ORDER BY a.granted_at DESC, p.title ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the full grant set of `user_id` with `project_ids`.
    ///
    /// Delete and insert run in one transaction, so readers observe either
    /// the old set or the new one. Duplicate ids are collapsed; ids that do
    /// not reference an existing property are skipped. An empty list
    /// revokes everything.
    pub async fn replace_all(
        pool: &PgPool,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<AdminWrite<Vec<UserProjectAccess>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        Self::delete_for_user(&mut tx, user_id).await?;

        let query = format!(
            "INSERT INTO user_project_access (user_id, project_id, granted_by)
             SELECT $1, p.id, $3
             FROM properties p
             WHERE p.id = ANY($2)
             ON CONFLICT (user_id, project_id) DO NOTHING
             RETURNING {USER_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, UserProjectAccess>(&query)
            .bind(user_id)
            .bind(project_ids)
            .bind(actor)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(rows))
    }

    /// Replace the grant set of `user_id` with every property that exists
    /// right now. Properties created later are not included.
    pub async fn grant_all_projects(
        pool: &PgPool,
        actor: DbId,
        user_id: DbId,
    ) -> Result<AdminWrite<Vec<UserProjectAccess>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        Self::delete_for_user(&mut tx, user_id).await?;

        let query = format!(
            "INSERT INTO user_project_access (user_id, project_id, granted_by)
             SELECT $1, p.id, $2 FROM properties p
             RETURNING {USER_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, UserProjectAccess>(&query)
            .bind(user_id)
            .bind(actor)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(rows))
    }

    /// Revoke one grant (`project_id = Some`) or all grants of a user.
    ///
    /// Returns the number of rows removed.
    pub async fn revoke(
        pool: &PgPool,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> Result<AdminWrite<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let result = sqlx::query(
            "DELETE FROM user_project_access
             WHERE user_id = $1 AND ($2::uuid IS NULL OR project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(result.rows_affected()))
    }

    async fn delete_for_user(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_project_access WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

/// Per-project public visibility flags.
pub struct PublicAccessRepo;

impl PublicAccessRepo {
    /// Ids of every project currently flagged public.
    pub async fn list_public_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT project_id FROM public_project_access WHERE is_public = TRUE")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Every property with its public flag (left join, missing rows read as
    /// not public), ordered by title.
    pub async fn list_projects_with_flag(
        pool: &PgPool,
    ) -> Result<Vec<ProjectVisibility>, sqlx::Error> {
        sqlx::query_as::<_, ProjectVisibility>(
            "SELECT p.id, p.title, p.area, COALESCE(a.is_public, FALSE) AS is_public
             FROM properties p
             LEFT JOIN public_project_access a ON a.project_id = p.id
             ORDER BY p.title ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Upsert the public flag of a project, stamping who changed it and when.
    ///
    /// Returns `Applied(None)` if the project does not exist.
    pub async fn upsert(
        pool: &PgPool,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> Result<AdminWrite<Option<PublicProjectAccess>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_admin(&mut tx, actor).await? {
            return Ok(AdminWrite::Denied);
        }

        let query = format!(
            "INSERT INTO public_project_access (project_id, is_public, made_public_by, made_public_at)
             SELECT $1, $2, $3, NOW()
             WHERE EXISTS (SELECT 1 FROM properties WHERE id = $1)
             ON CONFLICT (project_id) DO UPDATE SET
                is_public = EXCLUDED.is_public,
                made_public_by = EXCLUDED.made_public_by,
                made_public_at = EXCLUDED.made_public_at
             RETURNING {PUBLIC_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PublicProjectAccess>(&query)
            .bind(project_id)
            .bind(is_public)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AdminWrite::Applied(row))
    }
}
