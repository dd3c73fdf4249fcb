//! Repository for the `inquiries` table.

use rigel_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::{CreateInquiry, Inquiry, InquiryWithProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, full_name, email, phone, message, created_at";

/// Provides insert and read operations for contact inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert an inquiry. Returns `None` if the referenced property does not
    /// exist.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInquiry,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO inquiries (project_id, full_name, email, phone, message)
             SELECT $1, $2, $3, $4, $5
             WHERE EXISTS (SELECT 1 FROM properties WHERE id = $1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(input.project_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.message)
            .fetch_optional(pool)
            .await
    }

    /// Inquiries about one property, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// All inquiries with the property title, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<InquiryWithProject>, sqlx::Error> {
        sqlx::query_as::<_, InquiryWithProject>(
            "SELECT i.id, i.project_id, i.full_name, i.email, i.phone, i.message, i.created_at,
                    p.title AS project_title
             FROM inquiries i
             LEFT JOIN properties p ON p.id = i.project_id
             ORDER BY i.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
