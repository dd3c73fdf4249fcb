//! Contact inquiry entity model and DTO.

use rigel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Inquiry {
    pub id: DbId,
    pub project_id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: Timestamp,
}

/// An inquiry joined with the title of the property it is about.
///
/// `project_title` is `None` only if the property vanished between the
/// inquiry insert and the read.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct InquiryWithProject {
    pub id: DbId,
    pub project_id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: Timestamp,
    pub project_title: Option<String>,
}

/// DTO for submitting an inquiry from the contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInquiry {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateInquiry {
        CreateInquiry {
            project_id: DbId::new_v4(),
            full_name: "Maria Pappas".into(),
            email: "maria@example.com".into(),
            phone: None,
            message: "Is the villa still available?".into(),
        }
    }

    #[test]
    fn test_valid_inquiry() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut bad = input();
        bad.email = "not-an-email".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut bad = input();
        bad.message = String::new();
        assert!(bad.validate().is_err());
    }
}
