//! Public contact-form intake. Anyone may submit, signed in or not.

use std::sync::Arc;

use rigel_core::error::CoreError;
use rigel_db::models::inquiry::{CreateInquiry, Inquiry};
use validator::Validate;

use crate::store::InquiryStore;

pub struct InquiryIntake {
    store: Arc<dyn InquiryStore>,
}

impl InquiryIntake {
    pub fn new(store: Arc<dyn InquiryStore>) -> Self {
        Self { store }
    }

    /// Validate and store an inquiry about an existing property.
    pub async fn submit(&self, mut input: CreateInquiry) -> Result<Inquiry, CoreError> {
        input.full_name = input.full_name.trim().to_string();
        input.email = input.email.trim().to_string();
        input.message = input.message.trim().to_string();
        input.phone = input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let inquiry = self
            .store
            .create_inquiry(&input)
            .await?
            .ok_or_else(|| CoreError::not_found("property", input.project_id))?;

        tracing::info!(inquiry_id = %inquiry.id, project_id = %inquiry.project_id, "Inquiry received");
        Ok(inquiry)
    }
}
