//! Property (listing) entity model and DTOs.

use rigel_core::finance::property_roi;
use rigel_core::images::{validate_images, PropertyImage};
use rigel_core::listing::{Listing, PropertyStatus};
use rigel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `properties` table.
///
/// ROI is not a column; call [`Listing::roi`] to derive it from the
/// financial fields.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub title: String,
    pub area: String,
    pub price: f64,
    pub size: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[sqlx(try_from = "String")]
    pub status: PropertyStatus,
    pub golden_visa: bool,
    pub purchase_price: f64,
    pub transfer_fees: f64,
    pub renovation_cost: f64,
    pub selling_price: f64,
    pub images: Json<Vec<PropertyImage>>,
    pub description: String,
    pub completion_year: Option<i32>,
    pub created_at: Timestamp,
}

impl Listing for Property {
    fn listing_id(&self) -> DbId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn area(&self) -> &str {
        &self.area
    }

    fn status(&self) -> PropertyStatus {
        self.status
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn golden_visa(&self) -> bool {
        self.golden_visa
    }

    fn roi(&self) -> f64 {
        property_roi(
            self.purchase_price,
            self.transfer_fees,
            self.renovation_cost,
            self.selling_price,
        )
    }
}

fn validate_gallery(images: &[PropertyImage]) -> Result<(), ValidationError> {
    validate_images(images).map_err(|msg| {
        let mut err = ValidationError::new("images");
        err.message = Some(msg.into());
        err
    })
}

/// DTO for creating a property.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub area: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub size: f64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub bedrooms: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub bathrooms: i32,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub golden_visa: bool,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub purchase_price: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub transfer_fees: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub renovation_cost: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub selling_price: f64,
    #[validate(custom(function = "validate_gallery"))]
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1800, max = 2200))]
    pub completion_year: Option<i32>,
}

/// DTO for updating a property. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProperty {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub area: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub size: Option<f64>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    pub status: Option<PropertyStatus>,
    pub golden_visa: Option<bool>,
    #[validate(range(min = 0.0))]
    pub purchase_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub transfer_fees: Option<f64>,
    #[validate(range(min = 0.0))]
    pub renovation_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub selling_price: Option<f64>,
    #[validate(custom(function = "validate_gallery"))]
    pub images: Option<Vec<PropertyImage>>,
    pub description: Option<String>,
    #[validate(range(min = 1800, max = 2200))]
    pub completion_year: Option<i32>,
}
