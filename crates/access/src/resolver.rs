//! One-shot visibility resolution, one call per HTTP request.
//!
//! Each call classifies, reads grants and lists properties afresh, so a
//! response can never mix one viewer's identity with another's grants.

use std::sync::Arc;

use rigel_core::error::CoreError;
use rigel_core::filter::{distinct_areas, ListingFilter};
use rigel_core::stats::ListingStats;
use rigel_core::types::DbId;
use rigel_core::visibility::{resolve, resolve_filtered, ResolvedListing};
use rigel_db::models::property::Property;
use serde::Serialize;

use crate::grants::GrantAdapter;
use crate::identity::{Identity, IdentityClassifier};
use crate::session::Session;
use crate::store::PropertyStore;

/// The annotated listings page for one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub identity: Identity,
    /// Filtered, annotated, accessible first.
    pub listings: Vec<ResolvedListing<Property>>,
    /// Computed over the filtered listings.
    pub stats: ListingStats,
    /// Distinct areas across all listings, for the area filter.
    pub areas: Vec<String>,
}

pub struct AccessResolver {
    classifier: IdentityClassifier,
    grants: GrantAdapter,
    properties: Arc<dyn PropertyStore>,
}

impl AccessResolver {
    pub fn new(
        classifier: IdentityClassifier,
        grants: GrantAdapter,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        Self {
            classifier,
            grants,
            properties,
        }
    }

    pub async fn identify(&self, session: Option<&Session>) -> Identity {
        self.classifier.classify(session).await
    }

    /// Ensure a profile exists for `session`, then classify it.
    pub async fn sign_in(&self, session: &Session) -> Identity {
        self.classifier.sign_in(session).await
    }

    pub async fn listings(
        &self,
        session: Option<&Session>,
        filter: &ListingFilter,
    ) -> Result<ListingPage, CoreError> {
        let identity = self.classifier.classify(session).await;
        let (grants, properties) = tokio::join!(
            self.grants.grants_for(&identity),
            self.properties.list_properties()
        );
        let properties = properties?;

        let areas = distinct_areas(&properties);
        let listings = resolve_filtered(identity.resolved_tier(), &grants, properties, filter);
        let stats = ListingStats::compute(listings.iter().map(|r| &r.property));

        tracing::debug!(
            tier = %identity.tier,
            total = listings.len(),
            accessible = listings.iter().filter(|r| r.is_accessible).count(),
            "Resolved listings"
        );

        Ok(ListingPage {
            identity,
            listings,
            stats,
            areas,
        })
    }

    /// Resolve a single property.
    pub async fn listing(
        &self,
        session: Option<&Session>,
        id: DbId,
    ) -> Result<ResolvedListing<Property>, CoreError> {
        let property = self
            .properties
            .find_property(id)
            .await?
            .ok_or_else(|| CoreError::not_found("property", id))?;

        let identity = self.classifier.classify(session).await;
        let grants = self.grants.grants_for(&identity).await;

        resolve(identity.resolved_tier(), &grants, vec![property])
            .pop()
            .ok_or_else(|| CoreError::Internal("resolution dropped a listing".into()))
    }
}
