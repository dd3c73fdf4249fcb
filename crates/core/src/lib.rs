//! Pure domain logic for the Rigel Homes listing backend.
//!
//! Nothing in this crate performs I/O. Role tiers, the visibility policy,
//! listing filters, finance helpers and formatting live here so the
//! database, access and API layers share one definition of each rule.

pub mod error;
pub mod filter;
pub mod finance;
pub mod formatters;
pub mod images;
pub mod listing;
pub mod roles;
pub mod stats;
pub mod types;
pub mod visibility;
