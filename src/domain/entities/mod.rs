//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A stored link and its short code
//! - [`LinkSettings`] - Per-link preferences, contact details and expiration
//! - [`Session`] - A visitor session (read-only, owned elsewhere)
//! - [`LinkSubmission`] - Unvalidated input for creating a link
//!
//! # Design Pattern
//!
//! Stored entities have a separate struct for creation:
//! - `NewShortLink`, `NewLinkSettings` - For inserting new records

pub mod link_settings;
pub mod session;
pub mod short_link;
pub mod submission;

pub use link_settings::{LinkSettings, NewLinkSettings};
pub use session::Session;
pub use short_link::{NewShortLink, ShortLink};
pub use submission::LinkSubmission;
