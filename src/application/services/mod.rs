//! Business logic services for the application layer.

pub mod link_service;
pub mod validation_service;

pub use link_service::LinkService;
pub use validation_service::{SubmissionValidator, ValidatedSubmission};
