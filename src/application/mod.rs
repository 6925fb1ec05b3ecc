//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the [`Clock`](crate::domain::clock::Clock)
//! so they can run against PostgreSQL, the in-memory store or mocks.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
//! - [`services::validation_service::SubmissionValidator`] - Submission rule checks

pub mod services;
