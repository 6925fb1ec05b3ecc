//! Domain layer containing business entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Source of the current time
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod clock;
pub mod entities;
pub mod repositories;
