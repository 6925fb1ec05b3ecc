//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ShortLinkRepository`] - Link creation, lookup and alias collision checks
//! - [`SessionRepository`] - Session lookup by token

pub mod session_repository;
pub mod short_link_repository;

pub use session_repository::SessionRepository;
pub use short_link_repository::ShortLinkRepository;

#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
