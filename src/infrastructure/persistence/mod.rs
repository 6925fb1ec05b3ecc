//! Repository implementations.
//!
//! PostgreSQL repositories use SQLx with bound parameters. The in-memory
//! repositories back tests and local runs without a database.
//!
//! # Repositories
//!
//! - [`PgShortLinkRepository`] - Link storage, code assignment and settings
//! - [`PgSessionRepository`] - Session lookup
//! - [`MemoryShortLinkRepository`] / [`MemorySessionRepository`] - In-process stores

pub mod memory;
pub mod pg_session_repository;
pub mod pg_short_link_repository;

pub use memory::{MemorySessionRepository, MemoryShortLinkRepository};
pub use pg_session_repository::PgSessionRepository;
pub use pg_short_link_repository::PgShortLinkRepository;
