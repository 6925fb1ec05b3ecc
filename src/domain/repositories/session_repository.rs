//! Repository trait for visitor session lookups.

use crate::domain::entities::Session;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to visitor sessions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemorySessionRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))` if found
    /// - `Ok(None)` if no session has this token
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, AppError>;
}
