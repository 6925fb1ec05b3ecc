//! Repository trait for short link storage.

use crate::domain::entities::{LinkSettings, NewLinkSettings, NewShortLink, ShortLink};
use crate::error::AppError;
use crate::utils::short_code::ShortCodeCodec;
use async_trait::async_trait;

/// Repository interface for short links and their settings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryShortLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Counts links that would collide with `alias`.
    ///
    /// A link collides when its alias equals `alias`, or when its original
    /// URL equals `alias`. Only links that carry an alias are counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_alias_collisions(&self, alias: &str) -> Result<i64, AppError>;

    /// Creates a link and its settings as one atomic operation.
    ///
    /// The link is inserted to obtain its identifier, its short code is
    /// computed with `codec` and written back, and the settings row is
    /// inserted. Either all of it becomes visible or none of it does.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the alias is already taken.
    /// Returns [`AppError::Codec`] if the identifier cannot be encoded.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(
        &self,
        new_link: NewShortLink,
        settings: NewLinkSettings,
        codec: ShortCodeCodec,
    ) -> Result<ShortLink, AppError>;

    /// Finds a link by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError>;

    /// Loads the settings stored with a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_settings(&self, link_id: i64) -> Result<Option<LinkSettings>, AppError>;
}
