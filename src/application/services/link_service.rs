//! Short link creation and resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::application::services::validation_service::{SubmissionValidator, ValidatedSubmission};
use crate::domain::clock::Clock;
use crate::domain::entities::{LinkSettings, LinkSubmission, NewLinkSettings, NewShortLink, Session, ShortLink};
use crate::domain::repositories::{SessionRepository, ShortLinkRepository};
use crate::error::AppError;
use crate::utils::short_code::ShortCodeCodec;
use crate::utils::url_pattern::extract_domain;

/// Service for creating and resolving short links.
///
/// Creation validates the submission, links the creator's session when one
/// can be found, and stores the link with its settings in a single
/// repository call so the generated code and the settings row become
/// visible together.
pub struct LinkService<L: ShortLinkRepository, S: SessionRepository, C: Clock> {
    link_repository: Arc<L>,
    session_repository: Arc<S>,
    validator: SubmissionValidator<L, C>,
    codec: ShortCodeCodec,
}

impl<L: ShortLinkRepository, S: SessionRepository, C: Clock> LinkService<L, S, C> {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        session_repository: Arc<S>,
        clock: Arc<C>,
        codec: ShortCodeCodec,
    ) -> Self {
        Self {
            validator: SubmissionValidator::new(link_repository.clone(), clock, codec),
            link_repository,
            session_repository,
            codec,
        }
    }

    pub fn codec(&self) -> ShortCodeCodec {
        self.codec
    }

    /// Creates a short link from a submission.
    ///
    /// # Session Linkage
    ///
    /// When the submission carries a session token that matches a stored
    /// session, the link and its settings record the session id, timezone and
    /// location. An unknown token is not an error; the link is created
    /// without a session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any submission rule fails, or if
    /// the alias was taken between validation and insert. Nothing is written
    /// in that case.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_short_link(&self, submission: LinkSubmission) -> Result<ShortLink, AppError> {
        let validated = self.validator.validate(&submission).await?;

        let session = match validated.session_token.as_deref() {
            Some(token) => {
                let session = self.session_repository.find_by_token(token).await?;
                if session.is_none() {
                    debug!("No session for token, creating link without session");
                }
                session
            }
            None => None,
        };

        let (new_link, settings) = build_records(validated, session.as_ref());

        let link = self
            .link_repository
            .create(new_link, settings, self.codec)
            .await?;

        info!(
            id = link.id,
            code = %link.short_code,
            alias = link.alias.as_deref().unwrap_or(""),
            "Short link created"
        );

        Ok(link)
    }

    /// Decodes a short code into the identifier of the link it names.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Codec`] if the code contains characters outside
    /// the alphabet, is not in canonical form, or decodes below the padding
    /// offset. Returns [`AppError::NotFound`] if the identifier is outside the
    /// range the store can assign.
    pub fn resolve_short_link(&self, code: &str) -> Result<i64, AppError> {
        let id = self.codec.identifier(code)?;

        i64::try_from(id).map_err(|_| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })
    }

    /// Looks up a link by its public code.
    ///
    /// Aliases take precedence; otherwise the code is decoded and looked up
    /// by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches.
    /// Returns [`AppError::Codec`] if the code is neither a known alias nor a
    /// well-formed short code.
    pub async fn find_by_code(&self, code: &str) -> Result<ShortLink, AppError> {
        if let Some(link) = self.link_repository.find_by_alias(code).await? {
            return Ok(link);
        }

        let id = self.resolve_short_link(code)?;

        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Loads the settings stored with a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link has no settings.
    pub async fn settings_for(&self, link_id: i64) -> Result<LinkSettings, AppError> {
        self.link_repository
            .find_settings(link_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Link settings not found", json!({ "link_id": link_id }))
            })
    }
}

/// Splits a validated submission into the link and settings rows.
fn build_records(
    validated: ValidatedSubmission,
    session: Option<&Session>,
) -> (NewShortLink, NewLinkSettings) {
    let session_id = session.map(|s| s.id);

    let new_link = NewShortLink {
        domain: extract_domain(&validated.original_url),
        original_url: validated.original_url,
        alias: validated.alias,
        owner_session_id: session_id,
    };

    let settings = NewLinkSettings {
        session_id,
        timezone: session.and_then(|s| s.timezone.clone()),
        user_name: validated.user_name,
        user_email: validated.user_email,
        user_mobile: validated.user_mobile,
        user_country: session.and_then(|s| s.country_code.clone()),
        user_state: session.and_then(|s| s.state.clone()),
        user_city: session.and_then(|s| s.city.clone()),
        show_ads: validated.show_ads,
        record_stats: validated.record_stats,
        expire_date: validated.expire_date,
        expire_time: validated.expire_time,
    };

    (new_link, settings)
}
