//! Submission validation.

use std::sync::{Arc, LazyLock};

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;
use validator::ValidateEmail;

use crate::domain::clock::Clock;
use crate::domain::entities::LinkSubmission;
use crate::domain::entities::submission::non_empty;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::{AppError, ValidationErrors, fields, messages};
use crate::utils::short_code::ShortCodeCodec;
use crate::utils::time_normalizer::{
    expire_date_to_utc, expire_time_to_utc, parse_timezone, truncate_to_minute,
};
use crate::utils::url_pattern::is_url_shaped;

/// Optional country prefix, then a 3-3-2-2 digit grouping with optional separators.
static MOBILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+7|7|8)?[\s-]?\(?([0-9]{3})\)?[\s-]?([0-9]{3})[\s-]?([0-9]{2})[\s-]?([0-9]{2}).*$")
        .expect("mobile pattern is valid")
});

/// A submission that passed every rule.
///
/// Expiration values are already normalized to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub original_url: String,
    pub alias: Option<String>,
    pub expire_date: Option<NaiveDate>,
    pub expire_time: Option<NaiveTime>,
    pub session_token: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_mobile: Option<String>,
    pub show_ads: bool,
    pub record_stats: bool,
}

/// Returns true if the alias contains whitespace or punctuation other than
/// `_` and `-`.
pub fn has_disallowed_alias_character(alias: &str) -> bool {
    alias
        .chars()
        .any(|c| c.is_whitespace() || (c.is_ascii_punctuation() && c != '_' && c != '-'))
}

/// Checks link submissions.
///
/// Every rule runs and all failures are collected into one
/// [`ValidationErrors`] map; a later rule may replace an earlier message for
/// the same field.
///
/// # Rules
///
/// - `original_url` is required and must look like a URL
/// - `special_url` (alias) must not contain special characters, must not
///   match another link's alias or original URL, and must not itself be a
///   valid short code, so a generated code always resolves to its own link
/// - `expire_date` must not be before today (UTC) once converted from the
///   submitter's timezone
/// - `expire_time` must not be before the current UTC time of day once
///   converted on a fixed reference date
/// - `timezone`, `user_email` and `user_mobile` must be well-formed when present
pub struct SubmissionValidator<L: ShortLinkRepository, C: Clock> {
    link_repository: Arc<L>,
    clock: Arc<C>,
    codec: ShortCodeCodec,
}

impl<L: ShortLinkRepository, C: Clock> SubmissionValidator<L, C> {
    pub fn new(link_repository: Arc<L>, clock: Arc<C>, codec: ShortCodeCodec) -> Self {
        Self {
            link_repository,
            clock,
            codec,
        }
    }

    /// Validates a submission.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with every violated rule.
    /// Returns [`AppError::Internal`] if the alias collision lookup fails.
    pub async fn validate(
        &self,
        submission: &LinkSubmission,
    ) -> Result<ValidatedSubmission, AppError> {
        let mut errors = ValidationErrors::new();

        let original_url = non_empty(submission.original_url.as_deref());
        match original_url {
            None => errors.insert(fields::ORIGINAL_URL, messages::URL_REQUIRED),
            Some(url) if !is_url_shaped(url) => {
                errors.insert(fields::ORIGINAL_URL, messages::URL_INVALID)
            }
            Some(_) => {}
        }

        let alias = submission.alias();
        if let Some(alias) = alias {
            if has_disallowed_alias_character(alias) {
                errors.insert(fields::ALIAS, messages::ALIAS_SPECIAL_CHARACTERS);
            }

            let taken = self.link_repository.count_alias_collisions(alias).await? > 0;
            if taken || self.codec.identifier(alias).is_ok() {
                errors.insert(fields::ALIAS, messages::ALIAS_UNAVAILABLE);
            }
        }

        let tz = match parse_timezone(submission.timezone.as_deref()) {
            Ok(tz) => tz,
            Err(e) => {
                debug!("Rejecting submission timezone: {}", e);
                errors.insert(fields::TIMEZONE, messages::TIMEZONE_INVALID);
                Tz::UTC
            }
        };

        let expire_date = self.check_expire_date(submission, tz, &mut errors);
        let expire_time = self.check_expire_time(submission, tz, &mut errors);

        if let Some(email) = non_empty(submission.user_email.as_deref())
            && !email.validate_email()
        {
            errors.insert(fields::USER_EMAIL, messages::EMAIL_INVALID);
        }

        if let Some(mobile) = non_empty(submission.user_mobile.as_deref())
            && !MOBILE_REGEX.is_match(mobile)
        {
            errors.insert(fields::USER_MOBILE, messages::MOBILE_INVALID);
        }

        match original_url {
            Some(url) if errors.is_valid() => Ok(ValidatedSubmission {
                original_url: url.to_string(),
                alias: alias.map(str::to_string),
                expire_date,
                expire_time,
                session_token: non_empty(submission.session_token.as_deref()).map(str::to_string),
                user_name: submission.user_name.clone(),
                user_email: submission.user_email.clone(),
                user_mobile: submission.user_mobile.clone(),
                show_ads: submission.show_ads,
                record_stats: submission.record_stats,
            }),
            _ => {
                debug!("Submission rejected: {}", errors);
                Err(AppError::Validation(errors))
            }
        }
    }

    fn check_expire_date(
        &self,
        submission: &LinkSubmission,
        tz: Tz,
        errors: &mut ValidationErrors,
    ) -> Option<NaiveDate> {
        let raw = non_empty(submission.expire_date.as_deref())?;
        let today = self.clock.now().date_naive();

        match expire_date_to_utc(raw, tz) {
            Ok(date) if date >= today => Some(date),
            Ok(_) => {
                errors.insert(fields::EXPIRE_DATE, messages::DATE_INVALID);
                None
            }
            Err(e) => {
                debug!("Unparseable expiration date: {}", e);
                errors.insert(fields::EXPIRE_DATE, messages::DATE_INVALID);
                None
            }
        }
    }

    fn check_expire_time(
        &self,
        submission: &LinkSubmission,
        tz: Tz,
        errors: &mut ValidationErrors,
    ) -> Option<NaiveTime> {
        let raw = non_empty(submission.expire_time.as_deref())?;
        let now = truncate_to_minute(self.clock.now().time());

        match expire_time_to_utc(raw, tz) {
            Ok(time) if time >= now => Some(time),
            Ok(_) => {
                errors.insert(fields::EXPIRE_TIME, messages::TIME_INVALID);
                None
            }
            Err(e) => {
                debug!("Unparseable expiration time: {}", e);
                errors.insert(fields::EXPIRE_TIME, messages::TIME_INVALID);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::repositories::MockShortLinkRepository;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
        ))
    }

    fn validator(repo: MockShortLinkRepository) -> SubmissionValidator<MockShortLinkRepository, FixedClock> {
        SubmissionValidator::new(Arc::new(repo), clock(), ShortCodeCodec::default())
    }

    fn no_collisions() -> MockShortLinkRepository {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions().returning(|_| Ok(0));
        repo
    }

    async fn errors_for(
        repo: MockShortLinkRepository,
        submission: LinkSubmission,
    ) -> ValidationErrors {
        match validator(repo).validate(&submission).await {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_valid_submission() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions().times(0);

        let result = validator(repo)
            .validate(&LinkSubmission::new("http://example.com"))
            .await;

        let validated = result.unwrap();
        assert_eq!(validated.original_url, "http://example.com");
        assert!(validated.alias.is_none());
        assert!(validated.expire_date.is_none());
    }

    #[tokio::test]
    async fn test_missing_url() {
        let errors = errors_for(no_collisions(), LinkSubmission::default()).await;
        assert_eq!(errors.get(fields::ORIGINAL_URL), Some(messages::URL_REQUIRED));
    }

    #[tokio::test]
    async fn test_empty_url() {
        let errors = errors_for(no_collisions(), LinkSubmission::new("")).await;

        assert!(!errors.is_valid());
        assert_eq!(errors.get(fields::ORIGINAL_URL), Some(messages::URL_REQUIRED));
    }

    #[tokio::test]
    async fn test_malformed_url() {
        let errors = errors_for(no_collisions(), LinkSubmission::new("not a url")).await;
        assert_eq!(errors.get(fields::ORIGINAL_URL), Some(messages::URL_INVALID));
    }

    #[tokio::test]
    async fn test_alias_with_space() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com").with_alias("a b"),
        )
        .await;

        assert_eq!(
            errors.get(fields::ALIAS),
            Some(messages::ALIAS_SPECIAL_CHARACTERS)
        );
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_alias_allows_underscore_and_hyphen() {
        let result = validator(no_collisions())
            .validate(&LinkSubmission::new("http://example.com").with_alias("my_promo-2026"))
            .await;

        assert_eq!(result.unwrap().alias.as_deref(), Some("my_promo-2026"));
    }

    #[test]
    fn test_disallowed_alias_characters() {
        for alias in ["a b", "a.b", "a/b", "a?b", "a#b", "a%b", "a\tb", "a!b", "a@b"] {
            assert!(has_disallowed_alias_character(alias), "{alias:?}");
        }
        for alias in ["promo", "Promo_2026", "my-link", "привет"] {
            assert!(!has_disallowed_alias_character(alias), "{alias:?}");
        }
    }

    #[tokio::test]
    async fn test_alias_collision() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions()
            .withf(|alias| alias == "summer-sale")
            .times(1)
            .returning(|_| Ok(1));

        let errors = errors_for(
            repo,
            LinkSubmission::new("http://example.com").with_alias("summer-sale"),
        )
        .await;

        assert_eq!(errors.get(fields::ALIAS), Some(messages::ALIAS_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_alias_collision_overrides_special_character_message() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions().returning(|_| Ok(1));

        let errors = errors_for(
            repo,
            LinkSubmission::new("http://example.com").with_alias("http://taken.com"),
        )
        .await;

        assert_eq!(errors.get(fields::ALIAS), Some(messages::ALIAS_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_alias_shaped_like_short_code_is_unavailable() {
        for alias in ["bN", "promo", "Z9"] {
            let errors = errors_for(
                no_collisions(),
                LinkSubmission::new("http://example.com").with_alias(alias),
            )
            .await;

            assert_eq!(
                errors.get(fields::ALIAS),
                Some(messages::ALIAS_UNAVAILABLE),
                "{alias:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_alias_outside_code_space_is_accepted() {
        // Below the padding offset, a leading zero digit, or a separator.
        for alias in ["b", "april", "summer-sale", "promo_2026"] {
            let result = validator(no_collisions())
                .validate(&LinkSubmission::new("http://example.com").with_alias(alias))
                .await;

            assert_eq!(result.unwrap().alias.as_deref(), Some(alias));
        }
    }

    #[tokio::test]
    async fn test_empty_alias_skips_collision_lookup() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions().times(0);

        let result = validator(repo)
            .validate(&LinkSubmission::new("http://example.com").with_alias(""))
            .await;

        assert!(result.unwrap().alias.is_none());
    }

    #[tokio::test]
    async fn test_expire_date_yesterday() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com")
                .with_expiration(Some("2026-10-18".to_string()), None),
        )
        .await;

        assert_eq!(errors.get(fields::EXPIRE_DATE), Some(messages::DATE_INVALID));
    }

    #[tokio::test]
    async fn test_expire_date_today_and_tomorrow() {
        for raw in ["2026-10-19", "2026-10-20"] {
            let result = validator(no_collisions())
                .validate(
                    &LinkSubmission::new("http://example.com")
                        .with_expiration(Some(raw.to_string()), None),
                )
                .await;

            assert!(result.is_ok(), "{raw} should be accepted");
        }
    }

    #[tokio::test]
    async fn test_expire_date_normalized_with_timezone() {
        // Midnight on the 19th in Tokyo is the 18th in UTC.
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com")
                .with_timezone("Asia/Tokyo")
                .with_expiration(Some("2026-10-19".to_string()), None),
        )
        .await;
        assert!(errors.contains(fields::EXPIRE_DATE));

        let validated = validator(no_collisions())
            .validate(
                &LinkSubmission::new("http://example.com")
                    .with_timezone("Asia/Tokyo")
                    .with_expiration(Some("2026-10-21".to_string()), None),
            )
            .await
            .unwrap();
        assert_eq!(validated.expire_date, NaiveDate::from_ymd_opt(2026, 10, 20));
    }

    #[tokio::test]
    async fn test_expire_date_unparseable() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com")
                .with_expiration(Some("next week".to_string()), None),
        )
        .await;

        assert_eq!(errors.get(fields::EXPIRE_DATE), Some(messages::DATE_INVALID));
    }

    #[tokio::test]
    async fn test_expire_time_before_now() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com")
                .with_expiration(None, Some("11:59".to_string())),
        )
        .await;

        assert_eq!(errors.get(fields::EXPIRE_TIME), Some(messages::TIME_INVALID));
    }

    #[tokio::test]
    async fn test_expire_time_current_minute_is_accepted() {
        let validated = validator(no_collisions())
            .validate(
                &LinkSubmission::new("http://example.com")
                    .with_expiration(None, Some("12:00".to_string())),
            )
            .await
            .unwrap();

        assert_eq!(validated.expire_time, NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[tokio::test]
    async fn test_expire_time_compares_minutes_when_clock_has_seconds() {
        let late_in_minute = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 59).unwrap()
            + chrono::TimeDelta::milliseconds(500);
        let validator = SubmissionValidator::new(
            Arc::new(no_collisions()),
            Arc::new(FixedClock(late_in_minute)),
            ShortCodeCodec::default(),
        );

        let validated = validator
            .validate(
                &LinkSubmission::new("http://example.com")
                    .with_expiration(None, Some("12:00".to_string())),
            )
            .await
            .unwrap();
        assert_eq!(validated.expire_time, NaiveTime::from_hms_opt(12, 0, 0));

        let err = validator
            .validate(
                &LinkSubmission::new("http://example.com")
                    .with_expiration(None, Some("11:59".to_string())),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get(fields::EXPIRE_TIME),
            Some(messages::TIME_INVALID)
        );
    }

    #[tokio::test]
    async fn test_expire_time_normalized_with_timezone() {
        // 13:00 in Moscow on the reference date is 10:00 UTC.
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com")
                .with_timezone("Europe/Moscow")
                .with_expiration(None, Some("13:00".to_string())),
        )
        .await;

        assert!(errors.contains(fields::EXPIRE_TIME));
    }

    #[tokio::test]
    async fn test_unknown_timezone() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("http://example.com").with_timezone("Nowhere/Special"),
        )
        .await;

        assert_eq!(errors.get(fields::TIMEZONE), Some(messages::TIMEZONE_INVALID));
    }

    #[tokio::test]
    async fn test_invalid_email() {
        let mut submission = LinkSubmission::new("http://example.com");
        submission.user_email = Some("not-an-email".to_string());

        let errors = errors_for(no_collisions(), submission).await;
        assert_eq!(errors.get(fields::USER_EMAIL), Some(messages::EMAIL_INVALID));
    }

    #[tokio::test]
    async fn test_contact_details_accepted() {
        let mut submission = LinkSubmission::new("http://example.com");
        submission.user_name = Some("Ann".to_string());
        submission.user_email = Some("ann@example.com".to_string());
        submission.user_mobile = Some("+7 912 345-67-89".to_string());

        let validated = validator(no_collisions()).validate(&submission).await.unwrap();

        assert_eq!(validated.user_email.as_deref(), Some("ann@example.com"));
        assert_eq!(validated.user_mobile.as_deref(), Some("+7 912 345-67-89"));
    }

    #[tokio::test]
    async fn test_invalid_mobile() {
        let mut submission = LinkSubmission::new("http://example.com");
        submission.user_mobile = Some("12345".to_string());

        let errors = errors_for(no_collisions(), submission).await;
        assert_eq!(errors.get(fields::USER_MOBILE), Some(messages::MOBILE_INVALID));
    }

    #[tokio::test]
    async fn test_errors_are_collected() {
        let errors = errors_for(
            no_collisions(),
            LinkSubmission::new("")
                .with_alias("bad alias")
                .with_expiration(Some("2020-01-01".to_string()), Some("00:00".to_string())),
        )
        .await;

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "expire_date": "Invalid date.",
                "expire_time": "Invalid time.",
                "original_url": "URL is Required.",
                "special_url": "URL Alias should not contain special characters except underscore (_) or hyphen (-)."
            })
        );
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_count_alias_collisions()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = validator(repo)
            .validate(&LinkSubmission::new("http://example.com").with_alias("promo"))
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
