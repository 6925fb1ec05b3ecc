//! Raw link submission as received from a caller.

use serde::Deserialize;

/// A request to shorten a URL, before validation.
///
/// Field names follow the submission form: the alias is `special_url`, the
/// session token is `session_id`, and the display preferences are
/// `display_ads` and `analytic_report`. Every field is optional at this
/// stage; [`SubmissionValidator`](crate::application::services::SubmissionValidator)
/// decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkSubmission {
    pub original_url: Option<String>,
    #[serde(rename = "special_url")]
    pub alias: Option<String>,
    pub expire_date: Option<String>,
    pub expire_time: Option<String>,
    pub timezone: Option<String>,
    #[serde(rename = "session_id")]
    pub session_token: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_mobile: Option<String>,
    #[serde(rename = "display_ads")]
    pub show_ads: bool,
    #[serde(rename = "analytic_report")]
    pub record_stats: bool,
}

impl LinkSubmission {
    /// Starts a submission for the given URL with every option unset.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: Some(original_url.into()),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_expiration(mut self, date: Option<String>, time: Option<String>) -> Self {
        self.expire_date = date;
        self.expire_time = time;
        self
    }

    /// The alias, treating an empty string as absent.
    pub fn alias(&self) -> Option<&str> {
        non_empty(self.alias.as_deref())
    }
}

/// Returns `None` for missing or empty values.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_form_field_names() {
        let submission: LinkSubmission = serde_json::from_value(json!({
            "original_url": "https://example.com",
            "special_url": "promo",
            "session_id": "abc",
            "display_ads": true,
            "analytic_report": true,
            "expire_date": "2030-01-01"
        }))
        .unwrap();

        assert_eq!(submission.original_url.as_deref(), Some("https://example.com"));
        assert_eq!(submission.alias(), Some("promo"));
        assert_eq!(submission.session_token.as_deref(), Some("abc"));
        assert!(submission.show_ads);
        assert!(submission.record_stats);
        assert_eq!(submission.expire_date.as_deref(), Some("2030-01-01"));
        assert!(submission.expire_time.is_none());
    }

    #[test]
    fn test_deserialize_empty_object() {
        let submission: LinkSubmission = serde_json::from_value(json!({})).unwrap();
        assert_eq!(submission, LinkSubmission::default());
    }

    #[test]
    fn test_empty_alias_is_absent() {
        let submission = LinkSubmission::new("https://example.com").with_alias("");
        assert_eq!(submission.alias(), None);
    }

    #[test]
    fn test_builder() {
        let submission = LinkSubmission::new("https://example.com")
            .with_alias("promo")
            .with_session("token")
            .with_timezone("Asia/Kolkata")
            .with_expiration(Some("2030-01-01".to_string()), None);

        assert_eq!(submission.alias(), Some("promo"));
        assert_eq!(submission.session_token.as_deref(), Some("token"));
        assert_eq!(submission.timezone.as_deref(), Some("Asia/Kolkata"));
        assert_eq!(submission.expire_date.as_deref(), Some("2030-01-01"));
    }
}
