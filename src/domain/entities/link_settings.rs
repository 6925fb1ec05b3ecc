//! Per-link settings stored one-to-one with a short link.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Settings attached to a short link at creation time.
///
/// Location fields are a snapshot of the creating session. Expiration values
/// are stored in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSettings {
    pub link_id: i64,
    pub session_id: Option<i64>,
    pub timezone: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_mobile: Option<String>,
    pub user_country: Option<String>,
    pub user_state: Option<String>,
    pub user_city: Option<String>,
    pub show_ads: bool,
    pub record_stats: bool,
    pub expire_date: Option<NaiveDate>,
    pub expire_time: Option<NaiveTime>,
}

/// Input data for the settings row written in the same transaction as the link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLinkSettings {
    pub session_id: Option<i64>,
    pub timezone: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_mobile: Option<String>,
    pub user_country: Option<String>,
    pub user_state: Option<String>,
    pub user_city: Option<String>,
    pub show_ads: bool,
    pub record_stats: bool,
    pub expire_date: Option<NaiveDate>,
    pub expire_time: Option<NaiveTime>,
}

impl NewLinkSettings {
    /// Attaches the settings to a stored link.
    pub fn into_settings(self, link_id: i64) -> LinkSettings {
        LinkSettings {
            link_id,
            session_id: self.session_id,
            timezone: self.timezone,
            user_name: self.user_name,
            user_email: self.user_email,
            user_mobile: self.user_mobile,
            user_country: self.user_country,
            user_state: self.user_state,
            user_city: self.user_city,
            show_ads: self.show_ads,
            record_stats: self.record_stats,
            expire_date: self.expire_date,
            expire_time: self.expire_time,
        }
    }
}
