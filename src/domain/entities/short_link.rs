//! Short link entity: the canonical record behind a short code.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored short link.
///
/// `short_code` is always the codec encoding of `id`, computed once inside
/// the creating transaction. `code_length` and `first_code_char` duplicate
/// the shape of the code so links can be partitioned without decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub domain: Option<String>,
    #[serde(rename = "special_url")]
    pub alias: Option<String>,
    pub short_code: String,
    pub code_length: i32,
    pub first_code_char: char,
    pub owner_session_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// The public code for this link: the alias when one was chosen,
    /// otherwise the generated short code.
    pub fn public_code(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.short_code)
    }

    /// Builds the full short URL on the given base (e.g. `https://s.example.com`).
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.public_code())
    }
}

/// Input data for inserting a short link.
///
/// The code columns are not part of the input: they depend on the identifier
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub original_url: String,
    pub domain: Option<String>,
    pub alias: Option<String>,
    pub owner_session_id: Option<i64>,
}
