//! Utility functions for short codes, URL matching and time handling.
//!
//! - [`short_code`] - Base-62 short code codec
//! - [`url_pattern`] - URL shape matching and domain extraction
//! - [`time_normalizer`] - Timezone-aware expiration normalization
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod short_code;
pub mod time_normalizer;
pub mod url_pattern;
