//! Visitor session, owned by the session-tracking collaborator.

/// A visitor session with its geolocation snapshot.
///
/// Read-only to this crate; used to link new short links to their creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub token: String,
    pub timezone: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}
