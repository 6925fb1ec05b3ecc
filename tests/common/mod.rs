#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use shortlink::application::services::LinkService;
use shortlink::domain::clock::FixedClock;
use shortlink::domain::entities::Session;
use shortlink::infrastructure::persistence::{MemorySessionRepository, MemoryShortLinkRepository};
use shortlink::utils::short_code::ShortCodeCodec;

pub type MemoryLinkService =
    LinkService<MemoryShortLinkRepository, MemorySessionRepository, FixedClock>;

/// 2026-10-19 12:00:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub struct TestContext {
    pub service: MemoryLinkService,
    pub links: MemoryShortLinkRepository,
    pub sessions: MemorySessionRepository,
}

pub fn create_test_context() -> TestContext {
    let links = MemoryShortLinkRepository::new();
    let sessions = MemorySessionRepository::new();

    let service = LinkService::new(
        Arc::new(links.clone()),
        Arc::new(sessions.clone()),
        Arc::new(FixedClock(test_now())),
        ShortCodeCodec::default(),
    );

    TestContext {
        service,
        links,
        sessions,
    }
}

pub async fn create_test_session(sessions: &MemorySessionRepository, id: i64, token: &str) {
    sessions
        .insert(Session {
            id,
            token: token.to_string(),
            timezone: Some("Europe/Berlin".to_string()),
            country_code: Some("DE".to_string()),
            state: Some("Berlin".to_string()),
            city: Some("Berlin".to_string()),
        })
        .await;
}
