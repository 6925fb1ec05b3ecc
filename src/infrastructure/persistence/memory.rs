//! In-memory repositories, used by tests and local runs without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{LinkSettings, NewLinkSettings, NewShortLink, Session, ShortLink};
use crate::domain::repositories::{SessionRepository, ShortLinkRepository};
use crate::error::{AppError, ValidationErrors};
use crate::utils::short_code::{CodecError, ShortCodeCodec, partition};

/// Links and settings guarded by a single lock.
#[derive(Debug)]
struct Store {
    next_id: i64,
    links: BTreeMap<i64, ShortLink>,
    settings: HashMap<i64, LinkSettings>,
}

impl Store {
    /// Aliased links that make `alias` unavailable, by alias or original URL.
    fn alias_collisions<'a>(&'a self, alias: &'a str) -> impl Iterator<Item = &'a ShortLink> + 'a {
        self.links.values().filter(move |link| {
            link.alias.is_some()
                && (link.alias.as_deref() == Some(alias) || link.original_url == alias)
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            links: BTreeMap::new(),
            settings: HashMap::new(),
        }
    }
}

/// In-memory short link store.
///
/// Identifiers start at 1 and are only consumed by successful creates. The
/// whole create runs under one lock, so a failed create leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct MemoryShortLinkRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryShortLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.store.lock().await.links.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ShortLinkRepository for MemoryShortLinkRepository {
    async fn count_alias_collisions(&self, alias: &str) -> Result<i64, AppError> {
        let count = self.store.lock().await.alias_collisions(alias).count();
        Ok(count as i64)
    }

    async fn create(
        &self,
        new_link: NewShortLink,
        settings: NewLinkSettings,
        codec: ShortCodeCodec,
    ) -> Result<ShortLink, AppError> {
        let mut store = self.store.lock().await;

        if let Some(alias) = new_link.alias.as_deref()
            && store.alias_collisions(alias).next().is_some()
        {
            return Err(ValidationErrors::alias_unavailable().into());
        }

        let id = store.next_id;
        let short_code = codec.encode(u64::try_from(id).map_err(|_| CodecError::Overflow)?)?;
        let (code_length, first_code_char) = partition(&short_code).ok_or(CodecError::Empty)?;

        let link = ShortLink {
            id,
            original_url: new_link.original_url,
            domain: new_link.domain,
            alias: new_link.alias,
            short_code,
            code_length,
            first_code_char,
            owner_session_id: new_link.owner_session_id,
            created_at: Utc::now(),
        };

        store.next_id += 1;
        store.links.insert(id, link.clone());
        store.settings.insert(id, settings.into_settings(id));

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self.store.lock().await.links.get(&id).cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let store = self.store.lock().await;

        Ok(store
            .links
            .values()
            .find(|link| link.alias.as_deref() == Some(alias))
            .cloned())
    }

    async fn find_settings(&self, link_id: i64) -> Result<Option<LinkSettings>, AppError> {
        Ok(self.store.lock().await.settings.get(&link_id).cloned())
    }
}

/// In-memory session store keyed by token.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session, replacing any session with the same token.
    pub async fn insert(&self, session: Session) {
        self.sessions
            .lock()
            .await
            .insert(session.token.clone(), session);
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.lock().await.get(token).cloned())
    }
}
