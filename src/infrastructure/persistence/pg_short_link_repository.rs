//! PostgreSQL implementation of the short link repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{LinkSettings, NewLinkSettings, NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::{AppError, ValidationErrors};
use crate::utils::db_error::is_unique_violation_on_alias;
use crate::utils::short_code::{CodecError, ShortCodeCodec, partition};

const LINK_COLUMNS: &str = "id, original_url, domain, alias, short_code, code_length, \
                            first_code_char, session_id, created_at";

const SETTINGS_COLUMNS: &str = "link_id, session_id, timezone, user_name, user_email, \
                                user_mobile, user_country, user_state, user_city, show_ads, \
                                record_stats, expire_date, expire_time";

/// PostgreSQL repository for short links and their settings.
///
/// Link creation runs in one transaction: the row is inserted to obtain its
/// identifier, the code columns are written back, and the settings row is
/// inserted before commit.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    original_url: String,
    domain: Option<String>,
    alias: Option<String>,
    short_code: Option<String>,
    code_length: Option<i32>,
    first_code_char: Option<String>,
    session_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShortLinkRow> for ShortLink {
    type Error = AppError;

    fn try_from(row: ShortLinkRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let missing_code = move || AppError::internal("Short link has no code", json!({ "id": id }));

        let short_code = row.short_code.ok_or_else(missing_code)?;
        let first_code_char = row
            .first_code_char
            .as_deref()
            .and_then(|c| c.chars().next())
            .ok_or_else(missing_code)?;
        let code_length = row.code_length.ok_or_else(missing_code)?;

        Ok(ShortLink {
            id: row.id,
            original_url: row.original_url,
            domain: row.domain,
            alias: row.alias,
            short_code,
            code_length,
            first_code_char,
            owner_session_id: row.session_id,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LinkSettingsRow {
    link_id: i64,
    session_id: Option<i64>,
    timezone: Option<String>,
    user_name: Option<String>,
    user_email: Option<String>,
    user_mobile: Option<String>,
    user_country: Option<String>,
    user_state: Option<String>,
    user_city: Option<String>,
    show_ads: bool,
    record_stats: bool,
    expire_date: Option<NaiveDate>,
    expire_time: Option<NaiveTime>,
}

impl From<LinkSettingsRow> for LinkSettings {
    fn from(row: LinkSettingsRow) -> Self {
        LinkSettings {
            link_id: row.link_id,
            session_id: row.session_id,
            timezone: row.timezone,
            user_name: row.user_name,
            user_email: row.user_email,
            user_mobile: row.user_mobile,
            user_country: row.user_country,
            user_state: row.user_state,
            user_city: row.user_city,
            show_ads: row.show_ads,
            record_stats: row.record_stats,
            expire_date: row.expire_date,
            expire_time: row.expire_time,
        }
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    if is_unique_violation_on_alias(&e) {
        debug!("Alias taken by a concurrent insert");
        return ValidationErrors::alias_unavailable().into();
    }
    e.into()
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn count_alias_collisions(&self, alias: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM short_links
            WHERE (alias = $1 OR original_url = $1)
              AND alias IS NOT NULL
            "#,
        )
        .bind(alias)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn create(
        &self,
        new_link: NewShortLink,
        settings: NewLinkSettings,
        codec: ShortCodeCodec,
    ) -> Result<ShortLink, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO short_links (original_url, domain, alias, session_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.domain)
        .bind(&new_link.alias)
        .bind(new_link.owner_session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        let short_code = codec.encode(u64::try_from(id).map_err(|_| CodecError::Overflow)?)?;
        let (code_length, first_code_char) = partition(&short_code)
            .ok_or_else(|| AppError::internal("Encoded an empty short code", json!({ "id": id })))?;

        let row: ShortLinkRow = sqlx::query_as(&format!(
            r#"
            UPDATE short_links
            SET short_code = $1, code_length = $2, first_code_char = $3
            WHERE id = $4
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&short_code)
        .bind(code_length)
        .bind(first_code_char.to_string())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO link_settings (
                link_id, session_id, timezone, user_name, user_email, user_mobile,
                user_country, user_state, user_city, show_ads, record_stats,
                expire_date, expire_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(id)
        .bind(settings.session_id)
        .bind(&settings.timezone)
        .bind(&settings.user_name)
        .bind(&settings.user_email)
        .bind(&settings.user_mobile)
        .bind(&settings.user_country)
        .bind(&settings.user_state)
        .bind(&settings.user_city)
        .bind(settings.show_ads)
        .bind(settings.record_stats)
        .bind(settings.expire_date)
        .bind(settings.expire_time)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM short_links WHERE id = $1 AND short_code IS NOT NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::try_from).transpose()
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM short_links WHERE alias = $1 AND short_code IS NOT NULL"
        ))
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::try_from).transpose()
    }

    async fn find_settings(&self, link_id: i64) -> Result<Option<LinkSettings>, AppError> {
        let row: Option<LinkSettingsRow> = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM link_settings WHERE link_id = $1"
        ))
        .bind(link_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(LinkSettings::from))
    }
}
