use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{Match, MatchKey, Swipe, SwipeKind};
use crate::services::store::{CreateOutcome, InsertOutcome, MatchStore, StorageError, SwipeStore};

/// PostgreSQL client holding the authoritative swipe and match records
///
/// Both write paths are single `INSERT ... ON CONFLICT DO NOTHING`
/// statements, so the primary key is what arbitrates concurrent writers.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StorageError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StorageError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn swipe_from_row(row: &PgRow) -> Result<Swipe, StorageError> {
    Ok(Swipe {
        swiper_id: row.try_get("swiper_id")?,
        target_id: row.try_get("target_id")?,
        kind: row.try_get::<SwipeKind, _>("kind")?,
        created_at: row.try_get("created_at")?,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match, StorageError> {
    let member_low: String = row.try_get("member_low")?;
    let member_high: String = row.try_get("member_high")?;
    if member_low >= member_high {
        return Err(StorageError::Corrupt(format!(
            "match members out of order: {} / {}",
            member_low, member_high
        )));
    }

    Ok(Match {
        match_key: MatchKey::from_raw(row.try_get::<String, _>("match_id")?),
        member_low,
        member_high,
        created_at: row.try_get("created_at")?,
        last_message_at: row.try_get("last_message_at")?,
        last_message_summary: row.try_get("last_message_summary")?,
    })
}

#[async_trait]
impl SwipeStore for PostgresClient {
    async fn find(&self, swiper_id: &str, target_id: &str) -> Result<Option<Swipe>, StorageError> {
        let query = r#"
            SELECT swiper_id, target_id, kind, created_at
            FROM swipes
            WHERE swiper_id = $1 AND target_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(swiper_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(swipe_from_row).transpose()
    }

    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<InsertOutcome, StorageError> {
        let query = r#"
            INSERT INTO swipes (swiper_id, target_id, kind, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (swiper_id, target_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&swipe.swiper_id)
            .bind(&swipe.target_id)
            .bind(swipe.kind)
            .bind(swipe.created_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                "Swipe already recorded: {} -> {}",
                swipe.swiper_id,
                swipe.target_id
            );
            return Ok(InsertOutcome::AlreadyExists);
        }

        tracing::debug!(
            "Recorded swipe: {} -> {} ({})",
            swipe.swiper_id,
            swipe.target_id,
            swipe.kind
        );
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl MatchStore for PostgresClient {
    async fn exists(&self, key: &MatchKey) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM matches WHERE match_id = $1)")
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create_if_absent(
        &self,
        key: &MatchKey,
        member_low: &str,
        member_high: &str,
    ) -> Result<CreateOutcome, StorageError> {
        let query = r#"
            INSERT INTO matches (match_id, member_low, member_high, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (match_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(key.as_str())
            .bind(member_low)
            .bind(member_high)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(CreateOutcome::AlreadyExists);
        }

        tracing::debug!("Created match {}", key);
        Ok(CreateOutcome::Created)
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<Match>, StorageError> {
        let query = r#"
            SELECT match_id, member_low, member_high, created_at,
                   last_message_at, last_message_summary
            FROM matches
            WHERE match_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(match_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Match>, StorageError> {
        let query = r#"
            SELECT match_id, member_low, member_high, created_at,
                   last_message_at, last_message_summary
            FROM matches
            WHERE member_low = $1 OR member_high = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let matches = rows.iter().map(match_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("User {} has {} matches", user_id, matches.len());

        Ok(matches)
    }

    async fn record_last_message(
        &self,
        key: &MatchKey,
        at: chrono::DateTime<chrono::Utc>,
        summary: &str,
    ) -> Result<bool, StorageError> {
        let query = r#"
            UPDATE matches
            SET last_message_at = $2,
                last_message_summary = $3
            WHERE match_id = $1
              AND (last_message_at IS NULL OR last_message_at <= $2)
        "#;

        let result = sqlx::query(query)
            .bind(key.as_str())
            .bind(at)
            .bind(summary)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing updated: either the match is missing or the update was stale
        self.exists(key).await
    }
}
