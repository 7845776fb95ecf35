//! Postgres-backed topic store.
//!
//! One row per trending topic in `trending_topics`; converting a trend into a
//! content idea appends to `ideas_bank` and flips the topic to `used`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use trendscout_common::types::{
    IdeaEntry, NewTopic, Platform, TopicFilter, TopicStats, TopicStatus, TopicUpdate,
    TrendingTopic,
};

use crate::traits::{TopicSink, TopicStore};

const TOPIC_COLUMNS: &str = "id, topic, summary, source_urls, relevance_score, content_angles, \
                             search_query, batch_id, status, source_platform, notes, \
                             created_at, updated_at";

#[derive(Clone)]
pub struct PgTopicStore {
    pool: PgPool,
}

impl PgTopicStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trending_topics (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                topic TEXT NOT NULL,
                summary TEXT NOT NULL DEFAULT '',
                source_urls JSONB NOT NULL DEFAULT '[]',
                relevance_score INT NOT NULL,
                content_angles JSONB NOT NULL DEFAULT '[]',
                search_query TEXT,
                batch_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'new',
                source_platform TEXT NOT NULL,
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_trending_topics_batch ON trending_topics (batch_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ideas_bank (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                idea TEXT NOT NULL,
                topic TEXT NOT NULL,
                angle TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Topic store schema ready");
        Ok(())
    }
}

#[async_trait]
impl TopicSink for PgTopicStore {
    async fn save_topic(&self, topic: NewTopic) -> Result<TrendingTopic> {
        let row = sqlx::query_as::<_, TopicRow>(&format!(
            r#"
            INSERT INTO trending_topics
                (topic, summary, source_urls, relevance_score, content_angles,
                 search_query, batch_id, source_platform)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TOPIC_COLUMNS}
            "#
        ))
        .bind(&topic.topic)
        .bind(&topic.summary)
        .bind(Json(&topic.source_urls))
        .bind(topic.relevance_score as i32)
        .bind(Json(&topic.content_angles))
        .bind(&topic.search_query)
        .bind(&topic.batch_id)
        .bind(topic.source_platform.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}

#[async_trait]
impl TopicStore for PgTopicStore {
    async fn get(&self, id: Uuid) -> Result<Option<TrendingTopic>> {
        let row = sqlx::query_as::<_, TopicRow>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM trending_topics WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    async fn list(&self, filter: &TopicFilter) -> Result<Vec<TrendingTopic>> {
        let rows = sqlx::query_as::<_, TopicRow>(&format!(
            r#"
            SELECT {TOPIC_COLUMNS} FROM trending_topics
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR source_platform = $2)
              AND ($3::int IS NULL OR relevance_score >= $3)
              AND ($4::text IS NULL OR batch_id = $4)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.platform.map(|p| p.as_str()))
        .bind(filter.min_relevance.map(|m| m as i32))
        .bind(filter.batch_id.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn update(&self, id: Uuid, update: TopicUpdate) -> Result<Option<TrendingTopic>> {
        let row = sqlx::query_as::<_, TopicRow>(&format!(
            r#"
            UPDATE trending_topics
            SET status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                relevance_score = COALESCE($4, relevance_score),
                updated_at = now()
            WHERE id = $1
            RETURNING {TOPIC_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.notes.as_deref())
        .bind(update.relevance_score.map(|m| m as i32))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trending_topics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<TopicStats> {
        let row = sqlx::query_as::<_, (i64, i64, f64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'new'),
                   COALESCE(AVG(relevance_score), 0)::float8
            FROM trending_topics
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT source_platform FROM trending_topics
            GROUP BY source_platform
            ORDER BY COUNT(*) DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(TopicStats {
            total: row.0 as u64,
            new_count: row.1 as u64,
            avg_relevance: row.2,
            top_platform: top.and_then(|(p,)| Platform::parse(&p)),
        })
    }

    async fn convert_to_idea(&self, id: Uuid) -> Result<Option<IdeaEntry>> {
        let mut tx = self.pool.begin().await?;

        let Some(topic) = sqlx::query_as::<_, TopicRow>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM trending_topics WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };
        let topic = topic.0;

        let idea_row = sqlx::query_as::<_, IdeaRow>(
            r#"
            INSERT INTO ideas_bank (idea, topic, angle)
            VALUES ($1, $2, $3)
            RETURNING id, idea, topic, angle, created_at
            "#,
        )
        .bind(&topic.topic)
        .bind(format!("Trending: {}", topic.source_platform))
        .bind(topic.content_angles.first())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE trending_topics SET status = 'used', updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(topic = topic.topic.as_str(), "Trend converted to idea");
        Ok(Some(idea_row.0))
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct TopicRow(TrendingTopic);

impl<'r> sqlx::FromRow<'r, PgRow> for TopicRow {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        let source_urls: Json<Vec<String>> = row.try_get("source_urls")?;
        let content_angles: Json<Vec<String>> = row.try_get("content_angles")?;
        let relevance_score: i32 = row.try_get("relevance_score")?;
        let status: String = row.try_get("status")?;
        let status = TopicStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: format!("unknown topic status: {status}").into(),
        })?;
        let source_platform: String = row.try_get("source_platform")?;
        let source_platform =
            Platform::parse(&source_platform).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "source_platform".into(),
                source: format!("unknown platform: {source_platform}").into(),
            })?;

        Ok(TopicRow(TrendingTopic {
            id: row.try_get("id")?,
            topic: row.try_get("topic")?,
            summary: row.try_get("summary")?,
            source_urls: source_urls.0,
            relevance_score: relevance_score.clamp(0, u8::MAX as i32) as u8,
            content_angles: content_angles.0,
            search_query: row.try_get("search_query")?,
            batch_id: row.try_get("batch_id")?,
            status,
            source_platform,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

struct IdeaRow(IdeaEntry);

impl<'r> sqlx::FromRow<'r, PgRow> for IdeaRow {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(IdeaRow(IdeaEntry {
            id: row.try_get("id")?,
            idea: row.try_get("idea")?,
            topic: row.try_get("topic")?,
            angle: row.try_get("angle")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}
