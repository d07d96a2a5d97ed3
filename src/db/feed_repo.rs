use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Baby, Feed, FeedType};

#[derive(Clone)]
pub struct FeedRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: String,
    baby_id: String,
    feed_type_id: String,
    start_time: String,
    end_time: String,
    amount_ml: Option<f64>,
    notes: Option<String>,
    created_at: String,
}

#[derive(sqlx::FromRow)]
struct FeedTypeRow {
    id: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct BabyRow {
    id: String,
    name: String,
    birth_date: String,
    created_at: String,
}

impl FeedRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, feed: &Feed) -> Result<Feed, sqlx::Error> {
        let id = feed.id.to_string();
        let baby_id = feed.baby_id.to_string();
        let feed_type_id = feed.feed_type_id.to_string();
        let start_time = feed.start_time.to_rfc3339();
        let end_time = feed.end_time.to_rfc3339();
        let created_at = feed.created_at.to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO feeds (id, baby_id, feed_type_id, start_time, end_time, amount_ml, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&baby_id)
        .bind(&feed_type_id)
        .bind(&start_time)
        .bind(&end_time)
        .bind(feed.amount_ml)
        .bind(&feed.notes)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(feed.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Fetches a feed with its feed-type relation populated.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Feed>, sqlx::Error> {
        let id_str = id.to_string();

        let row: Option<FeedRow> = sqlx::query_as("SELECT * FROM feeds WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut feed = to_feed(row);
                feed.feed_type = Some(self.fetch_feed_type(feed.feed_type_id).await?);
                Ok(Some(feed))
            }
            None => Ok(None),
        }
    }

    /// Feeds whose start time falls within `[start, end]`, most recent first,
    /// with feed-type and baby relations populated.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Feed>, sqlx::Error> {
        let start_str = start.to_rfc3339();
        let end_str = end.to_rfc3339();

        let rows: Vec<FeedRow> = sqlx::query_as(
            "SELECT * FROM feeds WHERE start_time >= ? AND start_time <= ? ORDER BY start_time DESC",
        )
        .bind(&start_str)
        .bind(&end_str)
        .fetch_all(&self.pool)
        .await?;

        let mut feeds = Vec::with_capacity(rows.len());
        for row in rows {
            let mut feed = to_feed(row);
            feed.feed_type = Some(self.fetch_feed_type(feed.feed_type_id).await?);
            feed.baby = Some(self.fetch_baby(feed.baby_id).await?);
            feeds.push(feed);
        }
        Ok(feeds)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let id_str = id.to_string();

        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn fetch_feed_type(&self, id: Uuid) -> Result<FeedType, sqlx::Error> {
        let id_str = id.to_string();

        let row: FeedTypeRow = sqlx::query_as("SELECT * FROM feed_types WHERE id = ?")
            .bind(&id_str)
            .fetch_one(&self.pool)
            .await?;

        Ok(FeedType {
            id: Uuid::parse_str(&row.id).unwrap(),
            name: row.name,
        })
    }

    async fn fetch_baby(&self, id: Uuid) -> Result<Baby, sqlx::Error> {
        let id_str = id.to_string();

        let row: BabyRow = sqlx::query_as("SELECT * FROM babies WHERE id = ?")
            .bind(&id_str)
            .fetch_one(&self.pool)
            .await?;

        Ok(Baby {
            id: Uuid::parse_str(&row.id).unwrap(),
            name: row.name,
            birth_date: parse_timestamp(&row.birth_date),
            created_at: parse_timestamp(&row.created_at),
        })
    }
}

fn to_feed(row: FeedRow) -> Feed {
    Feed {
        id: Uuid::parse_str(&row.id).unwrap(),
        baby_id: Uuid::parse_str(&row.baby_id).unwrap(),
        feed_type_id: Uuid::parse_str(&row.feed_type_id).unwrap(),
        start_time: parse_timestamp(&row.start_time),
        end_time: parse_timestamp(&row.end_time),
        amount_ml: row.amount_ml,
        notes: row.notes,
        created_at: parse_timestamp(&row.created_at),
        feed_type: None,
        baby: None,
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
