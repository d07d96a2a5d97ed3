use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Baby;

#[derive(Clone)]
pub struct BabyRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct BabyRow {
    id: String,
    name: String,
    birth_date: String,
    created_at: String,
}

impl BabyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, baby: &Baby) -> Result<Baby, sqlx::Error> {
        let id = baby.id.to_string();
        let birth_date = baby.birth_date.to_rfc3339();
        let created_at = baby.created_at.to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO babies (id, name, birth_date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&baby.name)
        .bind(&birth_date)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(baby.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Baby>, sqlx::Error> {
        let id_str = id.to_string();

        let row: Option<BabyRow> = sqlx::query_as("SELECT * FROM babies WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(to_baby))
    }

    /// Returns all babies in creation order, oldest first.
    pub async fn list(&self) -> Result<Vec<Baby>, sqlx::Error> {
        let rows: Vec<BabyRow> = sqlx::query_as("SELECT * FROM babies ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(to_baby).collect())
    }

    /// The implicitly tracked baby: the first one ever created, if any.
    pub async fn first(&self) -> Result<Option<Baby>, sqlx::Error> {
        let row: Option<BabyRow> =
            sqlx::query_as("SELECT * FROM babies ORDER BY created_at ASC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(to_baby))
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Baby, sqlx::Error> {
        let id_str = id.to_string();

        let result = sqlx::query("UPDATE babies SET name = ? WHERE id = ?")
            .bind(name)
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        self.get_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}

fn to_baby(row: BabyRow) -> Baby {
    Baby {
        id: Uuid::parse_str(&row.id).unwrap(),
        name: row.name,
        birth_date: parse_timestamp(&row.birth_date),
        created_at: parse_timestamp(&row.created_at),
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
