use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::FeedType;

#[derive(Clone)]
pub struct FeedTypeRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FeedTypeRow {
    id: String,
    name: String,
}

impl FeedTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Looks up a feed type by exact name, creating it if absent.
    ///
    /// The insert rides on the unique constraint on `name`, so concurrent
    /// callers racing on a new name converge on a single record.
    pub async fn resolve_or_create(&self, name: &str) -> Result<FeedType, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO feed_types (id, name) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
            .bind(&id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        let row: FeedTypeRow = sqlx::query_as("SELECT * FROM feed_types WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(to_feed_type(row))
    }
}

fn to_feed_type(row: FeedTypeRow) -> FeedType {
    FeedType {
        id: Uuid::parse_str(&row.id).unwrap(),
        name: row.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: FeedTypeRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        TestContext {
            repo: FeedTypeRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_resolve_creates_then_reuses() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let milk = repo.resolve_or_create("Milk").await.unwrap();
        assert_eq!(milk.name, "Milk");

        let again = repo.resolve_or_create("Milk").await.unwrap();
        assert_eq!(again.id, milk.id);
    }

    #[tokio::test]
    async fn test_resolve_distinct_names() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let milk = repo.resolve_or_create("Milk").await.unwrap();
        let feed = repo.resolve_or_create("Feed").await.unwrap();
        assert_ne!(milk.id, feed.id);
    }

    #[tokio::test]
    async fn test_repeated_resolves_never_duplicate() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        for _ in 0..5 {
            repo.resolve_or_create("Milk").await.unwrap();
        }

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feed_types")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
