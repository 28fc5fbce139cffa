//! SQLite accessor for the single analysis record.

use crate::models::AnalysisRecord;
use metrics::histogram;
use service_core::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Database connection pool wrapper.
///
/// The pool is capped at one connection: each operation holds the connection
/// for its duration and releases it on every exit path when the guard drops,
/// and concurrent appends serialize instead of interleaving.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database file at `path`, creating it if it does not exist.
    #[instrument(skip(path), fields(service = "analysis-service"))]
    pub async fn new(path: &str) -> Result<Self, AppError> {
        info!(path = %path, "Opening SQLite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection established");

        Ok(Self { pool })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Ensure the schema exists and seed the single row on first run.
    ///
    /// Idempotent: the seed row is inserted only when the table is empty, so
    /// rerunning against an already-seeded database leaves the content alone.
    /// A missing or malformed seed file is a startup error.
    #[instrument(skip(self, seed_path))]
    pub async fn initialize(&self, seed_path: &str) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS analysis (id INTEGER PRIMARY KEY, gptOutput TEXT)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create schema: {}", e)))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analysis")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count rows: {}", e)))?;

        if count == 0 {
            let raw = tokio::fs::read_to_string(seed_path).await.map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Failed to read seed file {}: {}",
                    seed_path,
                    e
                ))
            })?;

            let seed: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Malformed seed file {}: {}",
                    seed_path,
                    e
                ))
            })?;

            let initial_content = seed
                .get("gptOutput")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            sqlx::query("INSERT INTO analysis (id, gptOutput) VALUES (1, ?)")
                .bind(&initial_content)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to seed content: {}", e))
                })?;

            info!(bytes = initial_content.len(), "Seeded initial analysis content");
        }

        Ok(())
    }

    /// Return the stored content, or an empty string when no row exists yet.
    #[instrument(skip(self))]
    pub async fn read_content(&self) -> Result<String, AppError> {
        let start = Instant::now();

        let record =
            sqlx::query_as::<_, AnalysisRecord>("SELECT id, gptOutput FROM analysis WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to read content: {}", e))
                })?;

        histogram!("db_query_duration_seconds", "operation" => "read_content")
            .record(start.elapsed().as_secs_f64());

        Ok(record.map(|r| r.gpt_output).unwrap_or_default())
    }

    /// Append `text` to the stored content, space separated, and return the
    /// updated content.
    ///
    /// The read and the replace run inside one transaction on the single
    /// pooled connection, so two simultaneous appends cannot overwrite each
    /// other's text.
    #[instrument(skip(self, text))]
    pub async fn append_text(&self, text: &str) -> Result<String, AppError> {
        let start = Instant::now();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT gptOutput FROM analysis WHERE id = 1")
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to read content: {}", e))
                })?;

        let current = current.unwrap_or_default();
        let updated = if current.is_empty() {
            text.to_string()
        } else {
            format!("{} {}", current, text)
        };

        sqlx::query("INSERT OR REPLACE INTO analysis (id, gptOutput) VALUES (1, ?)")
            .bind(&updated)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to write content: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit append: {}", e))
        })?;

        histogram!("db_query_duration_seconds", "operation" => "append_text")
            .record(start.elapsed().as_secs_f64());

        info!(total_bytes = updated.len(), "Analysis content updated");

        Ok(updated)
    }
}
