pub mod models;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::database::models::{EventAction, EventLogRecord, SecretRecord};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        // A fresh deployment starts with no database file; create it so
        // run_migrations has something to build the schema in.
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Database { pool })
    }

    /// Single-connection in-memory database, used by tests. A larger pool
    /// would hand each connection its own empty database.
    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(include_str!("../migrations/001_event_logs.sql"))
            .execute(&self.pool)
            .await?;

        sqlx::query(include_str!("../migrations/002_secrets.sql"))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn insert_event_log(&self, record: &EventLogRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO event_logs (request_id, author, action, from_branch, to_branch, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.request_id)
        .bind(&record.author)
        .bind(record.action.as_str())
        .bind(&record.from_branch)
        .bind(&record.to_branch)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent event logs, newest first, capped at `limit`.
    pub async fn recent_event_logs(&self, limit: i64) -> Result<Vec<EventLogRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, request_id, author, action, from_branch, to_branch, timestamp
            FROM event_logs
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let action: String = row.try_get("action")?;
            let action = EventAction::parse(&action).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown event action: {}", action).into())
            })?;

            records.push(EventLogRecord {
                id: Some(row.try_get::<i64, _>("id")?.to_string()),
                request_id: row.try_get("request_id")?,
                author: row.try_get("author")?,
                action,
                from_branch: row.try_get("from_branch")?,
                to_branch: row.try_get("to_branch")?,
                timestamp: row.try_get("timestamp")?,
            });
        }

        Ok(records)
    }

    /// Inserts a secret record. The UNIQUE constraint on the code column is
    /// the uniqueness authority; callers retry with a fresh code when this
    /// surfaces a unique-constraint violation.
    pub async fn insert_secret(
        &self,
        code: &str,
        name: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO secrets (secret, name, message, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(message)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_secret(&self, code: &str) -> Result<Option<SecretRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT secret, name, message, created_at
            FROM secrets
            WHERE secret = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(SecretRecord {
                secret: row.try_get("secret")?,
                name: row.try_get("name")?,
                message: row.try_get("message")?,
                created_at: row.try_get("created_at")?,
            })),
            None => Ok(None),
        }
    }
}
