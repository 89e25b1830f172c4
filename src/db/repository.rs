//! Database repository for curriculum data.
//!
//! Uses prepared statements and implements the store gateway the import
//! pipeline writes through.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::import::TopicStore;
use crate::models::{Level, NewTopic, Topic};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicStore for Repository {
    /// Insert a topic row.
    ///
    /// A duplicate `(name, level)` pair surfaces as [`AppError::Constraint`]
    /// through the unique index.
    async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO topics (
                id, name, level, order_index, description,
                grammar_resource, vocabulary, theme, implicit_objective, classroom_link,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&topic.name)
        .bind(topic.level.as_str())
        .bind(topic.order_index)
        .bind(&topic.description)
        .bind(&topic.grammar_resource)
        .bind(&topic.vocabulary)
        .bind(&topic.theme)
        .bind(&topic.implicit_objective)
        .bind(&topic.classroom_link)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Topic {
            id,
            name: topic.name.clone(),
            level: topic.level,
            order_index: topic.order_index,
            description: topic.description.clone(),
            grammar_resource: topic.grammar_resource.clone(),
            vocabulary: topic.vocabulary.clone(),
            theme: topic.theme.clone(),
            implicit_objective: topic.implicit_objective.clone(),
            classroom_link: topic.classroom_link.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn delete_all_topics(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM topics").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_exercises(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM exercises")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_topics(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM topics")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    async fn existing_topic_keys(&self) -> Result<HashSet<(String, Level)>, AppError> {
        let rows = sqlx::query("SELECT name, level FROM topics")
            .fetch_all(&self.pool)
            .await?;

        let mut keys = HashSet::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            let level_str: String = row.get("level");
            let level = Level::from_str(&level_str).ok_or_else(|| {
                AppError::Database(format!("Unknown level '{}' for topic '{}'", level_str, name))
            })?;
            keys.insert((name, level));
        }
        Ok(keys)
    }

    async fn topic_exists(&self, name: &str, level: Level) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM topics WHERE name = ? AND level = ?")
            .bind(name)
            .bind(level.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}
