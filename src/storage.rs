// src/storage.rs
//! Resume-draft and payment-order persistence behind a store trait. The
//! server runs on SQLite; tests use the in-memory implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub id: String,
    pub title: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn created(order_id: &str, amount: i64, currency: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            amount,
            currency: currency.to_string(),
            status: "created".to_string(),
            payment_id: None,
            created_at: Utc::now(),
        }
    }
}

#[rocket::async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save_resume(&self, title: &str, data: serde_json::Value) -> Result<StoredResume>;
    async fn get_resume(&self, id: &str) -> Result<Option<StoredResume>>;
    async fn list_resumes(&self) -> Result<Vec<StoredResume>>;
    async fn delete_resume(&self, id: &str) -> Result<bool>;

    async fn record_order(&self, order: OrderRecord) -> Result<()>;
    async fn mark_order_paid(&self, order_id: &str, payment_id: &str) -> Result<bool>;
}

#[derive(Debug, sqlx::FromRow)]
struct ResumeRow {
    id: String,
    title: String,
    data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResumeRow {
    fn into_resume(self) -> Result<StoredResume> {
        let data = serde_json::from_str(&self.data)
            .with_context(|| format!("Corrupt resume data for id {}", self.id))?;
        Ok(StoredResume {
            id: self.id,
            title: self.title,
            data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Database connection pool initialized: {}", database_url);
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                order_id TEXT PRIMARY KEY,
                amount INTEGER NOT NULL,
                currency TEXT NOT NULL,
                status TEXT NOT NULL,
                payment_id TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

#[rocket::async_trait]
impl ResumeStore for SqliteStore {
    async fn save_resume(&self, title: &str, data: serde_json::Value) -> Result<StoredResume> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let serialized = serde_json::to_string(&data).context("Failed to serialize resume data")?;

        sqlx::query(
            r#"
            INSERT INTO resumes (id, title, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(&serialized)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!("Saved resume {} ({})", id, title);
        Ok(StoredResume {
            id,
            title: title.to_string(),
            data,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_resume(&self, id: &str) -> Result<Option<StoredResume>> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, title, data, created_at, updated_at
            FROM resumes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResumeRow::into_resume).transpose()
    }

    async fn list_resumes(&self) -> Result<Vec<StoredResume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, title, data, created_at, updated_at
            FROM resumes
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ResumeRow::into_resume).collect()
    }

    async fn delete_resume(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_order(&self, order: OrderRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (order_id, amount, currency, status, payment_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.order_id)
        .bind(order.amount)
        .bind(&order.currency)
        .bind(&order.status)
        .bind(&order.payment_id)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        info!("Recorded order {}", order.order_id);
        Ok(())
    }

    async fn mark_order_paid(&self, order_id: &str, payment_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'paid', payment_id = ?
            WHERE order_id = ?
            "#,
        )
        .bind(payment_id)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Marked order {} as paid", order_id);
        }
        Ok(updated)
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    resumes: RwLock<HashMap<String, StoredResume>>,
    orders: RwLock<HashMap<String, OrderRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl ResumeStore for MemoryStore {
    async fn save_resume(&self, title: &str, data: serde_json::Value) -> Result<StoredResume> {
        let now = Utc::now();
        let resume = StoredResume {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.resumes
            .write()
            .await
            .insert(resume.id.clone(), resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, id: &str) -> Result<Option<StoredResume>> {
        Ok(self.resumes.read().await.get(id).cloned())
    }

    async fn list_resumes(&self) -> Result<Vec<StoredResume>> {
        let mut resumes: Vec<StoredResume> = self.resumes.read().await.values().cloned().collect();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn delete_resume(&self, id: &str) -> Result<bool> {
        Ok(self.resumes.write().await.remove(id).is_some())
    }

    async fn record_order(&self, order: OrderRecord) -> Result<()> {
        self.orders
            .write()
            .await
            .insert(order.order_id.clone(), order);
        Ok(())
    }

    async fn mark_order_paid(&self, order_id: &str, payment_id: &str) -> Result<bool> {
        match self.orders.write().await.get_mut(order_id) {
            Some(order) => {
                order.status = "paid".to_string();
                order.payment_id = Some(payment_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_resume_crud() {
        let store = MemoryStore::new();

        let saved = store
            .save_resume("Backend resume", json!({"skills": ["Rust"]}))
            .await
            .unwrap();
        assert_eq!(saved.title, "Backend resume");

        let fetched = store.get_resume(&saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.data, json!({"skills": ["Rust"]}));

        assert_eq!(store.list_resumes().await.unwrap().len(), 1);
        assert!(store.delete_resume(&saved.id).await.unwrap());
        assert!(!store.delete_resume(&saved.id).await.unwrap());
        assert!(store.get_resume(&saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_order_lifecycle() {
        let store = MemoryStore::new();

        store
            .record_order(OrderRecord::created("order_1", 49900, "INR"))
            .await
            .unwrap();

        assert!(store.mark_order_paid("order_1", "pay_1").await.unwrap());
        assert!(!store.mark_order_paid("missing", "pay_2").await.unwrap());
    }
}
