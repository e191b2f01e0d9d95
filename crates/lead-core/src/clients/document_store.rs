//! SQLite-backed document store for leads
//!
//! Each collection is a table of JSON documents keyed by a generated UUID.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::config::DatabaseConfig;
use crate::constants::LEAD_COLLECTION;
use crate::error::{LeadsError, Result};
use crate::intake::LeadStore;
use lead_types::{Lead, LeadRecord};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Where a `DATABASE_URL` points
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Accepts `sqlite::memory:`, `sqlite://path`, `sqlite:path` or a bare path
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url == "sqlite::memory:" || url == ":memory:" {
            return Ok(Self::Memory);
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if path.is_empty() {
            return Err(LeadsError::Config(format!("DATABASE_URL '{}' has no path", url)));
        }

        if path.contains("://") {
            return Err(LeadsError::Config(format!(
                "DATABASE_URL '{}' is not a SQLite location",
                url
            )));
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

/// Collection names become table names, so only identifiers are allowed
fn check_collection_name(collection: &str) -> Result<()> {
    let valid = !collection.is_empty()
        && collection.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !collection.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(LeadsError::Persistence(format!("Invalid collection name '{}'", collection)))
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| LeadsError::Persistence("Database connection lock poisoned".to_string()))
}

/// Insert a document into a collection and return its generated id
fn insert_document(
    conn: &Connection,
    collection: &str,
    document: &serde_json::Value,
) -> Result<(String, DateTime<Utc>)> {
    check_collection_name(collection)?;
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let timestamp = now.to_rfc3339();

    conn.execute(
        &format!(
            "INSERT INTO {} (id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            collection
        ),
        params![id, document.to_string(), timestamp, timestamp],
    )
    .map_err(|e| LeadsError::Persistence(format!("Failed to insert into {}: {}", collection, e)))?;

    Ok((id, now))
}

impl SqliteDocumentStore {
    /// Open the store named by the database configuration
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref()
            .ok_or_else(|| LeadsError::NotConfigured("DATABASE_URL is not set".to_string()))?;

        let conn = match DatabaseLocation::parse(url)? {
            DatabaseLocation::Memory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                let conn = Connection::open(&path)?;
                conn.execute_batch("PRAGMA journal_mode=WAL;")?;
                conn
            }
        };

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_collection(LEAD_COLLECTION)?;

        log::info!("Opened document store at {}", url);
        Ok(store)
    }

    /// In-memory store, used by tests and local runs without a database
    pub fn in_memory() -> Result<Self> {
        Self::open(&DatabaseConfig {
            url: Some("sqlite::memory:".to_string()),
            name: None,
        })
    }

    fn ensure_collection(&self, collection: &str) -> Result<()> {
        check_collection_name(collection)?;
        let conn = lock(&self.conn)?;
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {collection} (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#
        ))?;
        Ok(())
    }

    /// Run a statement on the blocking pool so SQLite I/O stays off the async workers
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock(&conn)?;
            f(&guard)
        })
        .await
        .map_err(|e| LeadsError::Persistence(format!("Database task failed: {}", e)))?
    }

    #[cfg(test)]
    fn count(&self, collection: &str) -> Result<u64> {
        check_collection_name(collection)?;
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| LeadsError::Persistence(format!("Corrupt timestamp '{}': {}", value, e)))
}

#[async_trait]
impl LeadStore for SqliteDocumentStore {
    async fn create(&self, lead: &Lead) -> Result<LeadRecord> {
        let document = serde_json::to_value(lead)?;
        let (id, created_at) = self
            .with_connection(move |conn| insert_document(conn, LEAD_COLLECTION, &document))
            .await?;

        Ok(LeadRecord {
            id,
            lead: lead.clone(),
            created_at,
            updated_at: created_at,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<LeadRecord>> {
        let lookup_id = id.to_string();
        let row: Option<(String, String, String)> = self
            .with_connection(move |conn| {
                let row = conn
                    .query_row(
                        &format!(
                            "SELECT document, created_at, updated_at FROM {} WHERE id = ?1",
                            LEAD_COLLECTION
                        ),
                        params![lookup_id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        match row {
            Some((document, created_at, updated_at)) => Ok(Some(LeadRecord {
                id: id.to_string(),
                lead: serde_json::from_str(&document)?,
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            })),
            None => Ok(None),
        }
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name LIMIT ?1",
            )?;
            let names = stmt
                .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .await
    }
}

/// Stand-in used when no database could be opened; every write fails
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl LeadStore for UnavailableStore {
    async fn create(&self, _lead: &Lead) -> Result<LeadRecord> {
        Err(LeadsError::Persistence(format!("Database not available: {}", self.reason)))
    }

    async fn get(&self, _id: &str) -> Result<Option<LeadRecord>> {
        Err(LeadsError::Persistence(format!("Database not available: {}", self.reason)))
    }

    async fn list_collections(&self, _limit: usize) -> Result<Vec<String>> {
        Err(LeadsError::Persistence(format!("Database not available: {}", self.reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_location() {
        assert_eq!(DatabaseLocation::parse("sqlite::memory:").unwrap(), DatabaseLocation::Memory);
        assert_eq!(
            DatabaseLocation::parse("sqlite:///var/lib/leads.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/leads.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("leads.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("leads.db"))
        );
        assert!(DatabaseLocation::parse("mongodb://localhost:27017").is_err());
        assert!(DatabaseLocation::parse("sqlite://").is_err());
    }

    #[test]
    fn test_collection_names_are_identifiers() {
        assert!(check_collection_name("lead").is_ok());
        assert!(check_collection_name("lead; DROP TABLE lead").is_err());
        assert!(check_collection_name("1lead").is_err());
        assert!(check_collection_name("").is_err());
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids_for_identical_leads() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let lead = Lead::new("Alice", "+1555000111");

        let first = store.create(&lead).await.unwrap();
        let second = store.create(&lead).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(store.count(LEAD_COLLECTION).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stored_record_round_trips_exactly() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let lead = Lead {
            email: Some("dana@example.com".to_string()),
            message: Some("Interested in <PT> & classes".to_string()),
            ..Lead::new("Dana", "+1555000444")
        };

        let created = store.create(&lead).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.lead, lead);
        assert_eq!(fetched.lead.selected_plan, None);
        assert_eq!(fetched.lead.source, None);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_creates_share_one_connection() {
        let store = Arc::new(SqliteDocumentStore::in_memory().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.create(&Lead::new(format!("Lead {}", i), "+1555000000")).await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 8);
        assert_eq!(store.count(LEAD_COLLECTION).unwrap(), 8);
    }

    #[tokio::test]
    async fn test_get_unknown_id_returns_none() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_lists_lead_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.db");
        let store = SqliteDocumentStore::open(&DatabaseConfig {
            url: Some(format!("sqlite://{}", path.display())),
            name: Some("gym".to_string()),
        })
        .unwrap();

        assert_eq!(store.list_collections(10).await.unwrap(), vec!["lead".to_string()]);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_write() {
        let store = UnavailableStore::new("DATABASE_URL is not set");
        let err = store.create(&Lead::new("Eve", "+1555000555")).await.unwrap_err();
        assert!(err.to_string().contains("Database not available"));
    }
}
