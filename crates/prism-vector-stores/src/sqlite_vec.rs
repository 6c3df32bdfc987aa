//! SQLite vector store implementation using sqlite-vec extension.
//!
//! Vectors live in a vec0 virtual table; payloads are stored alongside as
//! JSON in an auxiliary column. Distances are L2, reported as `1 / (1 + d)`
//! so that higher scores mean closer vectors.
//!
//! # Example
//!
//! ```ignore
//! use prism_vector_stores::SqliteVecStore;
//!
//! let store = SqliteVecStore::new("./storage_nodes/vectors.db", "vector_index", 3072)?;
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, Once};

use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::Value;
use zerocopy::IntoBytes;

use prism_core::error::{ErrorCode, PrismError, PrismResult};
use prism_core::traits::{VectorRecord, VectorSearchResult, VectorStore};

static REGISTER_EXTENSION: Once = Once::new();

/// SQLite vector store using sqlite-vec extension.
pub struct SqliteVecStore {
    /// SQLite connection (wrapped in Mutex for Send + Sync).
    conn: Mutex<Connection>,
    /// Collection name (table name).
    collection_name: String,
    /// Vector dimension.
    dimension: usize,
}

fn store_error(message: String, code: ErrorCode, e: rusqlite::Error) -> PrismError {
    PrismError::VectorStore {
        message,
        code,
        source: Some(Box::new(e)),
    }
}

impl SqliteVecStore {
    /// Open (or create) a store.
    ///
    /// * `db_path` - Path to SQLite database file (use ":memory:" for in-memory)
    /// * `collection_name` - Name of the collection (used as table name)
    /// * `dimension` - Dimension of vectors to store
    pub fn new(
        db_path: impl AsRef<Path>,
        collection_name: &str,
        dimension: usize,
    ) -> PrismResult<Self> {
        if dimension == 0 {
            return Err(PrismError::vector_store("Vector dimension must be greater than 0"));
        }
        if collection_name.is_empty() || collection_name.contains('"') {
            return Err(PrismError::vector_store(format!(
                "Invalid collection name '{}'",
                collection_name
            )));
        }

        // SAFETY: sqlite3_auto_extension requires a function pointer cast.
        // This is the documented way to register sqlite-vec with rusqlite.
        REGISTER_EXTENSION.call_once(|| unsafe {
            rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
                sqlite_vec::sqlite3_vec_init as *const (),
            )));
        });

        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(|e| {
            store_error(
                format!("Failed to open SQLite database: {}", e),
                ErrorCode::VecConnectionFailed,
                e,
            )
        })?;

        // Verify sqlite-vec is loaded.
        let version: String = conn
            .query_row("SELECT vec_version()", [], |row| row.get(0))
            .map_err(|e| {
                store_error(
                    format!("sqlite-vec extension not loaded: {}", e),
                    ErrorCode::VecConnectionFailed,
                    e,
                )
            })?;
        tracing::debug!(version = %version, path = %db_path.display(), "Opened sqlite-vec store");

        let store = Self {
            conn: Mutex::new(conn),
            collection_name: collection_name.to_string(),
            dimension,
        };
        store.create_table(&*store.lock()?)?;
        Ok(store)
    }

    /// Vector dimension of the collection.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn lock(&self) -> PrismResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PrismError::vector_store(format!("Failed to acquire lock: {}", e)))
    }

    /// Create the vec0 virtual table for this collection.
    fn create_table(&self, conn: &Connection) -> PrismResult<()> {
        // The + prefix on columns makes them auxiliary (stored but not indexed).
        let sql = format!(
            r#"CREATE VIRTUAL TABLE IF NOT EXISTS "{}" USING vec0(
                id TEXT PRIMARY KEY,
                embedding float[{}],
                +payload TEXT
            )"#,
            self.collection_name, self.dimension
        );

        conn.execute(&sql, []).map_err(|e| {
            store_error(
                format!("Failed to create vec0 table: {}", e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;
        Ok(())
    }

    /// Convert bytes back to Vec<f32>.
    fn bytes_to_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn parse_payload(payload_str: &str) -> PrismResult<HashMap<String, Value>> {
        serde_json::from_str(payload_str).map_err(|e| {
            PrismError::vector_store(format!("Stored payload is not valid JSON: {}", e))
                .with_source(e)
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVecStore {
    async fn insert(&self, records: Vec<VectorRecord>) -> PrismResult<()> {
        if let Some(bad) = records.iter().find(|r| r.vector.len() != self.dimension) {
            return Err(PrismError::vector_store(format!(
                "Record '{}' has dimension {}, expected {}",
                bad.id,
                bad.vector.len(),
                self.dimension
            )));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(|e| {
            store_error(
                format!("Failed to begin transaction: {}", e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;

        {
            // vec0 has no INSERT OR REPLACE; delete first.
            let delete_sql = format!(r#"DELETE FROM "{}" WHERE id = ?"#, self.collection_name);
            let insert_sql = format!(
                r#"INSERT INTO "{}" (id, embedding, payload) VALUES (?, ?, ?)"#,
                self.collection_name
            );
            let mut delete = tx.prepare(&delete_sql).map_err(|e| {
                store_error(
                    format!("Failed to prepare delete statement: {}", e),
                    ErrorCode::VecOperationFailed,
                    e,
                )
            })?;
            let mut insert = tx.prepare(&insert_sql).map_err(|e| {
                store_error(
                    format!("Failed to prepare insert statement: {}", e),
                    ErrorCode::VecOperationFailed,
                    e,
                )
            })?;

            for record in &records {
                let payload_json = serde_json::to_string(&record.payload)?;
                delete.execute([&record.id]).map_err(|e| {
                    store_error(
                        format!("Failed to replace record '{}': {}", record.id, e),
                        ErrorCode::VecOperationFailed,
                        e,
                    )
                })?;
                insert
                    .execute(rusqlite::params![
                        record.id,
                        record.vector.as_bytes(),
                        payload_json
                    ])
                    .map_err(|e| {
                        store_error(
                            format!("Failed to insert record '{}': {}", record.id, e),
                            ErrorCode::VecOperationFailed,
                            e,
                        )
                    })?;
            }
        }

        tx.commit().map_err(|e| {
            store_error(
                format!("Failed to commit insert: {}", e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;

        tracing::debug!(
            collection = %self.collection_name,
            count = records.len(),
            "Inserted records"
        );
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> PrismResult<Vec<VectorSearchResult>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        if query_vector.len() != self.dimension {
            return Err(PrismError::vector_store(format!(
                "Query has dimension {}, expected {}",
                query_vector.len(),
                self.dimension
            )));
        }

        let conn = self.lock()?;
        let sql = format!(
            r#"SELECT id, distance, payload
               FROM "{}"
               WHERE embedding MATCH ? AND k = ?
               ORDER BY distance"#,
            self.collection_name
        );

        let mut stmt = conn.prepare(&sql).map_err(|e| {
            store_error(
                format!("Failed to prepare search statement: {}", e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;

        let rows = stmt
            .query_map(rusqlite::params![query_vector.as_bytes(), limit as i64], |row| {
                let id: String = row.get(0)?;
                let distance: f64 = row.get(1)?;
                let payload_str: String = row.get(2)?;
                Ok((id, distance, payload_str))
            })
            .map_err(|e| {
                store_error(
                    format!("Failed to execute search: {}", e),
                    ErrorCode::VecOperationFailed,
                    e,
                )
            })?;

        let mut results = Vec::new();
        for row in rows {
            let (id, distance, payload_str) = row.map_err(|e| {
                store_error(
                    format!("Failed to read search result: {}", e),
                    ErrorCode::VecOperationFailed,
                    e,
                )
            })?;

            results.push(VectorSearchResult {
                id,
                score: (1.0 / (1.0 + distance)) as f32,
                payload: Self::parse_payload(&payload_str)?,
            });
        }

        tracing::debug!(
            collection = %self.collection_name,
            results = results.len(),
            "Search complete"
        );
        Ok(results)
    }

    async fn get(&self, id: &str) -> PrismResult<Option<VectorRecord>> {
        let conn = self.lock()?;
        let sql = format!(
            r#"SELECT embedding, payload FROM "{}" WHERE id = ?"#,
            self.collection_name
        );

        let result = conn.query_row(&sql, [id], |row| {
            let embedding_bytes: Vec<u8> = row.get(0)?;
            let payload_str: String = row.get(1)?;
            Ok((embedding_bytes, payload_str))
        });

        match result {
            Ok((embedding_bytes, payload_str)) => Ok(Some(VectorRecord::new(
                id,
                Self::bytes_to_vector(&embedding_bytes),
                Self::parse_payload(&payload_str)?,
            ))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(store_error(
                format!("Failed to get record '{}': {}", id, e),
                ErrorCode::VecOperationFailed,
                e,
            )),
        }
    }

    async fn count(&self) -> PrismResult<usize> {
        let conn = self.lock()?;
        let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, self.collection_name);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0)).map_err(|e| {
            store_error(
                format!("Failed to count records: {}", e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;
        Ok(count as usize)
    }

    async fn reset(&self) -> PrismResult<()> {
        let conn = self.lock()?;
        let sql = format!(r#"DROP TABLE IF EXISTS "{}""#, self.collection_name);
        conn.execute(&sql, []).map_err(|e| {
            store_error(
                format!("Failed to drop collection '{}': {}", self.collection_name, e),
                ErrorCode::VecOperationFailed,
                e,
            )
        })?;
        self.create_table(&conn)?;

        tracing::info!(collection = %self.collection_name, "Reset collection");
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.collection_name
    }
}
