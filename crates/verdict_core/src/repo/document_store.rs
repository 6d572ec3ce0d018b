//! Collection/document store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/set/update/delete/list-all over named collections of
//!   JSON documents.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Document ids are generated here (UUID v4) unless the caller supplies
//!   one through `set`.
//! - `list_all` returns documents in creation order.
//! - `update` merges top-level keys into the stored body; keys not supplied
//!   keep their stored value.
//! - Stored bodies are JSON objects; anything else is reported as invalid
//!   data instead of being masked.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level JSON object stored per document.
pub type DocumentBody = Map<String, Value>;

/// Store error for document persistence and decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(String),
    InvalidData(String),
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// One stored document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: DocumentBody,
}

/// Collection-scoped document CRUD.
pub trait DocumentStore {
    /// Returns every document in `collection`, oldest first.
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
    /// Inserts a document under a fresh id and returns that id.
    fn create(&self, collection: &str, body: &DocumentBody) -> StoreResult<String>;
    /// Writes a document under a caller-chosen id, replacing any prior body.
    fn set(&self, collection: &str, id: &str, body: &DocumentBody) -> StoreResult<()>;
    /// Merges `body` into an existing document. Missing id is `NotFound`.
    fn update(&self, collection: &str, id: &str, body: &DocumentBody) -> StoreResult<()>;
    /// Removes a document. Missing id is `NotFound`.
    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}

/// SQLite-backed document store over the `documents` table.
#[derive(Clone, Copy)]
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_id, body
             FROM documents
             WHERE collection = ?1
             ORDER BY seq ASC;",
        )?;
        let mut rows = stmt.query([collection])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document(row.get("doc_id")?, row.get("body")?)?);
        }
        Ok(documents)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = self
            .conn
            .query_row(
                "SELECT doc_id, body
                 FROM documents
                 WHERE collection = ?1 AND doc_id = ?2;",
                params![collection, id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(doc_id, body)| parse_document(doc_id, body))
            .transpose()
    }

    fn create(&self, collection: &str, body: &DocumentBody) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let encoded = serde_json::to_string(body)?;
        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3);",
            params![collection, id, encoded],
        )?;
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, body: &DocumentBody) -> StoreResult<()> {
        let encoded = serde_json::to_string(body)?;
        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_id) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection, id, encoded],
        )?;
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, body: &DocumentBody) -> StoreResult<()> {
        let mut current = self
            .get(collection, id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        for (key, value) in body {
            current.body.insert(key.clone(), value.clone());
        }

        let encoded = serde_json::to_string(&current.body)?;
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id, encoded],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_document(id: String, body: String) -> StoreResult<Document> {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(body)) => Ok(Document { id, body }),
        Ok(other) => Err(StoreError::InvalidData(format!(
            "document `{id}` body is not an object: {other}"
        ))),
        Err(err) => Err(StoreError::InvalidData(format!(
            "document `{id}` body is not valid JSON: {err}"
        ))),
    }
}
