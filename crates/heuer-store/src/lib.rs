//! Heuer Storage Layer
//!
//! Implements the SessionStore trait on top of SQLite.
//!
//! # Architecture
//!
//! - One row per session, hypothesis, evidence reference and explicit score
//! - Scores are keyed by (session, hypothesis, evidence); writes upsert so the
//!   last write for a cell wins
//! - Every write is validated by rebuilding the session's Score Matrix first,
//!   so the database never holds a value the active scale rejects
//!
//! # Examples
//!
//! ```no_run
//! use heuer_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for session operations
//! ```

#![warn(missing_docs)]

use heuer_domain::traits::SessionStore;
use heuer_domain::{
    AnalysisSession, EngineError, EvidenceId, EvidenceRef, Hypothesis, HypothesisId, ScaleType,
    ScoreKey, SessionId, SessionSummary,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Session not found
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The engine rejected the write
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// SQLite-based implementation of SessionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or share one behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use heuer_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("heuer.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn session_id_to_bytes(id: SessionId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_session_id(bytes: &[u8]) -> Result<SessionId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for SessionId, got {}", bytes.len()))
        })?;
        Ok(SessionId::from_value(u128::from_be_bytes(arr)))
    }

    fn str_to_scale(s: &str) -> Result<ScaleType, StoreError> {
        ScaleType::parse(s).ok_or_else(|| StoreError::InvalidData(format!("Unknown scale type: {}", s)))
    }

    /// Load a session or fail with `NotFound`
    fn require_session(&self, id: SessionId) -> Result<AnalysisSession, StoreError> {
        self.get_session(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn load_hypotheses(&self, id_bytes: &[u8]) -> Result<Vec<Hypothesis>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT hypothesis_id, text, ord FROM hypotheses
             WHERE session_id = ?1 ORDER BY ord, rowid",
        )?;

        let hypotheses = stmt
            .query_map(params![id_bytes], |row| {
                let id: String = row.get(0)?;
                let text: String = row.get(1)?;
                let order: i64 = row.get(2)?;
                Ok(Hypothesis::new(id, text, order as u32))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hypotheses)
    }

    fn load_evidence(&self, id_bytes: &[u8]) -> Result<Vec<EvidenceRef>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT evidence_id, title FROM evidence
             WHERE session_id = ?1 ORDER BY position",
        )?;

        let evidence = stmt
            .query_map(params![id_bytes], |row| {
                let id: String = row.get(0)?;
                let title: Option<String> = row.get(1)?;
                Ok(EvidenceRef {
                    id: EvidenceId::new(id),
                    title,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(evidence)
    }
}

impl SessionStore for SqliteStore {
    type Error = StoreError;

    fn create_session(
        &mut self,
        title: &str,
        scale: ScaleType,
        hypotheses: Vec<Hypothesis>,
        evidence: Vec<EvidenceRef>,
    ) -> Result<SessionId, Self::Error> {
        // Build the aggregate first so invalid axes never reach the database.
        let session = AnalysisSession::new(title, scale, hypotheses, evidence)?;
        let id_bytes = Self::session_id_to_bytes(session.id());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO sessions (id, title, scale_type, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![&id_bytes, session.title(), scale.as_str(), session.created_at() as i64],
        )?;

        for h in session.hypotheses() {
            tx.execute(
                "INSERT INTO hypotheses (session_id, hypothesis_id, text, ord) VALUES (?1, ?2, ?3, ?4)",
                params![&id_bytes, h.id.as_str(), &h.text, h.order as i64],
            )?;
        }

        for (position, e) in session.evidence().iter().enumerate() {
            tx.execute(
                "INSERT INTO evidence (session_id, evidence_id, title, position) VALUES (?1, ?2, ?3, ?4)",
                params![&id_bytes, e.id.as_str(), &e.title, position as i64],
            )?;
        }
        tx.commit()?;

        info!(
            session_id = %session.id(),
            hypotheses = session.hypotheses().len(),
            evidence = session.evidence().len(),
            "Created analysis session"
        );
        Ok(session.id())
    }

    fn get_session(&self, id: SessionId) -> Result<Option<AnalysisSession>, Self::Error> {
        let id_bytes = Self::session_id_to_bytes(id);

        let row = self
            .conn
            .query_row(
                "SELECT title, scale_type, created_at FROM sessions WHERE id = ?1",
                params![&id_bytes],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((title, scale, created_at)) = row else {
            return Ok(None);
        };

        let scale = Self::str_to_scale(&scale)?;
        let hypotheses = self.load_hypotheses(&id_bytes)?;
        let evidence = self.load_evidence(&id_bytes)?;
        let mut session =
            AnalysisSession::from_parts(id, title, created_at as u64, scale, hypotheses, evidence)?;

        let mut stmt = self.conn.prepare(
            "SELECT hypothesis_id, evidence_id, value, updated_at FROM scores WHERE session_id = ?1",
        )?;
        let scores = stmt
            .query_map(params![&id_bytes], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (h, e, value, updated_at) in scores {
            let value = i32::try_from(value)
                .map_err(|_| StoreError::InvalidData(format!("Score value {} does not fit i32", value)))?;
            session.restore_score(&HypothesisId::new(h), &EvidenceId::new(e), value, updated_at as u64)?;
        }

        Ok(Some(session))
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.title, s.scale_type, s.created_at,
                    (SELECT COUNT(*) FROM hypotheses h WHERE h.session_id = s.id),
                    (SELECT COUNT(*) FROM evidence e WHERE e.session_id = s.id)
             FROM sessions s ORDER BY s.created_at, s.rowid",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, scale, created_at, hypotheses, evidence)| {
                Ok(SessionSummary {
                    id: Self::bytes_to_session_id(&id)?,
                    title,
                    scale_type: Self::str_to_scale(&scale)?,
                    hypothesis_count: hypotheses as usize,
                    evidence_count: evidence as usize,
                    created_at: created_at as u64,
                })
            })
            .collect()
    }

    fn put_score(
        &mut self,
        id: SessionId,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
    ) -> Result<(), Self::Error> {
        let mut session = self.require_session(id)?;
        session.set_score(hypothesis_id, evidence_id, value)?;

        let updated_at = session
            .matrix()
            .score(hypothesis_id, evidence_id)
            .map(|s| s.updated_at())
            .unwrap_or_default();

        self.conn.execute(
            "INSERT INTO scores (session_id, hypothesis_id, evidence_id, value, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(session_id, hypothesis_id, evidence_id) DO UPDATE SET
             value = excluded.value, updated_at = excluded.updated_at",
            params![
                Self::session_id_to_bytes(id),
                hypothesis_id.as_str(),
                evidence_id.as_str(),
                value,
                updated_at as i64,
            ],
        )?;

        debug!(session_id = %id, %hypothesis_id, %evidence_id, value, "Stored score");
        Ok(())
    }

    fn clear_score(
        &mut self,
        id: SessionId,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
    ) -> Result<bool, Self::Error> {
        self.require_session(id)?;

        let removed = self.conn.execute(
            "DELETE FROM scores WHERE session_id = ?1 AND hypothesis_id = ?2 AND evidence_id = ?3",
            params![Self::session_id_to_bytes(id), hypothesis_id.as_str(), evidence_id.as_str()],
        )?;

        Ok(removed > 0)
    }

    fn change_scale(&mut self, id: SessionId, scale: ScaleType) -> Result<Vec<ScoreKey>, Self::Error> {
        let mut session = self.require_session(id)?;
        let removed: Vec<ScoreKey> = session.change_scale(scale).iter().map(|s| s.key()).collect();
        let id_bytes = Self::session_id_to_bytes(id);

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE sessions SET scale_type = ?2 WHERE id = ?1",
            params![&id_bytes, scale.as_str()],
        )?;
        for key in &removed {
            tx.execute(
                "DELETE FROM scores WHERE session_id = ?1 AND hypothesis_id = ?2 AND evidence_id = ?3",
                params![&id_bytes, key.hypothesis_id.as_str(), key.evidence_id.as_str()],
            )?;
        }
        tx.commit()?;

        if !removed.is_empty() {
            warn!(
                session_id = %id,
                scale = %scale,
                removed = removed.len(),
                "Scale change discarded scores outside the new bounds"
            );
        }
        Ok(removed)
    }

    fn delete_session(&mut self, id: SessionId) -> Result<bool, Self::Error> {
        let id_bytes = Self::session_id_to_bytes(id);

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM scores WHERE session_id = ?1", params![&id_bytes])?;
        tx.execute("DELETE FROM evidence WHERE session_id = ?1", params![&id_bytes])?;
        tx.execute("DELETE FROM hypotheses WHERE session_id = ?1", params![&id_bytes])?;
        let removed = tx.execute("DELETE FROM sessions WHERE id = ?1", params![&id_bytes])?;
        tx.commit()?;

        if removed > 0 {
            info!(session_id = %id, "Deleted analysis session");
        }
        Ok(removed > 0)
    }
}
