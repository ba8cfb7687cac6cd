// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded note database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id (16 bytes) → serialized StoredUser
//! - `user_emails`: email → user_id (16 bytes)
//! - `notes`: composite key (owner_id|note_id) → serialized StoredNote
//! - `note_order`: composite key (owner_id|seq_be) → note_id (16 bytes)
//! - `meta`: key → u64 counter (e.g. "note_seq")
//!
//! Notes are keyed by owner first, so a lookup for (owner, id) is a single
//! key read that can only ever hit the caller's own record.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary user table: user_id bytes → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("users");

/// Unique index: email → user_id bytes.
pub(crate) const USER_EMAILS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_emails");

/// Primary note table: `owner_id | note_id` → serialized StoredNote (JSON bytes).
pub(crate) const NOTES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("notes");

/// Insertion-order index: `owner_id | seq_be` → note_id bytes.
pub(crate) const NOTE_ORDER: TableDefinition<&[u8], &[u8]> = TableDefinition::new("note_order");

/// Counters: key → u64.
pub(crate) const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

pub(crate) const NOTE_SEQ_KEY: &str = "note_seq";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Key Helpers
// =============================================================================

/// Build the primary key of a note: `owner_id | note_id` (32 bytes).
pub(crate) fn note_key(owner: &[u8; 16], note_id: &[u8; 16]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(owner);
    key[16..].copy_from_slice(note_id);
    key
}

/// Build an order-index key: `owner_id | seq_be` (24 bytes).
///
/// Big-endian sequence numbers sort in insertion order on a forward scan.
pub(crate) fn order_key(owner: &[u8; 16], seq: u64) -> [u8; 24] {
    let mut key = [0u8; 24];
    key[..16].copy_from_slice(owner);
    key[16..].copy_from_slice(&seq.to_be_bytes());
    key
}

/// Inclusive bounds covering every order-index entry of one owner.
pub(crate) fn order_range(owner: &[u8; 16]) -> ([u8; 24], [u8; 24]) {
    (order_key(owner, 0), order_key(owner, u64::MAX))
}

/// Decode a 16-byte identifier stored as a table value.
pub(crate) fn id_bytes(value: &[u8]) -> DbResult<[u8; 16]> {
    value
        .try_into()
        .map_err(|_| DbError::Corrupt(format!("expected 16-byte id, got {} bytes", value.len())))
}

// =============================================================================
// NoteDatabase
// =============================================================================

/// Embedded ACID database holding users and notes.
///
/// Opened once at startup and shared by every request; dropping it closes
/// the file.
pub struct NoteDatabase {
    db: Database,
}

impl NoteDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(NOTES)?;
            let _ = write_txn.open_table(NOTE_ORDER)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Note database opened");
        Ok(Self { db })
    }

    pub(crate) fn inner(&self) -> &Database {
        &self.db
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(META)?;
        Ok(())
    }
}

impl std::fmt::Debug for NoteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteDatabase").finish_non_exhaustive()
    }
}

impl Drop for NoteDatabase {
    fn drop(&mut self) {
        tracing::info!("Note database closed");
    }
}

// =============================================================================
// Tests
// =============================================================================
