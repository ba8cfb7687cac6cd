// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Note repository.
//!
//! Every operation takes the owner next to the note id. Records live under
//! `owner_id | note_id`, so a note belonging to someone else is simply not
//! found. Each note also has an entry in the owner's order index carrying its
//! insertion sequence.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::super::database::{
    id_bytes, note_key, order_key, order_range, NoteDatabase, META, NOTES, NOTE_ORDER,
    NOTE_SEQ_KEY,
};
use super::super::{DbError, DbResult};
use crate::models::{Note, NoteId, UserId};

/// Note record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredNote {
    /// Insertion sequence, assigned by [`NoteRepository::insert`].
    pub seq: u64,
    pub id: NoteId,
    pub owner: UserId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub created_on: DateTime<Utc>,
}

impl StoredNote {
    /// A fresh unpinned note, not yet sequenced.
    pub fn new(owner: UserId, title: String, content: String, tags: Vec<String>) -> Self {
        Self {
            seq: 0,
            id: NoteId::new(),
            owner,
            title,
            content,
            tags,
            is_pinned: false,
            created_on: Utc::now(),
        }
    }

    pub fn to_note(&self) -> Note {
        Note {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags.clone(),
            user_id: self.owner,
            is_pinned: self.is_pinned,
            created_on: self.created_on,
        }
    }
}

/// Repository for note operations.
pub struct NoteRepository<'a> {
    db: &'a NoteDatabase,
}

impl<'a> NoteRepository<'a> {
    pub fn new(db: &'a NoteDatabase) -> Self {
        Self { db }
    }

    /// Persist a new note, assigning the next insertion sequence.
    pub fn insert(&self, mut note: StoredNote) -> DbResult<StoredNote> {
        let owner = *note.owner.as_bytes();
        let id = *note.id.as_bytes();

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut meta = write_txn.open_table(META)?;
            let seq = meta.get(NOTE_SEQ_KEY)?.map(|v| v.value()).unwrap_or(0) + 1;
            meta.insert(NOTE_SEQ_KEY, seq)?;
            note.seq = seq;

            let mut notes = write_txn.open_table(NOTES)?;
            let key = note_key(&owner, &id);
            if notes.get(key.as_slice())?.is_some() {
                return Err(DbError::AlreadyExists(format!("Note {}", note.id)));
            }
            let json = serde_json::to_vec(&note)?;
            notes.insert(key.as_slice(), json.as_slice())?;

            let mut order = write_txn.open_table(NOTE_ORDER)?;
            order.insert(order_key(&owner, seq).as_slice(), id.as_slice())?;
        }
        write_txn.commit()?;
        Ok(note)
    }

    /// Get a note by id if the owner holds it.
    pub fn find_owned(&self, owner: UserId, note_id: NoteId) -> DbResult<Option<StoredNote>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(NOTES)?;
        let key = note_key(owner.as_bytes(), note_id.as_bytes());
        match table.get(key.as_slice())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write a note the owner holds, in one transaction.
    ///
    /// Returns the updated record, or `None` if the owner holds no such note.
    /// `update` must not change the id, owner or sequence.
    pub fn update_owned<F>(
        &self,
        owner: UserId,
        note_id: NoteId,
        update: F,
    ) -> DbResult<Option<StoredNote>>
    where
        F: FnOnce(&mut StoredNote),
    {
        let key = note_key(owner.as_bytes(), note_id.as_bytes());
        let write_txn = self.db.inner().begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(NOTES)?;
            let existing = match table.get(key.as_slice())? {
                Some(value) => value.value().to_vec(),
                None => return Ok(None),
            };

            let mut note: StoredNote = serde_json::from_slice(&existing)?;
            let (seq, id, note_owner) = (note.seq, note.id, note.owner);
            update(&mut note);
            note.seq = seq;
            note.id = id;
            note.owner = note_owner;

            let json = serde_json::to_vec(&note)?;
            table.insert(key.as_slice(), json.as_slice())?;
            note
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Remove a note the owner holds, together with its order entry.
    ///
    /// Returns the removed record, or `None` if the owner holds no such note.
    pub fn delete_owned(&self, owner: UserId, note_id: NoteId) -> DbResult<Option<StoredNote>> {
        let owner_bytes = *owner.as_bytes();
        let key = note_key(&owner_bytes, note_id.as_bytes());
        let write_txn = self.db.inner().begin_write()?;
        let removed = {
            let mut notes = write_txn.open_table(NOTES)?;
            let removed: StoredNote = match notes.remove(key.as_slice())? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Ok(None),
            };

            let mut order = write_txn.open_table(NOTE_ORDER)?;
            order.remove(order_key(&owner_bytes, removed.seq).as_slice())?;
            removed
        };
        write_txn.commit()?;
        Ok(Some(removed))
    }

    /// All notes of one owner, in insertion order.
    pub fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<StoredNote>> {
        let owner_bytes = *owner.as_bytes();
        let (start, end) = order_range(&owner_bytes);

        let read_txn = self.db.inner().begin_read()?;
        let order = read_txn.open_table(NOTE_ORDER)?;
        let notes = read_txn.open_table(NOTES)?;

        let mut result = Vec::new();
        for entry in order.range(start.as_slice()..=end.as_slice())? {
            let (_, id) = entry?;
            let id = id_bytes(id.value())?;
            let key = note_key(&owner_bytes, &id);
            match notes.get(key.as_slice())? {
                Some(value) => result.push(serde_json::from_slice(value.value())?),
                None => {
                    return Err(DbError::Corrupt(format!(
                        "order index points at missing note {}",
                        uuid::Uuid::from_bytes(id)
                    )))
                }
            }
        }
        Ok(result)
    }
}
