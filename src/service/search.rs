// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Case-insensitive literal search over the caller's notes.
//!
//! The query is matched as plain text after Unicode lowercasing, so pattern
//! metacharacters carry no meaning.

use crate::error::{ServiceResult, ValidationError};
use crate::models::{Note, UserId};
use crate::storage::{NoteDatabase, NoteRepository, StoredNote};

pub struct SearchService<'a> {
    db: &'a NoteDatabase,
}

impl<'a> SearchService<'a> {
    pub fn new(db: &'a NoteDatabase) -> Self {
        Self { db }
    }

    /// Notes of `owner` whose title or content contains `query`, in insertion
    /// order.
    pub fn search(&self, owner: UserId, query: &str) -> ServiceResult<Vec<Note>> {
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        let needle = query.to_lowercase();

        let matches = NoteRepository::new(self.db)
            .list_by_owner(owner)?
            .iter()
            .filter(|note| matches_note(note, &needle))
            .map(StoredNote::to_note)
            .collect();
        Ok(matches)
    }
}

fn matches_note(note: &StoredNote, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}
