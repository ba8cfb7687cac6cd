// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Note use-case service.
//!
//! # Invariants
//! - Every operation is scoped to the authenticated owner; a note held by
//!   someone else is reported exactly like a missing one.
//! - Owner, id and creation time are stamped here, never taken from input.
//! - Listing is pinned first, insertion order otherwise.

use crate::error::{NotFoundError, ServiceResult, ValidationError};
use crate::models::{EditNoteRequest, Note, NoteId, UserId};
use crate::storage::{NoteDatabase, NoteRepository, StoredNote};

pub struct NoteService<'a> {
    db: &'a NoteDatabase,
}

/// Text field that was supplied with a non-empty value.
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl<'a> NoteService<'a> {
    pub fn new(db: &'a NoteDatabase) -> Self {
        Self { db }
    }

    fn repo(&self) -> NoteRepository<'a> {
        NoteRepository::new(self.db)
    }

    /// Create a note for `owner`. Title is checked before content.
    pub fn add(
        &self,
        owner: UserId,
        title: Option<String>,
        content: Option<String>,
        tags: Option<Vec<String>>,
    ) -> ServiceResult<Note> {
        let title = supplied(title).ok_or(ValidationError::MissingTitle)?;
        let content = supplied(content).ok_or(ValidationError::MissingContent)?;

        let note = StoredNote::new(owner, title, content, tags.unwrap_or_default());
        let note = self.repo().insert(note)?;
        tracing::debug!(user_id = %owner, note_id = %note.id, "Note added");
        Ok(note.to_note())
    }

    /// Overwrite the supplied fields of an owned note.
    ///
    /// Empty title or content count as not supplied. An explicit tag list,
    /// even an empty one, replaces the tags.
    pub fn edit(&self, owner: UserId, note_id: &str, changes: EditNoteRequest) -> ServiceResult<Note> {
        let title = supplied(changes.title);
        let content = supplied(changes.content);
        let EditNoteRequest { tags, is_pinned, .. } = changes;

        if title.is_none() && content.is_none() && tags.is_none() && is_pinned.is_none() {
            return Err(ValidationError::NoChanges.into());
        }

        let note_id = NoteId::parse(note_id).ok_or(NotFoundError::note())?;
        let updated = self.repo().update_owned(owner, note_id, |note| {
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = content {
                note.content = content;
            }
            if let Some(tags) = tags {
                note.tags = tags;
            }
            if let Some(is_pinned) = is_pinned {
                note.is_pinned = is_pinned;
            }
        })?;

        updated
            .map(|note| note.to_note())
            .ok_or_else(|| NotFoundError::note().into())
    }

    /// Set the pin flag of an owned note. An absent flag unpins.
    pub fn set_pinned(
        &self,
        owner: UserId,
        note_id: &str,
        is_pinned: Option<bool>,
    ) -> ServiceResult<Note> {
        let is_pinned = is_pinned.unwrap_or(false);
        let note_id = NoteId::parse(note_id).ok_or(NotFoundError::note())?;

        self.repo()
            .update_owned(owner, note_id, |note| note.is_pinned = is_pinned)?
            .map(|note| note.to_note())
            .ok_or_else(|| NotFoundError::note().into())
    }

    /// Remove an owned note.
    pub fn delete(&self, owner: UserId, note_id: &str) -> ServiceResult<()> {
        let note_id = NoteId::parse(note_id).ok_or(NotFoundError::note())?;
        match self.repo().delete_owned(owner, note_id)? {
            Some(_) => {
                tracing::debug!(user_id = %owner, note_id = %note_id, "Note deleted");
                Ok(())
            }
            None => Err(NotFoundError::note().into()),
        }
    }

    /// All notes of `owner`, pinned first.
    pub fn list(&self, owner: UserId) -> ServiceResult<Vec<Note>> {
        let mut notes = self.repo().list_by_owner(owner)?;
        // Stable: insertion order is kept within each pin group.
        notes.sort_by_key(|note| !note.is_pinned);
        Ok(notes.iter().map(StoredNote::to_note).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::state::test_support::test_state;

    fn add(service: &NoteService<'_>, owner: UserId, title: &str, content: &str) -> Note {
        service
            .add(owner, Some(title.into()), Some(content.into()), None)
            .unwrap()
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn add_stamps_owner_and_defaults() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();

        let note = add(&service, owner, "T", "C");
        assert_eq!(note.user_id, owner);
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned);

        let tagged = service
            .add(owner, Some("T".into()), Some("C".into()), Some(vec!["x".into(), "y".into()]))
            .unwrap();
        assert_eq!(tagged.tags, ["x", "y"]);
    }

    #[test]
    fn add_requires_title_then_content() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();

        let err = service.add(owner, None, None, None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingTitle)));

        let err = service.add(owner, Some("T".into()), Some(String::new()), None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingContent)));

        assert!(service.list(owner).unwrap().is_empty());
    }

    #[test]
    fn edit_changes_only_supplied_fields() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = add(&service, owner, "T", "C");

        let edited = service
            .edit(
                owner,
                &note.id.to_string(),
                EditNoteRequest {
                    title: Some("T2".into()),
                    content: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(edited.title, "T2");
        assert_eq!(edited.content, "C");
        assert_eq!(edited.id, note.id);
        assert_eq!(edited.created_on, note.created_on);
    }

    #[test]
    fn edit_with_nothing_supplied_is_rejected() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = add(&service, owner, "T", "C");

        let err = service
            .edit(
                owner,
                &note.id.to_string(),
                EditNoteRequest {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::NoChanges)));
    }

    #[test]
    fn edit_with_empty_tag_list_clears_tags() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = service
            .add(owner, Some("T".into()), Some("C".into()), Some(vec!["x".into()]))
            .unwrap();

        let edited = service
            .edit(
                owner,
                &note.id.to_string(),
                EditNoteRequest {
                    tags: Some(vec![]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(edited.tags.is_empty());
    }

    #[test]
    fn edit_can_pin() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = add(&service, owner, "T", "C");

        let edited = service
            .edit(
                owner,
                &note.id.to_string(),
                EditNoteRequest {
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(edited.is_pinned);
    }

    #[test]
    fn other_owner_sees_not_found_everywhere() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let intruder = UserId::new();
        let note = add(&service, owner, "T", "C");
        let id = note.id.to_string();

        let edit = service.edit(
            intruder,
            &id,
            EditNoteRequest {
                title: Some("X".into()),
                ..Default::default()
            },
        );
        assert!(matches!(edit, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.set_pinned(intruder, &id, Some(true)),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.delete(intruder, &id), Err(ServiceError::NotFound(_))));
        assert!(service.list(intruder).unwrap().is_empty());

        // Untouched for the real owner.
        assert_eq!(service.list(owner).unwrap(), vec![note]);
    }

    #[test]
    fn malformed_and_unknown_ids_are_not_found() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();

        assert!(matches!(service.delete(owner, "abc"), Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.set_pinned(owner, &NoteId::new().to_string(), Some(true)),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn set_pinned_with_absent_flag_unpins() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = add(&service, owner, "T", "C");
        let id = note.id.to_string();

        assert!(service.set_pinned(owner, &id, Some(true)).unwrap().is_pinned);
        assert!(!service.set_pinned(owner, &id, None).unwrap().is_pinned);
    }

    #[test]
    fn delete_removes_note_once() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();
        let note = add(&service, owner, "T", "C");
        let id = note.id.to_string();

        service.delete(owner, &id).unwrap();
        assert!(service.list(owner).unwrap().is_empty());
        assert!(matches!(service.delete(owner, &id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn pinned_note_outranks_later_note_until_deleted() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();

        let first = add(&service, owner, "first", "x");
        assert!(!first.is_pinned);
        service.set_pinned(owner, &first.id.to_string(), Some(true)).unwrap();
        add(&service, owner, "later", "x");

        assert_eq!(titles(&service.list(owner).unwrap()), ["first", "later"]);

        service.delete(owner, &first.id.to_string()).unwrap();
        let err = service
            .edit(
                owner,
                &first.id.to_string(),
                EditNoteRequest {
                    title: Some("again".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn list_puts_pinned_first_and_keeps_insertion_order() {
        let (state, _dir) = test_state();
        let service = state.notes();
        let owner = UserId::new();

        let notes: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|t| add(&service, owner, t, "x"))
            .collect();
        service.set_pinned(owner, &notes[3].id.to_string(), Some(true)).unwrap();
        service.set_pinned(owner, &notes[1].id.to_string(), Some(true)).unwrap();

        let listed = service.list(owner).unwrap();
        assert_eq!(titles(&listed), ["b", "d", "a", "c"]);
    }
}
