// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the note database.
//!
//! Each repository provides the operations for a specific entity type and
//! owns the transaction boundaries for them.

pub mod notes;
pub mod users;

pub use notes::{NoteRepository, StoredNote};
pub use users::{StoredUser, UserRepository};
