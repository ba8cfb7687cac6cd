// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Durable storage for accounts and notes, kept in a single embedded redb
//! file under the configured data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   notes.redb
//!     users        user_id → StoredUser (JSON)
//!     user_emails  email → user_id
//!     notes        owner_id|note_id → StoredNote (JSON)
//!     note_order   owner_id|seq → note_id
//!     meta         "note_seq" → u64
//! ```
//!
//! Repositories borrow the database and expose typed operations; every write
//! that touches more than one table commits in one transaction.

pub mod database;
pub mod repository;

pub use database::{DbError, DbResult, NoteDatabase};
pub use repository::{NoteRepository, StoredNote, StoredUser, UserRepository};
