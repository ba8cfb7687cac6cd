// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Use-case services between the HTTP handlers and storage.
//!
//! Services are short-lived views over the shared database (and, for
//! accounts, the token codec). They validate input, enforce ownership and
//! return [`crate::error::ServiceError`] on failure.

pub mod accounts;
pub mod notes;
pub mod search;

pub use accounts::{AccountService, LoginOutcome, Registration};
pub use notes::NoteService;
pub use search::SearchService;
