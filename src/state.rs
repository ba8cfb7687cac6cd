// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::service::{AccountService, NoteService, SearchService};
use crate::storage::NoteDatabase;

/// Process-wide state shared by every request.
///
/// Both members are created before the server starts accepting connections
/// and live until it has shut down.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<NoteDatabase>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: NoteDatabase, tokens: TokenCodec) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.db, &self.tokens)
    }

    pub fn notes(&self) -> NoteService<'_> {
        NoteService::new(&self.db)
    }

    pub fn search(&self) -> SearchService<'_> {
        SearchService::new(&self.db)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use super::AppState;
    use crate::auth::TokenCodec;
    use crate::storage::test_support::temp_db;

    pub const TEST_SECRET: &[u8] = b"test-secret-with-at-least-32-bytes!!";

    /// State over a throwaway database and a fixed signing key.
    pub fn test_state() -> (AppState, tempfile::TempDir) {
        let (db, dir) = temp_db();
        let tokens = TokenCodec::new(TEST_SECRET, Duration::from_secs(36_000 * 60));
        (AppState::new(db, tokens), dir)
    }
}
