// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are stored as JSON under their id, with a unique email index next to
//! them. The index entry and the record are written in the same transaction.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::super::database::{id_bytes, NoteDatabase, USERS, USER_EMAILS};
use super::super::{DbError, DbResult};
use crate::models::{UserId, UserView};

/// User record as persisted, credential included.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_on: DateTime<Utc>,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("created_on", &self.created_on)
            .finish_non_exhaustive()
    }
}

impl StoredUser {
    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            created_on: self.created_on,
        }
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a NoteDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a NoteDatabase) -> Self {
        Self { db }
    }

    /// Insert a new user.
    ///
    /// Fails with `DbError::AlreadyExists` if the email is taken; in that
    /// case nothing is written.
    pub fn create(&self, user: &StoredUser) -> DbResult<()> {
        let json = serde_json::to_vec(user)?;
        let write_txn = self.db.inner().begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(user.email.as_str())?.is_some() {
                return Err(DbError::AlreadyExists(format!("User {}", user.email)));
            }
            emails.insert(user.email.as_str(), user.id.as_bytes().as_slice())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_bytes().as_slice(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by id.
    pub fn get(&self, user_id: UserId) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id.as_bytes().as_slice())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a user by exact email.
    pub fn get_by_email(&self, email: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let Some(id) = emails.get(email)? else {
            return Ok(None);
        };
        let id = id_bytes(id.value())?;

        let users = read_txn.open_table(USERS)?;
        match users.get(id.as_slice())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Err(DbError::Corrupt(format!(
                "email index points at missing user {}",
                uuid::Uuid::from_bytes(id)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::temp_db;

    fn sample_user(email: &str) -> StoredUser {
        StoredUser {
            id: UserId::new(),
            full_name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            created_on: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let user = sample_user("a@x.com");
        repo.create(&user).unwrap();

        assert_eq!(repo.get(user.id).unwrap(), Some(user.clone()));
        assert_eq!(repo.get_by_email("a@x.com").unwrap(), Some(user));
    }

    #[test]
    fn duplicate_email_is_rejected_without_second_record() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let first = sample_user("a@x.com");
        repo.create(&first).unwrap();

        let second = sample_user("a@x.com");
        let result = repo.create(&second);
        assert!(matches!(result, Err(DbError::AlreadyExists(_))));

        assert!(repo.get(second.id).unwrap().is_none());
        assert_eq!(repo.get_by_email("a@x.com").unwrap().unwrap().id, first.id);
    }

    #[test]
    fn email_lookup_is_exact() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        repo.create(&sample_user("a@x.com")).unwrap();

        assert!(repo.get_by_email("A@x.com").unwrap().is_none());
        assert!(repo.get_by_email("b@x.com").unwrap().is_none());
    }

    #[test]
    fn unknown_user_id_returns_none() {
        let (db, _dir) = temp_db();
        assert!(UserRepository::new(&db).get(UserId::new()).unwrap().is_none());
    }

    #[test]
    fn view_and_debug_omit_password_hash() {
        let user = sample_user("a@x.com");
        let view = serde_json::to_value(user.to_view()).unwrap();
        assert!(view.get("passwordHash").is_none());
        assert!(!format!("{user:?}").contains("argon2id"));
    }
}
