// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration, login and profile lookup.
//!
//! Password hashing and verification are CPU-heavy; callers on the async
//! runtime run `register` and `login` on the blocking pool.

use chrono::Utc;

use crate::auth::{password, AuthError, IssuedToken, TokenCodec};
use crate::error::{ConflictError, NotFoundError, ServiceError, ServiceResult, ValidationError};
use crate::models::{UserId, UserView};
use crate::storage::{DbError, NoteDatabase, StoredUser, UserRepository};

/// A newly created account and its first access token.
#[derive(Debug)]
pub struct Registration {
    pub user: UserView,
    pub token: IssuedToken,
}

/// A successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user_id: UserId,
    pub email: String,
    pub token: IssuedToken,
}

pub struct AccountService<'a> {
    db: &'a NoteDatabase,
    tokens: &'a TokenCodec,
}

/// Trimmed value, or `None` when absent or blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a NoteDatabase, tokens: &'a TokenCodec) -> Self {
        Self { db, tokens }
    }

    /// Create an account and issue its first token.
    ///
    /// Fields are checked in the order name, email, password and the first
    /// missing one is reported.
    pub fn register(
        &self,
        full_name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> ServiceResult<Registration> {
        let full_name = required(full_name).ok_or(ValidationError::MissingFullName)?;
        let email = required(email).ok_or(ValidationError::MissingEmail)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPassword)?;

        let repo = UserRepository::new(self.db);
        if repo.get_by_email(email)?.is_some() {
            tracing::info!(target: "audit", email = %email, "Registration rejected: email taken");
            return Err(ConflictError::DuplicateEmail.into());
        }

        let password_hash = password::hash_password(password).map_err(ServiceError::internal)?;
        let user = StoredUser {
            id: UserId::new(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash,
            created_on: Utc::now(),
        };

        // The pre-check above can race with a concurrent registration; the
        // store's own uniqueness check is authoritative.
        match repo.create(&user) {
            Ok(()) => {}
            Err(DbError::AlreadyExists(_)) => {
                tracing::info!(target: "audit", email = %email, "Registration rejected: email taken");
                return Err(ConflictError::DuplicateEmail.into());
            }
            Err(e) => return Err(e.into()),
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(target: "audit", user_id = %user.id, "Account registered");

        Ok(Registration {
            user: user.to_view(),
            token,
        })
    }

    /// Check credentials and issue a token.
    pub fn login(&self, email: Option<&str>, password: Option<&str>) -> ServiceResult<LoginOutcome> {
        let email = required(email).ok_or(ValidationError::MissingEmail)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPassword)?;

        let Some(user) = UserRepository::new(self.db).get_by_email(email)? else {
            tracing::info!(target: "audit", email = %email, "Login failed: unknown email");
            return Err(AuthError::UserNotFound.into());
        };

        let matches =
            password::verify_password(password, &user.password_hash).map_err(ServiceError::internal)?;
        if !matches {
            tracing::info!(target: "audit", user_id = %user.id, "Login failed: bad credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(target: "audit", user_id = %user.id, "Login succeeded");

        Ok(LoginOutcome {
            user_id: user.id,
            email: user.email,
            token,
        })
    }

    /// Resolve the authenticated caller to their account.
    pub fn current_user(&self, user_id: UserId) -> ServiceResult<UserView> {
        UserRepository::new(self.db)
            .get(user_id)?
            .map(|user| user.to_view())
            .ok_or_else(|| NotFoundError::user().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    #[test]
    fn register_then_login_with_same_credentials() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();

        let registration = accounts
            .register(Some("Alice"), Some("a@x.com"), Some("p1"))
            .unwrap();
        assert_eq!(registration.user.full_name, "Alice");
        assert_eq!(registration.user.email, "a@x.com");

        let verified = state.tokens.verify(&registration.token.token).unwrap();
        assert_eq!(verified.user_id, registration.user.id);

        let login = accounts.login(Some("a@x.com"), Some("p1")).unwrap();
        assert_eq!(login.user_id, registration.user.id);
        assert_eq!(login.email, "a@x.com");
        assert_eq!(
            state.tokens.verify(&login.token.token).unwrap().user_id,
            registration.user.id
        );
    }

    #[test]
    fn register_reports_first_missing_field() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();

        let err = accounts.register(None, None, None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingFullName)));

        let err = accounts.register(Some("Alice"), Some("  "), None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingEmail)));

        let err = accounts
            .register(Some("Alice"), Some("a@x.com"), Some(""))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingPassword)));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();

        let first = accounts
            .register(Some("Alice"), Some("a@x.com"), Some("p1"))
            .unwrap();
        let err = accounts
            .register(Some("Other"), Some("a@x.com"), Some("p2"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ConflictError::DuplicateEmail)));

        // The original credential still works, the second one never did.
        assert_eq!(
            accounts.login(Some("a@x.com"), Some("p1")).unwrap().user_id,
            first.user.id
        );
        assert!(accounts.login(Some("a@x.com"), Some("p2")).is_err());
    }

    #[test]
    fn email_is_trimmed() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();

        accounts
            .register(Some("Alice"), Some(" a@x.com "), Some("p1"))
            .unwrap();
        assert!(accounts.login(Some("a@x.com"), Some("p1")).is_ok());
    }

    #[test]
    fn login_failures_are_distinguished() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();
        accounts
            .register(Some("Alice"), Some("a@x.com"), Some("p1"))
            .unwrap();

        let err = accounts.login(Some("b@x.com"), Some("p1")).unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::UserNotFound)));

        let err = accounts.login(Some("a@x.com"), Some("wrong")).unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::InvalidCredentials)));

        let err = accounts.login(None, Some("p1")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingEmail)));

        let err = accounts.login(Some("a@x.com"), None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingPassword)));
    }

    #[test]
    fn current_user_resolves_registered_account() {
        let (state, _dir) = test_state();
        let accounts = state.accounts();
        let registration = accounts
            .register(Some("Alice"), Some("a@x.com"), Some("p1"))
            .unwrap();

        assert_eq!(
            accounts.current_user(registration.user.id).unwrap(),
            registration.user
        );

        let err = accounts.current_user(UserId::new()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
