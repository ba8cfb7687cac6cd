// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::models::UserId;

/// Claims carried by an access token.
///
/// Only the stable user id is embedded. Profile data (name, email) is
/// resolved from the credential store whenever it is needed, so a token never
/// holds a stale copy of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Caller identity resolved from a verified token.
///
/// This is the primary type handlers receive to know who is calling. It is
/// never built from request bodies or query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim)
    pub user_id: UserId,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    ///
    /// A `sub` that is not a user id means the token was not issued by this
    /// service.
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let user_id = UserId::parse(&claims.sub).ok_or(AuthError::Malformed)?;
        Ok(Self {
            user_id,
            expires_at: claims.exp,
        })
    }
}
