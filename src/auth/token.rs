// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification (HS256 JWT).
//!
//! Verification is pure: it checks the signature and the expiration instant
//! and never consults the store. A token therefore stays valid until it
//! expires; there is no revocation path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ring::rand::{SecureRandom, SystemRandom};

use super::claims::{AuthenticatedUser, TokenClaims};
use super::AuthError;
use crate::models::UserId;

/// Length of a generated signing key.
const EPHEMERAL_SECRET_LEN: usize = 32;

/// A freshly signed token and its expiration instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with a process-wide secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from a shared secret and a validity window.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token is expired as soon as `exp` has passed.
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Create a codec with a random key.
    ///
    /// Tokens signed by it do not survive a process restart.
    pub fn ephemeral(ttl: Duration) -> Result<Self, AuthError> {
        let mut secret = [0u8; EPHEMERAL_SECRET_LEN];
        SystemRandom::new()
            .fill(&mut secret)
            .map_err(|_| AuthError::Signing("system random source unavailable".to_string()))?;
        Ok(Self::new(&secret, ttl))
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current instant were `now`.
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Signing(format!("invalid token lifetime: {e}")))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and resolve the caller identity.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            }
        })?;

        AuthenticatedUser::from_claims(data.claims)
    }
}
