// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the notes API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in and receives an access token (HS256 JWT)
//! 2. Client sends `Authorization: Bearer <token>` on every protected request
//! 3. Server:
//!    - Verifies signature and expiry with the process-wide secret
//!    - Extracts `sub` → canonical `user_id`
//!    - Hands the identity to the handler via the `Auth` extractor
//!
//! ## Security
//!
//! - All note and profile endpoints require authentication
//! - Tokens carry only the user id; no profile snapshot
//! - Passwords are stored as salted Argon2id hashes
//! - No clock skew tolerance on expiry

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::{IssuedToken, TokenCodec};
