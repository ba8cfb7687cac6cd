// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notes Server - Personal Note-Taking Service
//!
//! Users register, authenticate with a bearer token, and manage short text
//! notes that are visible only to their own account.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance/verification, password hashing, request guard
//! - `service` - Account, note and search use-cases
//! - `storage` - Embedded redb database and repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;
