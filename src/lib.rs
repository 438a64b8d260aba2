// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verdantia Server - API gateway and SPA host
//!
//! One process that mounts the feature modules, serves uploaded files and
//! certificates, reports MongoDB health, and delivers the pre-built frontend
//! with a fallback to its index document.
//!
//! ## Modules
//!
//! - `api` - Router assembly and request dispatch (Axum)
//! - `assets` - Safe path resolution under served directories
//! - `auth` - Access token signing and verification (HS256 JWT)
//! - `config` - Environment configuration
//! - `db` - MongoDB connection and liveness probe
//! - `features` - Feature module registration

pub mod api;
pub mod assets;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod logging;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
