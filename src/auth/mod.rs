// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Access tokens are HS256 JWTs signed with `JWT_SECRET_KEY`.
//!
//! ## Auth Flow
//!
//! 1. The auth feature module issues tokens with [`TokenKeys::issue_access`]
//! 2. The frontend sends `Authorization: Bearer <token>`
//! 3. Handlers taking the [`Auth`] extractor get the verified user or a 401
//!
//! Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod tokens;

pub use claims::{AuthenticatedUser, TokenClaims, TokenType};
pub use error::AuthError;
pub use extractor::Auth;
pub use tokens::TokenKeys;
