// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of token carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by tokens signed with the server secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued directly from a credential check rather than a refresh
    #[serde(default)]
    pub fresh: bool,
}

/// Authenticated user information extracted from a verified access token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User ID (`sub` claim)
    pub user_id: String,
    /// Token ID (`jti` claim)
    #[serde(skip)]
    pub token_id: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
    /// Whether the token is fresh
    pub fresh: bool,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            token_id: claims.jti,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
            fresh: claims.fresh,
        }
    }
}
