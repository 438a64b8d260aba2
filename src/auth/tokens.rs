// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token signing and verification with the configured secret key.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::claims::{TokenClaims, TokenType};
use super::{AuthError, AuthenticatedUser};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Default lifetime of an access token, in minutes.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Signing and verification keys derived from the secret key.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `subject` valid for `ttl`.
    pub fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        fresh: bool,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            nbf: now,
            exp: now + ttl.num_seconds(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            fresh,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Sign a fresh access token with the default lifetime.
    pub fn issue_access(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(
            subject,
            TokenType::Access,
            true,
            Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        )
    }

    /// Verify signature and time claims and return the claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        Ok(decode::<TokenClaims>(token, &self.decoding, &self.validation)?.claims)
    }

    /// Verify an access token and return the user it identifies.
    pub fn verify_access(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode(token)?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }
        Ok(AuthenticatedUser::from_claims(claims))
    }
}
