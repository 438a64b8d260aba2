// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Feature Modules
//!
//! Each module owns every path under its prefix. It is constructed with the
//! shared [`AppState`] and returns a router whose paths are relative to the
//! prefix. Modules that register the same prefix are merged into one mount.
//!
//! | Module | Prefix |
//! |--------|--------|
//! | auth | `/api/auth` |
//! | recommendation | `/api` |
//! | compliance | `/api` |
//! | gamification | `/api` |

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod external;

pub use auth::AuthModule;
pub use external::ExternalModule;

/// Registration contract for a set of handlers mounted at a fixed prefix.
pub trait FeatureModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Mount point, e.g. `/api/auth`. No trailing slash.
    fn prefix(&self) -> &'static str;

    fn router(&self, state: &AppState) -> Router<AppState>;
}

/// Modules mounted by the server binary, in precedence order.
pub fn default_modules() -> Vec<Box<dyn FeatureModule>> {
    vec![
        Box::new(AuthModule),
        Box::new(ExternalModule::new("recommendation", "/api")),
        Box::new(ExternalModule::new("compliance", "/api")),
        Box::new(ExternalModule::new("gamification", "/api")),
    ]
}
