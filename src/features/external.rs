// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mount point for a module whose handlers are maintained outside this crate.

use axum::Router;

use super::FeatureModule;
use crate::state::AppState;

/// Reserves `prefix` for `name`. Until handlers are attached, every request
/// under the prefix gets the module-level JSON 404.
#[derive(Debug, Clone)]
pub struct ExternalModule {
    name: &'static str,
    prefix: &'static str,
}

impl ExternalModule {
    pub fn new(name: &'static str, prefix: &'static str) -> Self {
        Self { name, prefix }
    }
}

impl FeatureModule for ExternalModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn router(&self, _state: &AppState) -> Router<AppState> {
        Router::new()
    }
}
