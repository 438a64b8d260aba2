// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::db::{DatabaseHandle, LivenessProbe};

/// Startup context handed to the dispatcher and every feature module.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseHandle,
    pub tokens: Arc<TokenKeys>,
    /// Probe used by `/health`; the database handle unless overridden.
    pub probe: Arc<dyn LivenessProbe>,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseHandle) -> Self {
        let tokens = Arc::new(TokenKeys::from_secret(&config.secret_key));
        Self {
            probe: Arc::new(db.clone()),
            config: Arc::new(config),
            db,
            tokens,
        }
    }

    /// Replace the liveness probe.
    pub fn with_probe(mut self, probe: Arc<dyn LivenessProbe>) -> Self {
        self.probe = probe;
        self
    }
}
