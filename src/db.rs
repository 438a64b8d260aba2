// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! MongoDB connection setup and liveness probing.
//!
//! The driver connects lazily: [`connect`] only parses the connection string
//! and builds a client, so a database that is down at startup does not stop
//! the process. Reachability is observed through [`LivenessProbe::ping`].

use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{ClientOptions, ConnectionString},
    Client, Database,
};
use tracing::info;

/// Database used when neither an override nor the URI names one.
pub const DEFAULT_DATABASE: &str = "verdantia";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("invalid MongoDB connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),
    #[error("failed to create MongoDB client: {0}")]
    Client(#[source] mongodb::error::Error),
}

/// Connected client plus the selected logical database.
#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    client: Client,
    database: Database,
}

impl DatabaseHandle {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn name(&self) -> &str {
        self.database.name()
    }
}

/// Pick the database name: explicit override, then the URI path, then
/// [`DEFAULT_DATABASE`].
pub fn resolve_database_name(uri_database: Option<&str>, explicit: Option<&str>) -> String {
    explicit
        .filter(|name| !name.is_empty())
        .or(uri_database.filter(|name| !name.is_empty()))
        .unwrap_or(DEFAULT_DATABASE)
        .to_string()
}

/// Parse `uri` and build a client bound to the resolved database.
///
/// Fails only on a malformed URI or invalid client options; no network
/// round-trip happens here.
pub async fn connect(uri: &str, explicit_db_name: Option<&str>) -> Result<DatabaseHandle, DatabaseError> {
    let connection_string = ConnectionString::parse(uri).map_err(DatabaseError::InvalidUri)?;
    let name = resolve_database_name(
        connection_string.default_database.as_deref(),
        explicit_db_name,
    );

    let options = ClientOptions::parse(connection_string)
        .await
        .map_err(DatabaseError::InvalidUri)?;
    let client = Client::with_options(options).map_err(DatabaseError::Client)?;
    let database = client.database(&name);

    info!(database = %name, "MongoDB client configured");

    Ok(DatabaseHandle { client, database })
}

/// Failure reported by a liveness probe, carrying a readable description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProbeError(pub String);

/// A dependency that can be asked to prove it is reachable.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn ping(&self) -> Result<(), ProbeError>;
}

#[async_trait]
impl LivenessProbe for DatabaseHandle {
    async fn ping(&self) -> Result<(), ProbeError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| ProbeError(e.to_string()))
    }
}
