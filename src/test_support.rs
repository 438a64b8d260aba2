// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::fs;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    response::Response,
};
use tempfile::TempDir;

use crate::config::{Config, CorsPolicy, LogFormat};
use crate::db::{connect, LivenessProbe, ProbeError};
use crate::state::AppState;

/// Simulated database behaviors for the liveness probe.
pub enum FakeProbe {
    Up,
    Refused,
    AuthFailed,
    /// Fails without a description.
    Silent,
    Panics,
    Hangs,
}

#[async_trait]
impl LivenessProbe for FakeProbe {
    async fn ping(&self) -> Result<(), ProbeError> {
        match self {
            FakeProbe::Up => Ok(()),
            FakeProbe::Refused => Err(ProbeError(
                "Server selection timeout: Connection refused (os error 111)".into(),
            )),
            FakeProbe::AuthFailed => Err(ProbeError(
                "Command failed: Authentication failed., code: 18".into(),
            )),
            FakeProbe::Silent => Err(ProbeError(String::new())),
            FakeProbe::Panics => panic!("driver bug"),
            FakeProbe::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

pub fn test_config(temp: &TempDir) -> Config {
    Config {
        mongo_uri: "mongodb://127.0.0.1:1/verdantia_test".to_string(),
        mongo_db: None,
        secret_key: "test-secret".to_string(),
        upload_dir: temp.path().join("uploads"),
        cert_dir: temp.path().join("certs"),
        frontend_dir: temp.path().join("frontend"),
        cors: CorsPolicy::Any,
        host: "127.0.0.1".to_string(),
        port: 0,
        debug: false,
        log_format: LogFormat::Pretty,
        rejected_port: None,
    }
}

/// State rooted in a fresh temp dir, with an empty frontend directory and a
/// database handle that points at a closed port.
pub async fn test_state() -> (AppState, TempDir) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp);
    config.ensure_directories().expect("Failed to create directories");
    fs::create_dir_all(&config.frontend_dir).expect("Failed to create frontend dir");

    let db = connect(&config.mongo_uri, None)
        .await
        .expect("Failed to build database handle");
    (AppState::new(config, db), temp)
}

pub fn get(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
