// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Settings are read from the environment once at startup into an immutable
//! [`Config`]. A `.env` file in the working directory is loaded first when
//! present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MONGO_URI` | MongoDB connection string | `mongodb://localhost:27017/verdantia` |
//! | `MONGO_DB` | Database name override | URI database, then `verdantia` |
//! | `JWT_SECRET_KEY` | HS256 signing secret for access tokens | `dev-secret-change-me` |
//! | `UPLOAD_DIR` | Directory served under `/uploads` | `uploads` |
//! | `CERT_DIR` | Directory served under `/certs` | `certs` |
//! | `FRONTEND_DIR` | Built SPA bundle | `<cwd>/frontend/dist` |
//! | `CORS_ORIGINS` | `*` or comma-separated origins | `*` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DEBUG` | `true` enables debug mode (`FLASK_DEBUG` is read when unset) | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

pub const MONGO_URI_ENV: &str = "MONGO_URI";
pub const MONGO_DB_ENV: &str = "MONGO_DB";
pub const SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";
pub const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
pub const CERT_DIR_ENV: &str = "CERT_DIR";
pub const FRONTEND_DIR_ENV: &str = "FRONTEND_DIR";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEBUG_ENV: &str = "DEBUG";
/// Older deployments set this instead of `DEBUG`.
pub const FLASK_DEBUG_ENV: &str = "FLASK_DEBUG";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/verdantia";
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_CERT_DIR: &str = "certs";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Sentinel accepted by `CORS_ORIGINS` to allow every origin.
const CORS_WILDCARD: &str = "*";

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Cross-origin policy parsed from `CORS_ORIGINS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin is accepted.
    Any,
    /// Only these origins, in configured order.
    List(Vec<String>),
}

impl CorsPolicy {
    /// Parse the raw setting. `*` is the wildcard; anything else is a
    /// comma-separated list with blank entries dropped.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == CORS_WILDCARD {
            return CorsPolicy::Any;
        }

        CorsPolicy::List(
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_db: Option<String>,
    pub secret_key: String,
    pub upload_dir: PathBuf,
    pub cert_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub cors: CorsPolicy,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub log_format: LogFormat,
    /// Raw `PORT` value that failed to parse and was replaced by the default.
    pub rejected_port: Option<String>,
}

impl Config {
    /// Read the process environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let (port, rejected_port) = match get(PORT_ENV) {
            Some(raw) => match raw.trim().parse() {
                Ok(port) => (port, None),
                Err(_) => (DEFAULT_PORT, Some(raw)),
            },
            None => (DEFAULT_PORT, None),
        };

        Self {
            mongo_uri: or(MONGO_URI_ENV, DEFAULT_MONGO_URI),
            mongo_db: get(MONGO_DB_ENV),
            secret_key: or(SECRET_KEY_ENV, DEFAULT_SECRET_KEY),
            upload_dir: PathBuf::from(or(UPLOAD_DIR_ENV, DEFAULT_UPLOAD_DIR)),
            cert_dir: PathBuf::from(or(CERT_DIR_ENV, DEFAULT_CERT_DIR)),
            frontend_dir: get(FRONTEND_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_frontend_dir),
            cors: CorsPolicy::parse(&or(CORS_ORIGINS_ENV, CORS_WILDCARD)),
            host: or(HOST_ENV, DEFAULT_HOST),
            port,
            debug: get(DEBUG_ENV)
                .or_else(|| get(FLASK_DEBUG_ENV))
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_format: get(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            rejected_port,
        }
    }

    /// Report settings that were replaced by defaults. Call once logging is
    /// installed.
    pub fn log_warnings(&self) {
        if let Some(raw) = &self.rejected_port {
            warn!(value = %raw, default = DEFAULT_PORT, "Invalid PORT, using default");
        }
    }

    /// Create the upload and certificate directories if they are missing.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        ensure_dir(&self.upload_dir)?;
        ensure_dir(&self.cert_dir)
    }
}

fn default_frontend_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_default()
        .join("frontend")
        .join("dist")
}

/// Create `path` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.mongo_uri, DEFAULT_MONGO_URI);
        assert_eq!(config.mongo_db, None);
        assert_eq!(config.secret_key, DEFAULT_SECRET_KEY);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.cert_dir, PathBuf::from("certs"));
        assert!(config.frontend_dir.ends_with("frontend/dist"));
        assert_eq!(config.cors, CorsPolicy::Any);
        assert_eq!(config.port, 5000);
        assert!(!config.debug);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = config_from(&[(MONGO_DB_ENV, ""), (UPLOAD_DIR_ENV, ""), (PORT_ENV, "")]);
        assert_eq!(config.mongo_db, None);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            (MONGO_URI_ENV, "mongodb://db:27017"),
            (MONGO_DB_ENV, "inventory"),
            (SECRET_KEY_ENV, "s3cret"),
            (FRONTEND_DIR_ENV, "/srv/app"),
            (PORT_ENV, "8081"),
            (DEBUG_ENV, "TRUE"),
            (LOG_FORMAT_ENV, "json"),
        ]);
        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.mongo_db.as_deref(), Some("inventory"));
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.frontend_dir, PathBuf::from("/srv/app"));
        assert_eq!(config.port, 8081);
        assert!(config.debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_port_uses_default() {
        let config = config_from(&[(PORT_ENV, "eighty")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.rejected_port.as_deref(), Some("eighty"));
    }

    #[test]
    fn valid_port_is_not_reported() {
        assert_eq!(config_from(&[(PORT_ENV, " 8080 ")]).rejected_port, None);
        assert_eq!(config_from(&[]).rejected_port, None);
    }

    #[test]
    fn debug_requires_literal_true() {
        assert!(!config_from(&[(DEBUG_ENV, "1")]).debug);
        assert!(!config_from(&[(DEBUG_ENV, "yes")]).debug);
        assert!(config_from(&[(DEBUG_ENV, "true")]).debug);
    }

    #[test]
    fn flask_debug_is_read_when_debug_unset() {
        assert!(config_from(&[(FLASK_DEBUG_ENV, "True")]).debug);
        assert!(!config_from(&[(FLASK_DEBUG_ENV, "1")]).debug);
        assert!(!config_from(&[(DEBUG_ENV, "false"), (FLASK_DEBUG_ENV, "true")]).debug);
    }

    #[test]
    fn cors_wildcard() {
        assert_eq!(CorsPolicy::parse("*"), CorsPolicy::Any);
        assert_eq!(CorsPolicy::parse(" * "), CorsPolicy::Any);
    }

    #[test]
    fn cors_list_keeps_order() {
        assert_eq!(
            CorsPolicy::parse("https://a.com,https://b.com"),
            CorsPolicy::List(vec!["https://a.com".into(), "https://b.com".into()])
        );
    }

    #[test]
    fn cors_list_drops_blank_entries() {
        assert_eq!(
            CorsPolicy::parse(",https://a.com , ,https://b.com,"),
            CorsPolicy::List(vec!["https://a.com".into(), "https://b.com".into()])
        );
    }

    #[test]
    fn ensure_directories_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let uploads = temp.path().join("nested/uploads");
        let certs = temp.path().join("certs");
        let config = config_from(&[
            (UPLOAD_DIR_ENV, uploads.to_str().unwrap()),
            (CERT_DIR_ENV, certs.to_str().unwrap()),
        ]);

        config.ensure_directories().unwrap();
        config.ensure_directories().unwrap();

        assert!(uploads.is_dir());
        assert!(certs.is_dir());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 2);
    }

    #[test]
    fn ensure_dir_fails_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(err, ConfigError::CreateDir { .. }));
    }
}
