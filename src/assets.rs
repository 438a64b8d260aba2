// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolution of request paths to files under a served directory.
//!
//! A requested path only resolves when it names an existing regular file that
//! stays inside the root after symlinks are followed. Parent-directory
//! segments, absolute paths and drive prefixes never resolve.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

/// A file that may be delivered to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: PathBuf,
}

impl FileRef {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(FileRef),
    NotFound,
}

impl Resolved {
    pub fn file(self) -> Option<FileRef> {
        match self {
            Resolved::File(file) => Some(file),
            Resolved::NotFound => None,
        }
    }
}

/// Resolve a percent-encoded request path relative to `root`.
pub async fn resolve(root: &Path, requested: &str) -> Resolved {
    let Ok(decoded) = urlencoding::decode(requested) else {
        return Resolved::NotFound;
    };

    let Some(relative) = sanitize(&decoded) else {
        return Resolved::NotFound;
    };

    let candidate = root.join(relative);
    match fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Resolved::NotFound,
    }

    // Symlinks inside the root may still point elsewhere.
    let (Ok(canonical_root), Ok(canonical)) =
        tokio::join!(fs::canonicalize(root), fs::canonicalize(&candidate))
    else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(&canonical_root) {
        return Resolved::NotFound;
    }

    Resolved::File(FileRef { path: candidate })
}

/// Keep only normal segments; any segment that could leave the root rejects
/// the whole path.
fn sanitize(requested: &str) -> Option<PathBuf> {
    if requested.contains('\0') || requested.contains('\\') {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in Path::new(requested.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}
