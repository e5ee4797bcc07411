//! Project store
//!
//! Persists parameter bundles as pretty-printed JSON documents, one file
//! per project (`<name>.json`) in a single directory. The engine never
//! touches this module; it only consumes the bundles.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use walkdir::WalkDir;

use super::bundle::ParameterBundle;
use crate::error::{AcousticError, Result};

/// Schema version written into every project document.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

/// Extension for project files.
const PROJECT_EXTENSION: &str = "json";

/// Longest accepted project name.
const MAX_NAME_LEN: usize = 64;

/// On-disk wrapper around a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Schema version for compatibility checks.
    pub schema_version: String,

    /// Stable identifier, kept across overwrites.
    pub id: Uuid,

    /// When the project was first saved.
    pub created_at: DateTime<Utc>,

    /// When the project was last saved.
    pub saved_at: DateTime<Utc>,

    /// Crate version that wrote the file.
    pub acustica_version: String,

    /// The saved parameters.
    pub bundle: ParameterBundle,
}

/// Listing entry for a saved project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub path: PathBuf,
}

/// Directory of saved projects.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open a store, creating the directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| AcousticError::DirectoryCreateError {
            path: root.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `name`.
    pub fn project_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{}.{}", name, PROJECT_EXTENSION)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.project_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Save a bundle under its own name.
    ///
    /// Fails with `ProjectAlreadyExists` unless `overwrite` is set; an
    /// overwrite keeps the original id and creation time.
    pub fn save(&self, bundle: &ParameterBundle, overwrite: bool) -> Result<PathBuf> {
        let path = self.project_path(&bundle.name)?;
        let now = Utc::now();

        let (id, created_at) = if path.is_file() {
            if !overwrite {
                return Err(AcousticError::ProjectAlreadyExists { path });
            }
            let previous = self.read_document(&path)?;
            (previous.id, previous.created_at)
        } else {
            (Uuid::new_v4(), now)
        };

        let document = ProjectDocument {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            id,
            created_at,
            saved_at: now,
            acustica_version: env!("CARGO_PKG_VERSION").to_string(),
            bundle: bundle.clone(),
        };

        let content = serde_json::to_string_pretty(&document)?;
        fs::write(&path, content).map_err(|e| AcousticError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;

        log::info!("Saved project '{}' to {}", bundle.name, path.display());
        Ok(path)
    }

    /// Load the full document of a project.
    pub fn load_document(&self, name: &str) -> Result<ProjectDocument> {
        let path = self.project_path(name)?;
        if !path.is_file() {
            return Err(AcousticError::ProjectNotFound { path });
        }
        self.read_document(&path)
    }

    /// Load the bundle of a project.
    pub fn load(&self, name: &str) -> Result<ParameterBundle> {
        let document = self.load_document(name)?;
        log::info!("Loaded project '{}' (saved {})", name, document.saved_at);
        Ok(document.bundle)
    }

    /// Delete a project file.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.project_path(name)?;
        if !path.is_file() {
            return Err(AcousticError::ProjectNotFound { path });
        }
        fs::remove_file(&path).map_err(|e| AcousticError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Deleted project '{}'", name);
        Ok(())
    }

    /// All readable projects, sorted by name.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn list(&self) -> Result<Vec<ProjectSummary>> {
        let mut projects: Vec<ProjectSummary> = WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION)
            })
            .filter_map(|entry| match self.read_document(entry.path()) {
                Ok(document) => Some(ProjectSummary {
                    name: document.bundle.name,
                    saved_at: document.saved_at,
                    path: entry.path().to_path_buf(),
                }),
                Err(e) => {
                    log::warn!("Skipping unreadable project {}: {}", entry.path().display(), e);
                    None
                }
            })
            .collect();

        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    fn read_document(&self, path: &Path) -> Result<ProjectDocument> {
        let content = fs::read_to_string(path).map_err(|e| AcousticError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let value: serde_json::Value = serde_json::from_str(&content)?;
        check_schema_version(&value)?;

        Ok(serde_json::from_value(value)?)
    }
}

/// Only documents of the same major schema version are readable.
fn check_schema_version(value: &serde_json::Value) -> Result<()> {
    let version = value
        .get("schema_version")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let current_major = CURRENT_SCHEMA_VERSION.split('.').next();
    if version.split('.').next() != current_major || version.is_empty() {
        return Err(AcousticError::UnsupportedSchemaVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}

/// Names become file names: letters, digits, space, '-' and '_' only.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.trim().is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');
    if !valid {
        return Err(AcousticError::InvalidProjectName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomGeometry;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn bundle(name: &str) -> ParameterBundle {
        let room = RoomGeometry::new(5.0, 4.0, 2.7).unwrap();
        ParameterBundle::new(name, room, "Voce/Podcast")
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let original = bundle("vocal booth");
        let path = store.save(&original, false).unwrap();
        assert!(path.exists());
        assert!(store.exists("vocal booth"));

        let loaded = store.load("vocal booth").unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&bundle("mix"), false).unwrap();

        let err = store.save(&bundle("mix"), false).unwrap_err();
        assert_eq!(err.error_code(), "PROJECT_ALREADY_EXISTS");
    }

    #[test]
    fn test_overwrite_keeps_id() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&bundle("mix"), false).unwrap();
        let first = store.load_document("mix").unwrap();

        let changed = bundle("mix").with_max_mode_frequency(150.0);
        store.save(&changed, true).unwrap();
        let second = store.load_document("mix").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.bundle.max_mode_frequency, Some(150.0));
    }

    #[test]
    fn test_list_sorted_and_skips_garbage() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&bundle("zeta"), false).unwrap();
        store.save(&bundle("alpha"), false).unwrap();
        fs::write(dir.path().join("notes.json"), "not json").unwrap();
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&bundle("gone"), false).unwrap();
        store.delete("gone").unwrap();
        assert!(!store.exists("gone"));

        let err = store.delete("gone").unwrap_err();
        assert_eq!(err.error_code(), "PROJECT_NOT_FOUND");
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        for name in ["../escape", "a/b", "", "   "] {
            let err = store.save(&bundle(name), false).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_PROJECT_NAME");
        }
    }

    #[test]
    fn test_rejects_future_schema() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        let path = store.save(&bundle("old"), false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("\"1.0.0\"", "\"2.0.0\"")).unwrap();

        let err = store.load("old").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_SCHEMA_VERSION");
    }
}
