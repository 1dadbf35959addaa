//! # YAML Session Repository
//!
//! Keeps the single gateway session in `{data_directory}/session.yaml` so the
//! user stays logged in across restarts.
//!
//! ```text
//! data/
//! ├── config.yaml
//! └── session.yaml    ← This module manages this file
//! ```
//!
//! Writes go through a temp file followed by a rename, so a crash never leaves
//! a half-written session behind.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::Session;
use crate::storage::SessionStorage;

const SESSION_FILE: &str = "session.yaml";

#[derive(Debug, Clone)]
pub struct SessionRepository {
    data_directory: PathBuf,
}

impl SessionRepository {
    /// Create a repository rooted at `data_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let data_directory = data_directory.as_ref().to_path_buf();
        if !data_directory.exists() {
            fs::create_dir_all(&data_directory)
                .with_context(|| format!("Failed to create data directory {:?}", data_directory))?;
        }
        Ok(Self { data_directory })
    }

    fn session_path(&self) -> PathBuf {
        self.data_directory.join(SESSION_FILE)
    }
}

impl SessionStorage for SessionRepository {
    fn load_session(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            debug!("No stored session at {:?}", path);
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&path)?;
        let session: Session = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed session file {:?}", path))?;
        debug!("Loaded session for user {} from {:?}", session.user.id, path);
        Ok(Some(session))
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.session_path();
        let yaml_content = serde_yaml::to_string(session)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved session for user {} to {:?}", session.user.id, path);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Removed session file {:?}", path);
        }
        Ok(())
    }
}
