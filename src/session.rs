//! Persisted session - the terminal counterpart of the browser's
//! localStorage token slot. The token's presence is the sole
//! authentication signal; there is no expiry or refresh logic.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.yaml";

/// On-disk session shape
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    saved_at: chrono::DateTime<chrono::Utc>,
}

/// Manages the bearer token persisted under the config directory
pub struct Session {
    config_dir: PathBuf,
}

impl Session {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::constants::CONFIG_DIR);
        Session { config_dir }
    }

    /// Create a session store rooted at an explicit directory
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Session {
            config_dir: config_dir.into(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Load the persisted token, if any
    pub fn load_token(&self) -> Option<String> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        let session: SessionFile = serde_yaml::from_str(&content).ok()?;
        if session.token.is_empty() {
            None
        } else {
            Some(session.token)
        }
    }

    /// Persist a token to disk
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        let session = SessionFile {
            token: token.to_string(),
            saved_at: chrono::Utc::now(),
        };
        let content = serde_yaml::to_string(&session)?;
        fs::write(self.session_path(), content)?;
        Ok(())
    }

    /// Remove the persisted token (logout, or a rejected token)
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::at(dir.path());
        session.save_token("abc123").unwrap();
        assert_eq!(session.load_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::at(dir.path().join("missing"));
        assert!(session.load_token().is_none());
    }

    #[test]
    fn test_clear_removes_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::at(dir.path());
        session.save_token("abc123").unwrap();
        session.clear().unwrap();
        assert!(session.load_token().is_none());
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::at(dir.path());
        assert!(session.clear().is_ok());
    }
}
