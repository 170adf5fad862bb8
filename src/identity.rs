use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Keeps the `opengpts_user_id` stable between invocations, the way the
/// browser app kept it in a long-lived cookie.
pub struct UserIdStore {
    path: PathBuf,
}

impl UserIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.cache/opengpts/user_id`
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|dir| Self::new(dir.join("opengpts").join("user_id")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let id = contents.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    pub fn save(&self, user_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, user_id)?;
        Ok(())
    }

    pub fn load_or_create(&self) -> Result<String> {
        if let Some(id) = self.load() {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.save(&id)?;
        tracing::debug!(path = %self.path.display(), "created new user id");
        Ok(id)
    }
}
