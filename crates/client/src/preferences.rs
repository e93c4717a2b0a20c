//! Persisted client preferences.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

impl Preferences {
    /// Reads preferences from `path`.
    ///
    /// A missing or unreadable file yields the defaults (light theme).
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read preferences");
                return Self::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "ignoring malformed preferences");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(self)?;
        fs::write(path, body)
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Flips the theme and persists the new choice.
    pub fn toggle_dark_mode(&mut self, path: &Path) -> io::Result<Theme> {
        self.dark_mode = !self.dark_mode;
        self.save(path)?;
        Ok(self.theme())
    }
}
