//! Locations of the configuration files a cbqueue run reads.
//!
//! ```text
//! ~/.config/cbqueue/config.toml   user defaults (platform config dir)
//! <project>/cbqueue.toml          written by `cbqueue init`, tracked
//! <project>/cbqueue.local.toml    machine-local overrides, gitignored
//! ```
//!
//! Later files override earlier ones. The environment layer and CLI flags sit
//! on top of all three.

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "cbqueue.toml";
const LOCAL_FILE: &str = "cbqueue.local.toml";
const USER_FILE: &str = "config.toml";

/// Resolves the cbqueue configuration files.
pub struct Paths {
    project_dirs: Option<ProjectDirs>,
}

impl Paths {
    pub fn new() -> Self {
        Self {
            project_dirs: ProjectDirs::from("dev", "cbqueue", "cbqueue"),
        }
    }

    /// Platform config directory for cbqueue, e.g. `~/.config/cbqueue/`.
    ///
    /// Fails when no home directory can be determined.
    pub fn user_config_dir(&self) -> Result<PathBuf, ConfigError> {
        self.project_dirs
            .as_ref()
            .map(|p| p.config_dir().to_path_buf())
            .ok_or_else(|| {
                ConfigError::XdgError("no home directory for user config".to_string())
            })
    }

    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.user_config_dir()?.join(USER_FILE))
    }

    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(PROJECT_FILE)
    }

    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(LOCAL_FILE)
    }

    /// A project is initialized once `cbqueue init` has written `cbqueue.toml`.
    pub fn is_initialized(project_dir: impl AsRef<Path>) -> bool {
        Self::project_config_file(project_dir).exists()
    }

    /// Existing configuration files for `project_dir`, lowest precedence
    /// first. The user file is skipped when `include_user` is false or the
    /// platform has no config directory.
    pub fn file_layers(&self, project_dir: impl AsRef<Path>, include_user: bool) -> Vec<PathBuf> {
        let user = include_user
            .then(|| self.user_config_file().ok())
            .flatten();
        user.into_iter()
            .chain([
                Self::project_config_file(&project_dir),
                Self::local_config_file(&project_dir),
            ])
            .filter(|path| path.exists())
            .collect()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_user_file_lives_under_cbqueue_dir() {
        let paths = Paths::new();

        // Containers without a home directory have no user layer.
        if let Ok(file) = paths.user_config_file() {
            assert!(file.ends_with("config.toml"));
            assert!(file.to_string_lossy().contains("cbqueue"));
        }
    }

    #[test]
    fn test_init_marks_project() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        assert!(!Paths::is_initialized(project_dir));
        fs::write(Paths::project_config_file(project_dir), "[queue]\ncapacity = 4\n").unwrap();
        assert!(Paths::is_initialized(project_dir));
    }

    #[test]
    fn test_file_layers_in_precedence_order() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        let paths = Paths::new();

        assert!(paths.file_layers(project_dir, false).is_empty());

        // A local override alone is still picked up.
        fs::write(project_dir.join("cbqueue.local.toml"), "").unwrap();
        assert_eq!(
            paths.file_layers(project_dir, false),
            vec![project_dir.join("cbqueue.local.toml")]
        );

        fs::write(project_dir.join("cbqueue.toml"), "").unwrap();
        assert_eq!(
            paths.file_layers(project_dir, false),
            vec![
                project_dir.join("cbqueue.toml"),
                project_dir.join("cbqueue.local.toml"),
            ]
        );
    }
}
