//! Platform-specific state directory management

use directories::ProjectDirs;
use std::path::PathBuf;

/// Locates the configuration file, the stored session and the log file
pub struct StateDir {
    project_dirs: Option<ProjectDirs>,
    /// Single directory used for everything, from `--state-dir`
    override_dir: Option<PathBuf>,
}

impl StateDir {
    pub fn new() -> Self {
        Self {
            project_dirs: ProjectDirs::from("com", "Backoffice", "backoffice"),
            override_dir: None,
        }
    }

    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            project_dirs: None,
            override_dir: Some(path.into()),
        }
    }

    /// Neither an override nor platform directories are available, so
    /// paths are relative to the working directory
    pub const fn uses_fallback(&self) -> bool {
        self.override_dir.is_none() && self.project_dirs.is_none()
    }

    /// `--state-dir` when given, otherwise the platform directories
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        override_dir.map_or_else(Self::new, Self::with_override)
    }

    pub fn config_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.clone();
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from(".backoffice")
        }
    }

    /// Directory holding the session file and the log
    pub fn data_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.clone();
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".backoffice")
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("backoffice.toml")
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("cli.log")
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
