//! XDG-compliant path resolution for quillmate.
//!
//! Provides `QuillPaths`: the data, state, and cache directories plus the
//! uploads directory where raw writing samples are persisted.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(quill::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(quill::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Global XDG-compliant directories for quillmate.
#[derive(Debug, Clone)]
pub struct QuillPaths {
    /// `$XDG_DATA_HOME/quillmate/`
    pub data_dir: PathBuf,
    /// `$XDG_STATE_HOME/quillmate/`
    pub state_dir: PathBuf,
    /// `$XDG_CACHE_HOME/quillmate/`
    pub cache_dir: PathBuf,
}

impl QuillPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("quillmate");

        let state_dir = std::env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/state"))
            .join("quillmate");

        let cache_dir = std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".cache"))
            .join("quillmate");

        Ok(Self {
            data_dir,
            state_dir,
            cache_dir,
        })
    }

    /// Resolve all directories under a single root. Used by tests and by
    /// deployments that pin the service to one directory.
    pub fn under_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("data"),
            state_dir: root.join("state"),
            cache_dir: root.join("cache"),
        }
    }

    /// Directory where raw uploaded writing samples are persisted.
    ///
    /// Uploads accumulate here; nothing cleans them up.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("user_writings")
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [
            &self.data_dir,
            &self.state_dir,
            &self.cache_dir,
            &self.uploads_dir(),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}
