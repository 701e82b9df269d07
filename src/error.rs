//! Error types for processing runs.

use std::io;
use std::path::PathBuf;

/// Fatal errors: the run is aborted before any file is touched and no
/// transcript is produced.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("source directory must not be empty")]
    EmptySourceDir,

    #[error("link/move mode requires a target directory")]
    MissingTargetDir,

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("source and target must not be the same path: {}", .0.display())]
    PathConflict(PathBuf),

    #[error("source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source directory is empty: {}", .0.display())]
    SourceEmpty(PathBuf),

    #[error("no video files (.mkv or .mp4) found in source directory '{}'", .0.display())]
    NoVideoFiles(PathBuf),

    #[error("cannot read source directory {}: {source}", path.display())]
    ReadSource { path: PathBuf, source: io::Error },

    #[error("cannot create target directory {}: {source}", path.display())]
    CreateTargetDir { path: PathBuf, source: io::Error },

    #[error("processing task failed: {0}")]
    Task(String),
}

impl ProcessError {
    /// A required request field was left empty.
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            ProcessError::EmptySourceDir | ProcessError::MissingTargetDir
        )
    }

    /// Classify a failed source directory listing.
    pub(crate) fn read_source(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ProcessError::SourceNotFound(path)
        } else {
            ProcessError::ReadSource { path, source }
        }
    }
}

/// Per-file errors. They are written to the transcript and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("cannot move '{name}': {source}")]
    Move { name: String, source: io::Error },

    #[error("cannot create symbolic link '{name}': {source}")]
    Symlink { name: String, source: io::Error },

    #[error(
        "failed to create symbolic link, run as administrator or enable developer mode: {source}"
    )]
    SymlinkPrivilege { source: io::Error },

    #[error("cannot remove existing symbolic link {}: {source}", path.display())]
    Conflict { path: PathBuf, source: io::Error },

    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}
