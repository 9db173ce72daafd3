// Tail reader errors

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The requested region holds bytes that are not valid UTF-8.
    /// `line` counts back from the end of the file (1 = last line).
    #[error("invalid UTF-8 in {} ({line} lines from the end)", path.display())]
    Decode { path: PathBuf, line: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TailError {
    /// Classify an I/O failure on `path`.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => TailError::NotFound { path },
            io::ErrorKind::PermissionDenied => TailError::PermissionDenied { path },
            _ => TailError::Io { path, source: err },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TailError::NotFound { .. })
    }
}
