use std::path::PathBuf;

use thiserror::Error;

/// Every failure the library can report. Only `InvalidInput` can come out of
/// the core; the rest belong to the collaborators around it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("grid has {actual} cells but a {width}x{height} grid needs {expected}")]
    InvalidInput {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config line {line}: {message}")]
    ConfigParse { line: usize, message: String },
    #[error("cannot decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot serialize rectangle: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(line: usize, message: impl Into<String>) -> Self {
        Error::ConfigParse {
            line,
            message: message.into(),
        }
    }
}
