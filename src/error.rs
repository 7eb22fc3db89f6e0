use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    #[error("invalid viewport {width}x{height}: width and height must be non-zero")]
    InvalidViewport { width: u32, height: u32 },

    #[error("{path}: line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("GPU error: {0}")]
    Gpu(String),
}

impl From<toml::de::Error> for ViewerError {
    fn from(err: toml::de::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
