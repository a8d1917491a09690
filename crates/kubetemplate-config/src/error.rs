//! Template rendering errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read template {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template parse error in {name}: {message}")]
    Parse { name: String, message: String },

    #[error("template render error in {name}: {message}")]
    Render { name: String, message: String },

    #[error("invalid parameter assignment {0:?}, expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("invalid parameter name {0:?}")]
    InvalidName(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
