//! Errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TracerError>;

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("cannot normalize a zero-length or non-finite vector")]
    DegenerateVector,

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
