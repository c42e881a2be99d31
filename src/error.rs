use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid rotation: {0} (expected 0, 90, 180, 270 or -90)")]
    InvalidRotation(i32),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unbalanced group: {0}")]
    UnbalancedGroup(String),

    #[error("Invalid XML name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
