use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Failed to read inventory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Image #{index} has an empty `{field}`")]
    EmptyField { index: usize, field: &'static str },

    #[error("Image name declared more than once: {0}")]
    DuplicateName(String),
}

pub type Result<T> = std::result::Result<T, InventoryError>;
