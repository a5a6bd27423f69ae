use thiserror::Error;

use crate::city::catalog::CatalogLoadError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Coordinates ({x}, {y}) are outside the {width}x{height} world")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("Unknown construction group: {0}")]
    UnknownGroup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogLoadError),
}

pub type Result<T> = std::result::Result<T, SimError>;
