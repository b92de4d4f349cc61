//! Error types for the fallible boundaries: map loading and configuration.
//!
//! Camera tickers themselves never fail.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejected map definition.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map has no sectors")]
    NoSectors,

    #[error("line {line} references missing vertex {vertex}")]
    MissingVertex { line: usize, vertex: usize },

    #[error("line {line} references missing sector {sector}")]
    MissingSector { line: usize, sector: u32 },

    #[error("line {line} has zero length")]
    DegenerateLine { line: usize },

    #[error("line {line} carries a portal but has no back sector")]
    OneSidedPortal { line: usize },

    #[error("sector {sector} has ceiling below floor")]
    InvertedSector { sector: usize },
}

/// A tunable outside its accepted range, or an unreadable config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} = {value} is out of range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("map: {0}")]
    Map(#[from] MapError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
