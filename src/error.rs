//! Error types for dataset loading and simulation reconfiguration
//!
//! Loading is all-or-nothing: any error here means the previous dataset (if
//! any) is still the one being displayed.

use thiserror::Error;

/// Errors that can occur while loading a dataset or settings file
#[derive(Error, Debug)]
pub enum LoadError {
    /// An edge references a vertex id that is not in the vertex list
    #[error("edge {edge} references unknown node id '{id}'")]
    UnknownNode {
        /// Position of the offending edge in the edge list
        edge: usize,
        /// The unresolved id
        id: String,
    },

    /// Two vertices share the same id
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// A vertex or settings color could not be parsed
    #[error("invalid color '{value}' for '{id}'")]
    InvalidColor {
        /// Vertex id or settings key carrying the color
        id: String,
        /// The color as written in the input
        value: String,
    },

    /// The file extension could not be mapped to a settings format
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input was malformed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML input was malformed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings parsed but carry unusable simulation parameters
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),

    /// The network was already torn down
    #[error("network has been stopped")]
    Stopped,
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised when simulation parameters are changed at runtime
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A strength parameter was NaN or infinite
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter {
        /// Parameter name as it appears in the settings
        name: &'static str,
        /// The rejected value
        value: f32,
    },
}
