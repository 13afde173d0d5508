//! Error handling for the scaffex generation library.
//!
//! This module defines the main error type `Error` used throughout the
//! core, along with a convenient `Result` type alias. It uses `thiserror`
//! for easy error handling and implements conversions from common error
//! types.

use thiserror::Error;

/// Result type for scaffex generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scaffex generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Project name rejected by the validation rules
    #[error("Invalid project name: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Lookup of a template name that is not registered
    #[error("Template \"{name}\" not found. Available templates: {}", .available.join(", "))]
    TemplateNotFound { name: String, available: Vec<String> },

    /// Target project directory already present on disk
    #[error("Directory \"{0}\" already exists")]
    AlreadyExists(String),

    /// Template source present but failed to render
    #[error("Failed to render template \"{template_id}\": {source}")]
    Render {
        template_id: String,
        #[source]
        source: tera::Error,
    },

    /// Template registry error
    #[error("Template registry error: {0}")]
    Registry(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template registry error
    pub fn registry<S: Into<String>>(msg: S) -> Self {
        Self::Registry(msg.into())
    }

    /// Create a new render error for the given template id
    pub fn render<S: Into<String>>(template_id: S, source: tera::Error) -> Self {
        Self::Render {
            template_id: template_id.into(),
            source,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
