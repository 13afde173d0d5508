//! Project configuration and user defaults.
//!
//! `ProjectConfig` is the resolved set of options for one generation run.
//! It is built from stock defaults, optionally overlaid with values from
//! the user defaults file, then with command-line flags, and handed to
//! the generator. Serializing it produces the render data substituted
//! into templates.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::templates::{RenderData, TemplateKind};

/// Resolved options for one generation run
#[derive(Debug, Clone, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    pub template: String,
    pub description: String,
    pub author: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub database: String,
    pub authentication: bool,
    pub cors: bool,
    pub logging: bool,
    pub validation: bool,
    pub testing: bool,
    pub docker: bool,
    pub git: bool,
    pub install: bool,
}

impl ProjectConfig {
    /// Stock configuration for a project name and template choice
    pub fn new(name: &str, template: TemplateKind) -> Self {
        Self {
            name: name.to_string(),
            template: template.as_str().to_string(),
            description: format!("{name} - Express.js API"),
            author: "Nukta Solutions".to_string(),
            license: "MIT".to_string(),
            repository: None,
            database: "mongodb".to_string(),
            authentication: true,
            cors: true,
            logging: true,
            validation: true,
            testing: false,
            docker: false,
            git: false,
            install: true,
        }
    }

    /// Render data for template substitution and cache keying
    pub fn render_data(&self) -> Result<RenderData> {
        RenderData::from_serialize(self)
    }
}

/// Optional overrides loaded from the user defaults file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDefaults {
    pub author: Option<String>,
    pub license: Option<String>,
    pub description: Option<String>,
}

impl UserDefaults {
    /// Load defaults from the platform configuration directory.
    ///
    /// A missing file or an unavailable config directory yields stock
    /// defaults; a file that fails to parse is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load defaults from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the user defaults file, if a config directory exists
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scaffex").join("config.toml"))
    }

    /// Overlay these defaults onto a stock configuration
    pub fn apply(&self, config: &mut ProjectConfig) {
        if let Some(author) = &self.author {
            config.author = author.clone();
        }
        if let Some(license) = &self.license {
            config.license = license.clone();
        }
        if let Some(description) = &self.description {
            config.description = description.clone();
        }
    }
}
