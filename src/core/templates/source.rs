//! Template source store abstraction.
//!
//! Raw template text lives outside the binary, keyed by template id
//! relative to a base directory. The renderer never assumes a source
//! exists: a missing entry is an expected condition answered with `None`
//! and resolved downstream by the built-in default content generators.
//!
//! # Base directory discovery
//!
//! The filesystem store resolves its base directory from, in order:
//! 1. An explicit `--template-dir` argument
//! 2. The `SCAFFEX_TEMPLATE_DIR` environment variable
//! 3. `templates/express` under the current working directory
//! 4. `templates/express` beside the executable
//! 5. `~/.config/scaffex/templates/express`
//!
//! None of these existing is fine; every load then misses and the
//! fallback generators take over.

// Internal imports (std, crate)
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::core::error::Result;

/// Read-only store of raw template sources keyed by template id
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Load the raw source for `template_id`.
    ///
    /// Returns `Ok(None)` when the store has no such entry; only real I/O
    /// failures (permissions, encoding) are errors.
    async fn load(&self, template_id: &str) -> Result<Option<String>>;
}

/// Filesystem-backed template store rooted at a base directory
#[derive(Debug, Clone)]
pub struct FsTemplateSource {
    base_dir: PathBuf,
}

impl FsTemplateSource {
    /// Create a store rooted at `base_dir`; the directory may not exist
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve the base directory from the standard locations
    pub fn discover(custom_dir: Option<&Path>) -> Self {
        Self::discover_with_env(custom_dir, std::env::var("SCAFFEX_TEMPLATE_DIR").ok())
    }

    fn discover_with_env(custom_dir: Option<&Path>, env_dir: Option<String>) -> Self {
        // An explicit directory is used verbatim, existing or not.
        if let Some(dir) = custom_dir {
            debug!("Using custom template directory: {}", dir.display());
            return Self::new(dir);
        }
        if let Some(dir) = env_dir {
            debug!("Using template directory from environment: {dir}");
            return Self::new(PathBuf::from(dir));
        }

        let mut candidates = Vec::new();
        if let Ok(current_dir) = std::env::current_dir() {
            candidates.push(current_dir.join("templates").join("express"));
        }
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                candidates.push(exe_dir.join("templates").join("express"));
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("scaffex").join("templates").join("express"));
        }

        match candidates.into_iter().find(|path| path.exists()) {
            Some(path) => {
                debug!("Discovered template directory: {}", path.display());
                Self::new(path)
            }
            None => {
                debug!("No template directory found; relying on built-in defaults");
                Self::new(PathBuf::from("templates").join("express"))
            }
        }
    }

    /// The directory template ids are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn load(&self, template_id: &str) -> Result<Option<String>> {
        let path = self.base_dir.join(template_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Template source not found: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory template store with controlled contents, for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    templates: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template_id: &str, content: &str) -> Self {
        self.templates
            .insert(template_id.to_string(), content.to_string());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    async fn load(&self, template_id: &str) -> Result<Option<String>> {
        Ok(self.templates.get(template_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_fs_source_missing_file_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = FsTemplateSource::new(temp_dir.path());

        let loaded = source.load("src/app.ts.tera").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_fs_source_missing_base_dir_is_none() {
        let source = FsTemplateSource::new("/definitely/not/a/real/base");
        let loaded = source.load("src/app.ts.tera").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_fs_source_reads_nested_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("app.ts.tera"), "const name = \"{{ name }}\";").unwrap();

        let source = FsTemplateSource::new(temp_dir.path());
        let loaded = source.load("src/app.ts.tera").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("const name = \"{{ name }}\";"));
    }

    #[tokio::test]
    async fn test_memory_source_round_trip() {
        let source = MemoryTemplateSource::new()
            .with_template("README.md.tera", "# {{ name }}");

        assert_eq!(
            source.load("README.md.tera").await.unwrap().as_deref(),
            Some("# {{ name }}")
        );
        assert!(source.load("missing.tera").await.unwrap().is_none());
    }

    #[test]
    fn test_discover_prefers_custom_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = FsTemplateSource::discover_with_env(
            Some(temp_dir.path()),
            Some("/ignored/env/dir".to_string()),
        );
        assert_eq!(source.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_discover_uses_environment_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env_dir = temp_dir.path().to_string_lossy().to_string();
        let source = FsTemplateSource::discover_with_env(None, Some(env_dir.clone()));
        assert_eq!(source.base_dir(), PathBuf::from(env_dir));
    }

    #[test]
    #[traced_test]
    fn test_discover_logs_custom_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let _source = FsTemplateSource::discover_with_env(Some(temp_dir.path()), None);

        assert!(logs_contain("Using custom template directory"));
    }
}
