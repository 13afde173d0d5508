//! Project generation orchestration - coordinates one scaffold run.
//!
//! The generator drives the phases of a run: resolve the template, check
//! and create the project directory, fan out all file renders and writes,
//! then run the optional best-effort post steps (git setup, dependency
//! install). File generation failures abort the run; post-step failures
//! degrade to warnings on the report.

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use tokio::fs;

use crate::core::config::ProjectConfig;
use crate::core::error::{Error, Result};
use crate::core::shell::CommandExecutor;
use crate::core::templates::{
    FileDescriptor, RenderData, TemplateDefinition, TemplateRegistry, TemplateRenderer,
};

/// Upper bound for the dependency install step
const INSTALL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Phases of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    DirectoryCheck,
    FileGeneration,
    GitInit,
    DependencyInstall,
    Done,
    Failed,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationPhase::Idle => write!(f, "idle"),
            GenerationPhase::DirectoryCheck => write!(f, "directory_check"),
            GenerationPhase::FileGeneration => write!(f, "file_generation"),
            GenerationPhase::GitInit => write!(f, "git_init"),
            GenerationPhase::DependencyInstall => write!(f, "dependency_install"),
            GenerationPhase::Done => write!(f, "done"),
            GenerationPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Best-effort steps that can fail without aborting the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStep {
    GitInit,
    DependencyInstall,
}

impl fmt::Display for PostStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStep::GitInit => write!(f, "git-init"),
            PostStep::DependencyInstall => write!(f, "dependency-install"),
        }
    }
}

/// A non-fatal post-step failure recorded on the report
#[derive(Debug, Clone)]
pub struct PostStepWarning {
    pub step: PostStep,
    pub message: String,
    pub remediation: Option<String>,
}

/// Summary of one completed generation run
#[derive(Debug)]
pub struct GenerationReport {
    pub project_root: PathBuf,
    pub files_written: usize,
    pub elapsed: Duration,
    pub warnings: Vec<PostStepWarning>,
}

/// Orchestrates the project generation workflow
pub struct ProjectGenerator {
    config: ProjectConfig,
    registry: Arc<TemplateRegistry>,
    renderer: Arc<TemplateRenderer>,
    executor: Arc<dyn CommandExecutor>,
    project_root: PathBuf,
    phase: Mutex<GenerationPhase>,
}

impl ProjectGenerator {
    /// Create a generator for one run; the project root is
    /// `<output_dir>/<name>`
    pub fn new(
        config: ProjectConfig,
        registry: Arc<TemplateRegistry>,
        renderer: Arc<TemplateRenderer>,
        executor: Arc<dyn CommandExecutor>,
        output_dir: &Path,
    ) -> Self {
        let project_root = output_dir.join(&config.name);
        Self {
            config,
            registry,
            renderer,
            executor,
            project_root,
            phase: Mutex::new(GenerationPhase::Idle),
        }
    }

    /// Directory this run writes the project into
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Current phase of the run
    pub fn phase(&self) -> GenerationPhase {
        *self.phase.lock().unwrap()
    }

    fn set_phase(&self, next: GenerationPhase) {
        let mut phase = self.phase.lock().unwrap();
        tracing::debug!(from = %*phase, to = %next, "Generation phase transition");
        *phase = next;
    }

    /// Execute the generation workflow
    pub async fn generate(&self) -> Result<GenerationReport> {
        match self.run().await {
            Ok(report) => {
                self.set_phase(GenerationPhase::Done);
                Ok(report)
            }
            Err(e) => {
                self.set_phase(GenerationPhase::Failed);
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<GenerationReport> {
        let started = Instant::now();

        // 1. Resolve the template before touching the filesystem
        let template = self.registry.get(&self.config.template)?;
        let data = self.config.render_data()?;

        tracing::debug!(
            project_name = %self.config.name,
            template = %template.name,
            files = template.files.len(),
            "Starting project generation"
        );

        // 2. Directory check; never overwrite
        self.set_phase(GenerationPhase::DirectoryCheck);
        self.create_project_directory().await?;

        // 3. Fan out every file render and write, awaited as one batch
        self.set_phase(GenerationPhase::FileGeneration);
        let files_written = self.generate_files(template, &data).await?;

        // 4. Best-effort post steps
        let mut warnings = Vec::new();
        if self.config.git {
            self.set_phase(GenerationPhase::GitInit);
            if let Some(warning) = self.initialize_git().await {
                warnings.push(warning);
            }
        }
        if self.config.install {
            self.set_phase(GenerationPhase::DependencyInstall);
            if let Some(warning) = self.install_dependencies().await {
                warnings.push(warning);
            }
        }

        Ok(GenerationReport {
            project_root: self.project_root.clone(),
            files_written,
            elapsed: started.elapsed(),
            warnings,
        })
    }

    async fn create_project_directory(&self) -> Result<()> {
        if fs::try_exists(&self.project_root).await? {
            return Err(Error::AlreadyExists(self.config.name.clone()));
        }
        fs::create_dir_all(&self.project_root).await?;
        Ok(())
    }

    async fn generate_files(
        &self,
        template: &TemplateDefinition,
        data: &RenderData,
    ) -> Result<usize> {
        let file_tasks = template
            .files
            .iter()
            .map(|descriptor| self.write_rendered_file(descriptor, data));

        futures::try_join!(
            try_join_all(file_tasks),
            self.write_project_file(Path::new(".env.example"), env_example(&self.config.name)),
            self.write_project_file(Path::new(".env"), env_file(&self.config.name)),
        )?;

        Ok(template.files.len() + 2)
    }

    async fn write_rendered_file(
        &self,
        descriptor: &FileDescriptor,
        data: &RenderData,
    ) -> Result<()> {
        let content = self.renderer.render(&descriptor.template_id, data).await?;
        self.write_project_file(Path::new(&descriptor.target_path), content)
            .await
    }

    async fn write_project_file(&self, relative: &Path, content: String) -> Result<()> {
        let path = self.project_root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), "Wrote project file");
        Ok(())
    }

    /// Run `git init`, stage everything, and make the initial commit.
    /// Any failure stops the sequence and degrades to a warning.
    async fn initialize_git(&self) -> Option<PostStepWarning> {
        let commands = [
            "git init",
            "git add .",
            "git commit -m \"Initial commit: Express.js project setup\"",
        ];

        for command in commands {
            match self.executor.execute(command, &self.project_root).await {
                Ok(result) if result.is_success() => {}
                Ok(result) => {
                    tracing::warn!(
                        command,
                        exit_code = result.exit_code,
                        stderr = %result.stderr.trim(),
                        "Git initialization failed, but project was created successfully"
                    );
                    return Some(git_warning());
                }
                Err(e) => {
                    tracing::warn!(
                        command,
                        error = %e,
                        "Git initialization failed, but project was created successfully"
                    );
                    return Some(git_warning());
                }
            }
        }
        None
    }

    async fn install_dependencies(&self) -> Option<PostStepWarning> {
        let install = self.executor.execute("npm install", &self.project_root);
        match tokio::time::timeout(INSTALL_TIMEOUT, install).await {
            Ok(Ok(result)) if result.is_success() => None,
            Ok(Ok(result)) => {
                tracing::warn!(
                    exit_code = result.exit_code,
                    stderr = %result.stderr.trim(),
                    "Dependency installation failed, but project was created successfully"
                );
                Some(install_warning())
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    "Dependency installation failed, but project was created successfully"
                );
                Some(install_warning())
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = INSTALL_TIMEOUT.as_secs(),
                    "Dependency installation timed out, but project was created successfully"
                );
                Some(install_warning())
            }
        }
    }
}

fn git_warning() -> PostStepWarning {
    PostStepWarning {
        step: PostStep::GitInit,
        message: "Git initialization failed, but project was created successfully".to_string(),
        remediation: None,
    }
}

fn install_warning() -> PostStepWarning {
    PostStepWarning {
        step: PostStep::DependencyInstall,
        message: "Dependency installation failed, but project was created successfully"
            .to_string(),
        remediation: Some(
            "You can install dependencies manually by running: npm install".to_string(),
        ),
    }
}

fn env_example(name: &str) -> String {
    format!(
        r#"# Server Configuration
NODE_ENV=development
PORT=5000

# Database Configuration
MONGODB_URI=mongodb://localhost:27017/{name}

# JWT Configuration
JWT_SECRET=your-super-secret-jwt-key-here
JWT_EXPIRES_IN=7d
JWT_REFRESH_SECRET=your-super-secret-refresh-key-here
JWT_REFRESH_EXPIRES_IN=30d

# CORS Configuration
CORS_ORIGIN=http://localhost:3000

# Rate Limiting
RATE_LIMIT_WINDOW_MS=900000
RATE_LIMIT_MAX_REQUESTS=100

# Logging
LOG_LEVEL=info

# Security
BCRYPT_SALT_ROUNDS=12
"#
    )
}

fn env_file(name: &str) -> String {
    format!(
        r#"# Server Configuration
NODE_ENV=development
PORT=5000

# Database Configuration
MONGODB_URI=mongodb://localhost:27017/{name}

# JWT Configuration
JWT_SECRET=your-super-secret-jwt-key-here-change-in-production
JWT_EXPIRES_IN=7d
JWT_REFRESH_SECRET=your-super-secret-refresh-key-here-change-in-production
JWT_REFRESH_EXPIRES_IN=30d

# CORS Configuration
CORS_ORIGIN=http://localhost:3000

# Rate Limiting
RATE_LIMIT_WINDOW_MS=900000
RATE_LIMIT_MAX_REQUESTS=100

# Logging
LOG_LEVEL=info

# Security
BCRYPT_SALT_ROUNDS=12
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shell::MockCommandExecutor;
    use crate::core::templates::TemplateKind;
    use crate::core::templates::source::MemoryTemplateSource;
    use tempfile::tempdir;

    fn generator_in(
        output_dir: &Path,
        config: ProjectConfig,
        executor: MockCommandExecutor,
    ) -> ProjectGenerator {
        let registry = Arc::new(TemplateRegistry::builtin().unwrap());
        let renderer = Arc::new(TemplateRenderer::new(
            Arc::clone(&registry),
            Arc::new(MemoryTemplateSource::new()),
        ));
        ProjectGenerator::new(config, registry, renderer, Arc::new(executor), output_dir)
    }

    #[tokio::test]
    async fn test_generate_basic_project_writes_all_files() {
        let output = tempdir().unwrap();
        let mut config = ProjectConfig::new("my-api", TemplateKind::Basic);
        config.install = false;

        let generator = generator_in(output.path(), config, MockCommandExecutor::new());
        assert_eq!(generator.phase(), GenerationPhase::Idle);

        let report = generator.generate().await.unwrap();

        // 12 template files plus the two env files
        assert_eq!(report.files_written, 14);
        assert!(report.warnings.is_empty());
        assert_eq!(generator.phase(), GenerationPhase::Done);

        let root = output.path().join("my-api");
        assert!(root.join("src/app.ts").exists());
        assert!(root.join("src/app/config/index.ts").exists());
        assert!(root.join("tsconfig.json").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(root.join("package.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["name"], "my-api");
        assert_eq!(manifest["dependencies"]["express"], "^4.18.2");
    }

    #[tokio::test]
    async fn test_env_files_reference_project_name() {
        let output = tempdir().unwrap();
        let mut config = ProjectConfig::new("my-api", TemplateKind::Basic);
        config.install = false;

        let generator = generator_in(output.path(), config, MockCommandExecutor::new());
        generator.generate().await.unwrap();

        let root = output.path().join("my-api");
        let example = std::fs::read_to_string(root.join(".env.example")).unwrap();
        let env = std::fs::read_to_string(root.join(".env")).unwrap();

        assert!(example.contains("MONGODB_URI=mongodb://localhost:27017/my-api"));
        assert!(example.contains("BCRYPT_SALT_ROUNDS=12"));
        assert!(env.contains("change-in-production"));
    }

    #[tokio::test]
    async fn test_generate_fails_when_directory_exists() {
        let output = tempdir().unwrap();
        std::fs::create_dir(output.path().join("my-api")).unwrap();

        let mut config = ProjectConfig::new("my-api", TemplateKind::Basic);
        config.install = false;
        let generator = generator_in(output.path(), config, MockCommandExecutor::new());

        let error = generator.generate().await.unwrap_err();
        assert!(matches!(error, Error::AlreadyExists(_)));
        assert_eq!(error.to_string(), "Directory \"my-api\" already exists");
        assert_eq!(generator.phase(), GenerationPhase::Failed);

        // The pre-existing directory must be left untouched.
        let entries: Vec<_> = std::fs::read_dir(output.path().join("my-api"))
            .unwrap()
            .collect();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_template_fails_before_touching_disk() {
        let output = tempdir().unwrap();
        let mut config = ProjectConfig::new("my-api", TemplateKind::Basic);
        config.template = "fancy".to_string();
        config.install = false;

        let generator = generator_in(output.path(), config, MockCommandExecutor::new());
        let error = generator.generate().await.unwrap_err();

        assert!(matches!(error, Error::TemplateNotFound { .. }));
        assert!(!output.path().join("my-api").exists());
        assert_eq!(generator.phase(), GenerationPhase::Failed);
    }

    #[tokio::test]
    async fn test_git_failure_is_a_warning_not_an_error() {
        let output = tempdir().unwrap();
        let mut config = ProjectConfig::new("my-api", TemplateKind::Basic);
        config.git = true;
        config.install = false;

        let executor = MockCommandExecutor::new().with_result("git init", 1, "", "git not found");
        let generator = generator_in(output.path(), config, executor);

        let report = generator.generate().await.unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].step, PostStep::GitInit);
        assert!(report.warnings[0].message.contains("project was created successfully"));
        assert!(output.path().join("my-api/src/app.ts").exists());
    }

    #[tokio::test]
    async fn test_install_failure_warns_with_remediation() {
        let output = tempdir().unwrap();
        let config = ProjectConfig::new("my-api", TemplateKind::Basic);

        let executor =
            MockCommandExecutor::new().with_result("npm install", 1, "", "npm not found");
        let generator = generator_in(output.path(), config, executor);

        let report = generator.generate().await.unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].step, PostStep::DependencyInstall);
        assert_eq!(
            report.warnings[0].remediation.as_deref(),
            Some("You can install dependencies manually by running: npm install")
        );
    }

    #[tokio::test]
    async fn test_successful_post_steps_produce_no_warnings() {
        let output = tempdir().unwrap();
        let mut config = ProjectConfig::new("my-api", TemplateKind::Full);
        config.git = true;

        let executor = MockCommandExecutor::new()
            .with_result("git init", 0, "", "")
            .with_result("git add .", 0, "", "")
            .with_result(
                "git commit -m \"Initial commit: Express.js project setup\"",
                0,
                "",
                "",
            )
            .with_result("npm install", 0, "added 200 packages", "");
        let generator = generator_in(output.path(), config, executor);

        let report = generator.generate().await.unwrap();
        assert!(report.warnings.is_empty());
        // 34 template files plus the two env files
        assert_eq!(report.files_written, 36);
        assert!(output.path().join("my-api/docker-compose.yml").exists());
    }
}
