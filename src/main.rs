//! scaffex CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.
#![deny(unsafe_code)]
mod core;

// Internal imports (std, crate)
use crate::core::config::{ProjectConfig, UserDefaults};
use crate::core::generator::ProjectGenerator;
use crate::core::metrics::MetricsStore;
use crate::core::shell::ShellCommandExecutor;
use crate::core::templates::{FsTemplateSource, TemplateKind, TemplateRegistry, TemplateRenderer};
use crate::core::validate::ensure_valid_project_name;
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "scaffex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new Express.js + TypeScript project
    New {
        /// Name of the project directory to create
        project_name: String,
        /// Template to scaffold from (basic, auth, full)
        #[arg(long, short, default_value = "full")]
        template: String,
        /// Project description for the generated manifest and readme
        #[arg(long)]
        description: Option<String>,
        /// Author recorded in the generated manifest
        #[arg(long)]
        author: Option<String>,
        /// License identifier for the generated project
        #[arg(long)]
        license: Option<String>,
        /// Repository URL for the generated manifest
        #[arg(long)]
        repository: Option<Url>,
        /// Initialize a git repository with an initial commit
        #[arg(long)]
        git: bool,
        /// Skip installing npm dependencies after generation
        #[arg(long)]
        no_install: bool,
        /// Directory to create the project under (defaults to the working directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Custom template directory
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },
    /// List available project templates
    Templates,
    /// Show or reset persisted usage metrics
    Stats {
        /// Reset all recorded metrics
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::New {
            project_name,
            template,
            description,
            author,
            license,
            repository,
            git,
            no_install,
            output_dir,
            template_dir,
        } => {
            run_new(NewParams {
                project_name,
                template,
                description,
                author,
                license,
                repository,
                git: *git,
                no_install: *no_install,
                output_dir,
                template_dir,
            })
            .await?
        }
        Commands::Templates => run_templates()?,
        Commands::Stats { reset } => run_stats(*reset)?,
    }
    Ok(())
}

/// Parameters for project generation
struct NewParams<'a> {
    project_name: &'a str,
    template: &'a str,
    description: &'a Option<String>,
    author: &'a Option<String>,
    license: &'a Option<String>,
    repository: &'a Option<Url>,
    git: bool,
    no_install: bool,
    output_dir: &'a Option<PathBuf>,
    template_dir: &'a Option<PathBuf>,
}

/// Generate a new project from a template
async fn run_new(params: NewParams<'_>) -> anyhow::Result<()> {
    // Validate the name before any side effect
    ensure_valid_project_name(params.project_name)?;

    // Parse template
    let template_kind: TemplateKind = params
        .template
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid template '{}': {}", params.template, e))?;

    // Resolve configuration: stock defaults, then the user defaults
    // file, then command-line flags
    let mut config = ProjectConfig::new(params.project_name, template_kind);
    let user_defaults = UserDefaults::load().context("Failed to load user defaults")?;
    user_defaults.apply(&mut config);

    if let Some(description) = params.description {
        config.description = description.clone();
    }
    if let Some(author) = params.author {
        config.author = author.clone();
    }
    if let Some(license) = params.license {
        config.license = license.clone();
    }
    if let Some(repository) = params.repository {
        config.repository = Some(repository.to_string());
    }
    config.git = params.git;
    config.install = !params.no_install;

    let install = config.install;
    let template_name = config.template.clone();

    info!(
        project_name = %config.name,
        template = %template_name,
        "Generating project"
    );

    // Wire up the generation pipeline
    let registry = Arc::new(TemplateRegistry::builtin()?);
    let source = FsTemplateSource::discover(params.template_dir.as_deref());
    let renderer = Arc::new(TemplateRenderer::new(
        Arc::clone(&registry),
        Arc::new(source),
    ));
    let output_dir = params
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let generator = ProjectGenerator::new(
        config,
        registry,
        Arc::clone(&renderer),
        Arc::new(ShellCommandExecutor::new()),
        &output_dir,
    );

    let report = generator.generate().await?;

    for warning in &report.warnings {
        warn!(step = %warning.step, "{}", warning.message);
        println!("⚠️  {}", warning.message);
        if let Some(remediation) = &warning.remediation {
            println!("💡 {}", remediation);
        }
    }

    // Record usage metrics; failures here never fail the run
    let mut metrics = MetricsStore::load_default();
    metrics.record_generation(&template_name, report.elapsed, renderer.cache_hit_rate());

    info!(
        project_root = %report.project_root.display(),
        files = report.files_written,
        "Successfully generated project"
    );
    println!("✅ Project created successfully!");
    show_next_steps(params.project_name, install);
    Ok(())
}

/// List the registry catalog in registration order
fn run_templates() -> anyhow::Result<()> {
    let registry = TemplateRegistry::builtin()?;

    println!("Available templates:");
    for summary in registry.list() {
        println!("  • {} - {}", summary.name, summary.description);
    }
    Ok(())
}

/// Display or reset the persisted usage metrics
fn run_stats(reset: bool) -> anyhow::Result<()> {
    let mut store = MetricsStore::load_default();

    if reset {
        store.reset();
        println!("✅ Usage metrics reset");
        return Ok(());
    }

    let metrics = store.metrics();
    println!("📊 CLI usage metrics:");
    println!("Total projects created: {}", metrics.total_projects);
    println!(
        "Average generation time: {:.0}ms",
        metrics.average_generation_time
    );
    println!("Cache hit rate: {:.0}%", metrics.cache_hit_rate);
    if !metrics.last_project_created.is_empty() {
        println!("Last project created: {}", metrics.last_project_created);
    }

    if !metrics.templates_used.is_empty() {
        println!("\nTemplate usage:");
        let mut usage: Vec<_> = metrics.templates_used.iter().collect();
        usage.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (template, count) in usage {
            println!("  • {template}: {count} projects");
        }
    }
    Ok(())
}

/// Print the follow-up commands for a freshly generated project
fn show_next_steps(project_name: &str, installed: bool) {
    println!("\n📋 Next steps:\n");

    let mut steps = vec![("Navigate to your project", format!("cd {project_name}"))];
    if !installed {
        steps.push(("Install dependencies", "npm install".to_string()));
    }
    steps.push(("Start development server", "npm run dev".to_string()));
    steps.push(("Open in browser", "http://localhost:5000".to_string()));

    for (index, (title, command)) in steps.iter().enumerate() {
        println!("{}. {title}", index + 1);
        println!("   {command}\n");
    }
}
