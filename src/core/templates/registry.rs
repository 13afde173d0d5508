//! Template catalog and composition.
//!
//! The registry holds every known [`TemplateDefinition`]: an ordered list of
//! file descriptors plus the npm dependency maps that end up in the
//! generated manifest. Definitions are registered once at startup from
//! [`TemplateBlueprint`]s and are immutable afterwards; a blueprint may
//! extend an already-registered base, in which case [`compose`] appends the
//! blueprint's files to the base's (never reordering them) and merges the
//! dependency maps with the blueprint's keys winning on conflict.

// Internal imports (std, crate)
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Pairing of an output path with the template source that produces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Path of the generated file, relative to the project root
    pub target_path: String,
    /// Identifier of the template source rendered into it
    pub template_id: String,
}

impl FileDescriptor {
    /// Create a new file descriptor
    pub fn new<T: Into<String>, S: Into<String>>(target_path: T, template_id: S) -> Self {
        Self {
            target_path: target_path.into(),
            template_id: template_id.into(),
        }
    }
}

/// One scaffold variant: named file list plus dependency metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Unique template name
    pub name: String,
    /// Human-readable description shown by the `templates` command
    pub description: String,
    /// Ordered files to generate; order is preserved across composition
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    /// npm runtime dependencies (name to version range)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// npm development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

/// Registration-time description of a template, optionally extending a base
#[derive(Debug, Clone, Default)]
pub struct TemplateBlueprint {
    pub name: String,
    pub description: String,
    /// Name of an already-registered template to extend
    pub extends: Option<String>,
    /// Files appended after the base's files
    pub files: Vec<FileDescriptor>,
    /// Dependencies merged over the base's; these keys win on conflict
    pub dependencies: BTreeMap<String, String>,
    /// Dev dependencies merged over the base's; these keys win on conflict
    pub dev_dependencies: BTreeMap<String, String>,
}

/// Name/description pair returned by [`TemplateRegistry::list`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
}

/// Compose a derived definition from a base and a blueprint.
///
/// Returns a new immutable definition: the base's files (in their original
/// order) followed by the blueprint's own files, and the base's dependency
/// maps merged with the blueprint's (blueprint keys win). Neither input is
/// mutated.
pub fn compose(base: &TemplateDefinition, blueprint: TemplateBlueprint) -> TemplateDefinition {
    let mut files = base.files.clone();
    files.extend(blueprint.files);

    let mut dependencies = base.dependencies.clone();
    dependencies.extend(blueprint.dependencies);

    let mut dev_dependencies = base.dev_dependencies.clone();
    dev_dependencies.extend(blueprint.dev_dependencies);

    TemplateDefinition {
        name: blueprint.name,
        description: blueprint.description,
        files,
        dependencies,
        dev_dependencies,
    }
}

/// Catalog of known templates, read-only after initialization
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<TemplateDefinition>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the stock catalog of `basic`, `auth`, and `full` templates
    pub fn builtin() -> Result<Self> {
        // Template ids mirror the target path with a `.tera` suffix.
        fn fd(path: &str) -> FileDescriptor {
            FileDescriptor::new(path, format!("{path}.tera"))
        }

        fn deps(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(name, version)| (name.to_string(), version.to_string()))
                .collect()
        }

        let mut registry = Self::new();

        registry.register(TemplateBlueprint {
            name: "basic".to_string(),
            description: "Minimal Express.js setup with TypeScript".to_string(),
            extends: None,
            files: vec![
                fd("src/app.ts"),
                fd("src/server.ts"),
                fd("src/app/config/index.ts"),
                fd("src/app/constants.ts"),
                fd("src/app/middlewares/error-handler.ts"),
                fd("src/app/middlewares/not-found.ts"),
                fd("src/app/routes/index.ts"),
                fd("src/@types/index.d.ts"),
                fd("tsconfig.json"),
                fd("package.json"),
                fd(".gitignore"),
                fd("README.md"),
            ],
            dependencies: deps(&[
                ("express", "^4.18.2"),
                ("dotenv", "^16.4.4"),
                ("cors", "^2.8.5"),
                ("express-async-errors", "^3.1.1"),
                ("http-status-codes", "^2.3.0"),
            ]),
            dev_dependencies: deps(&[
                ("@types/express", "^4.17.13"),
                ("@types/node", "^20.10.0"),
                ("@types/cors", "^2.8.17"),
                ("typescript", "^5.3.2"),
                ("ts-node", "^10.9.1"),
                ("nodemon", "^3.1.7"),
            ]),
        })?;

        registry.register(TemplateBlueprint {
            name: "auth".to_string(),
            description: "Express.js with authentication middleware".to_string(),
            extends: Some("basic".to_string()),
            files: vec![
                fd("src/app/middlewares/authentication.ts"),
                fd("src/app/modules/user/user.model.ts"),
                fd("src/app/modules/user/user.type.ts"),
                fd("src/app/modules/auth/auth.controller.ts"),
                fd("src/app/modules/auth/auth.service.ts"),
                fd("src/app/modules/auth/auth.route.ts"),
                fd("src/app/modules/auth/auth.type.ts"),
                fd("src/app/shared/createJWT.ts"),
                fd("src/app/shared/sendResponse.ts"),
                fd("src/app/shared/setCookie.ts"),
                fd("src/app/shared/userTokens.ts"),
                fd("src/app/errors/bad-request.ts"),
                fd("src/app/errors/custom-api.ts"),
                fd("src/app/errors/forbidden.ts"),
                fd("src/app/errors/not-found.ts"),
                fd("src/app/errors/unauthenticated.ts"),
            ],
            dependencies: deps(&[
                ("mongoose", "^8.2.1"),
                ("bcrypt", "^5.1.1"),
                ("jsonwebtoken", "^9.0.2"),
                ("@types/bcrypt", "^5.0.2"),
                ("@types/jsonwebtoken", "^9.0.2"),
            ]),
            dev_dependencies: BTreeMap::new(),
        })?;

        registry.register(TemplateBlueprint {
            name: "full".to_string(),
            description: "Complete setup with all features".to_string(),
            extends: Some("auth".to_string()),
            files: vec![
                fd("src/app/shared/QueryBuilder.ts"),
                fd("jest.config.js"),
                fd(".eslintrc.js"),
                fd(".prettierrc"),
                fd("Dockerfile"),
                fd("docker-compose.yml"),
            ],
            dependencies: deps(&[
                ("morgan", "^1.10.0"),
                ("@types/morgan", "^1.9.9"),
                ("joi", "^17.11.0"),
                ("@types/joi", "^17.2.3"),
                ("helmet", "^7.1.0"),
                ("express-rate-limit", "^7.1.5"),
                ("express-promise-router", "^4.1.1"),
            ]),
            dev_dependencies: deps(&[
                ("jest", "^29.7.0"),
                ("ts-jest", "^29.1.1"),
                ("@types/jest", "^29.5.8"),
                ("supertest", "^6.3.3"),
                ("@types/supertest", "^2.0.16"),
                ("eslint", "^8.54.0"),
                ("@typescript-eslint/eslint-plugin", "^6.13.0"),
                ("@typescript-eslint/parser", "^6.13.0"),
                ("prettier", "^3.1.0"),
                ("cpx", "^1.5.0"),
            ]),
        })?;

        Ok(registry)
    }

    /// Register a blueprint, composing it with its base when one is named.
    ///
    /// Fails when the name is already taken, the base is unknown, or the
    /// composed file list violates the descriptor invariants (duplicate or
    /// unsafe target paths).
    pub fn register(&mut self, blueprint: TemplateBlueprint) -> Result<()> {
        if self.templates.iter().any(|t| t.name == blueprint.name) {
            return Err(Error::registry(format!(
                "duplicate template name \"{}\"",
                blueprint.name
            )));
        }

        let definition = match blueprint.extends.clone() {
            Some(base_name) => {
                let base = self.templates.iter().find(|t| t.name == base_name).ok_or_else(|| {
                    Error::registry(format!(
                        "template \"{}\" extends unknown base \"{base_name}\"",
                        blueprint.name
                    ))
                })?;
                compose(base, blueprint)
            }
            None => TemplateDefinition {
                name: blueprint.name,
                description: blueprint.description,
                files: blueprint.files,
                dependencies: blueprint.dependencies,
                dev_dependencies: blueprint.dev_dependencies,
            },
        };

        validate_definition(&definition)?;
        self.templates.push(definition);
        Ok(())
    }

    /// Look up a template by name.
    ///
    /// The error message enumerates every registered name so callers can
    /// see what is available.
    pub fn get(&self, name: &str) -> Result<&TemplateDefinition> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::TemplateNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// List name/description pairs in registration order
    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|t| TemplateSummary {
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect()
    }

    /// Registered template names in registration order
    pub fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }
}

fn validate_definition(definition: &TemplateDefinition) -> Result<()> {
    let mut seen = HashSet::new();
    for file in &definition.files {
        if !seen.insert(file.target_path.as_str()) {
            return Err(Error::registry(format!(
                "duplicate target path \"{}\" in template \"{}\"",
                file.target_path, definition.name
            )));
        }
        if !target_path_is_safe(&file.target_path) {
            return Err(Error::registry(format!(
                "invalid target path \"{}\" in template \"{}\": paths must be relative and must not traverse upward",
                file.target_path, definition.name
            )));
        }
    }
    Ok(())
}

// Target paths are joined under the project root, so anything absolute or
// containing a parent component could escape it.
fn target_path_is_safe(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
