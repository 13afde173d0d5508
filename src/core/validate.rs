//! Business rules for project names.
//!
//! Names follow the npm package name rules: lowercase, URL-safe
//! characters, no leading period or underscore, reserved words rejected,
//! at most 214 characters. Violations are collected into a report rather
//! than short-circuiting so the caller can show every problem at once.

// Internal imports (std, crate)
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{Error, Result};

/// Names that collide with npm artifacts
const RESERVED_WORDS: [&str; 4] = ["node_modules", "package", "package.json", "package-lock.json"];

// Case handled separately so capital letters get their own message.
static URL_SAFE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-_.~]+$").expect("name pattern is valid"));

/// Outcome of validating one project name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate a project name against the npm-style naming rules
pub fn validate_project_name(name: &str) -> ValidationReport {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        return ValidationReport {
            valid: false,
            errors: vec!["Project name is required".to_string()],
        };
    }

    if name.starts_with('.') || name.starts_with('_') {
        errors.push("Project name cannot start with a period or an underscore".to_string());
    }

    if name.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Project name cannot contain capital letters".to_string());
    }

    if !URL_SAFE_NAME.is_match(name) {
        errors.push(
            "Project name can contain only lowercase letters, digits, and the characters - _ . ~"
                .to_string(),
        );
    }

    if RESERVED_WORDS.contains(&name.to_lowercase().as_str()) {
        errors.push(format!(
            "\"{name}\" is a reserved word and cannot be used as a project name"
        ));
    }

    if name.chars().count() > 214 {
        errors.push("Project name cannot be longer than 214 characters".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validate a name, turning any violations into a fatal error
pub fn ensure_valid_project_name(name: &str) -> Result<()> {
    let report = validate_project_name(name);
    if report.valid {
        Ok(())
    } else {
        Err(Error::Validation(report.errors))
    }
}
