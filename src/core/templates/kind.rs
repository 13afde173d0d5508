//! Template kind definitions for scaffex.
//!
//! This module defines the stock scaffold variants the CLI can be asked
//! for. Kinds parse from the command line and map onto registry entries of
//! the same name; the registry remains string-keyed so user-defined
//! catalogs are not limited to these variants.
//!
//! # Examples
//!
//! ```text
//! let kind = TemplateKind::from_str("auth").unwrap();
//! assert_eq!(kind.as_str(), "auth");
//! assert_eq!(TemplateKind::default(), TemplateKind::Full);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

/// Stock scaffold variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateKind {
    /// Minimal Express.js setup with TypeScript
    Basic,
    /// Express.js with authentication middleware
    Auth,
    /// Complete setup with all features
    #[default]
    Full,
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(TemplateKind::Basic),
            "auth" => Ok(TemplateKind::Auth),
            "full" => Ok(TemplateKind::Full),
            _ => Err(format!("Unknown template kind: {s}")),
        }
    }
}

impl TemplateKind {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Auth => "auth",
            Self::Full => "full",
        }
    }

    /// Returns an iterator over all stock template kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateKind::*;
        [Basic, Auth, Full].iter().copied()
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_as_str() {
        assert_eq!(TemplateKind::Basic.as_str(), "basic");
        assert_eq!(TemplateKind::Auth.as_str(), "auth");
        assert_eq!(TemplateKind::Full.as_str(), "full");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TemplateKind::Basic), "basic");
        assert_eq!(format!("{}", TemplateKind::Auth), "auth");
        assert_eq!(format!("{}", TemplateKind::Full), "full");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("basic".parse::<TemplateKind>().unwrap(), TemplateKind::Basic);
        assert_eq!("auth".parse::<TemplateKind>().unwrap(), TemplateKind::Auth);
        assert_eq!("full".parse::<TemplateKind>().unwrap(), TemplateKind::Full);

        // Test case insensitivity
        assert_eq!("FULL".parse::<TemplateKind>().unwrap(), TemplateKind::Full);

        // Test invalid variants
        assert!("invalid".parse::<TemplateKind>().is_err());
        assert!("fullstack".parse::<TemplateKind>().is_err());
    }

    #[test]
    fn test_default_is_full() {
        assert_eq!(TemplateKind::default(), TemplateKind::Full);
    }

    #[test]
    fn test_all() {
        let all_kinds: Vec<_> = TemplateKind::all().collect();
        assert_eq!(all_kinds.len(), 3);

        let unique_kinds: HashSet<_> = TemplateKind::all().collect();
        assert_eq!(unique_kinds.len(), 3);

        assert!(unique_kinds.contains(&TemplateKind::Basic));
        assert!(unique_kinds.contains(&TemplateKind::Auth));
        assert!(unique_kinds.contains(&TemplateKind::Full));
    }
}
