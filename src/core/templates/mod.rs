//! Template system for project scaffolding.
//!
//! This module provides the template system used by Scaffex to generate
//! Express.js project files. It includes the template registry, render
//! data handling, render caching, and the two-tier renderer that falls
//! back to built-in content when no source file is available.
//!
//! The template system supports:
//! - Built-in template definitions (basic, auth, full) with composition
//! - Template source discovery on disk with an override chain
//! - Structural render caching with a sliding expiry window
//! - Deterministic default content for files without a source template

pub mod cache;
pub mod context;
pub mod defaults;
pub mod kind;
pub mod registry;
pub mod renderer;
pub mod source;

pub use cache::*;
pub use context::*;
pub use kind::*;
pub use registry::*;
pub use renderer::*;
pub use source::*;
