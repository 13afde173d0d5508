//! Scaffex Core Library
//!
//! This library provides the core functionality for scaffolding
//! Express.js + TypeScript projects from templates.

pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod shell;
pub mod templates;
pub mod validate;

pub use error::Error;
