//! Stencil applies text templates to files.
//! It renders single templates to output files and applies one template to
//! every file of an include/exclude file set, binding file content, paths,
//! project metadata, system properties and the environment.

/// Ambient context: project metadata, system properties and environment
pub mod ambient;

/// Layered variable bindings for template evaluation
pub mod bindings;

/// Command-line interface module for the Stencil application
pub mod cli;

/// Configuration handling
/// Supports JSON and YAML formats (stencil.yaml, stencil.yml, stencil.json)
pub mod config;

pub mod constants;

/// Character set resolution and encoded file I/O
pub mod encoding;

/// MiniJinja engine adapter with resource-loader chain and log sink
pub mod engine;

/// Error types and handling for the Stencil application
pub mod error;

/// Include/exclude file sets
pub mod fileset;

/// Logger setup and the log sink capability
pub mod logger;

/// Input to output path mappers
pub mod mapper;

/// Lexical relative path computation
pub mod paths;

/// Core template processing orchestration
/// Combines all components to produce the output files
pub mod processor;

/// Embedded resources and resource loaders
pub mod resources;

/// Template reference resolution
pub mod template;
