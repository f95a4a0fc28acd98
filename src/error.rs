//! Error handling for the Stencil application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for Stencil operations.
///
/// Every variant is fatal to the run that produced it. Variants that relate
/// to a file carry its path so the failure can be diagnosed without
/// re-running in verbose mode.
#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter is missing or invalid
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Neither the embedded resources nor the filesystem contain the template
    #[error("Template '{reference}' was not found as an embedded resource or as a file.")]
    TemplateNotFoundError { reference: String },

    /// The parent directory of an output file could not be created
    #[error("Failed to create directory '{}': {source}.", path.display())]
    DirectoryCreationError { path: PathBuf, source: io::Error },

    /// An input file or template could not be read
    #[error("Failed to read '{}': {source}.", path.display())]
    FileReadError { path: PathBuf, source: io::Error },

    /// An output file could not be written
    #[error("Failed to write '{}': {source}.", path.display())]
    FileWriteError { path: PathBuf, source: io::Error },

    /// The template engine failed to evaluate a template
    #[error("Failed to apply template '{name}': {source}.")]
    TemplateEvaluationError { name: String, source: minijinja::Error },

    /// The include/exclude patterns or the path mapper could not be applied
    #[error("Failed to map files of '{}': {reason}.", directory.display())]
    FileSetMatchingError { directory: PathBuf, reason: String },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
