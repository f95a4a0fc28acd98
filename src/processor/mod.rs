//! Core template processing orchestration.
//!
//! - [`TransformProcessor`] applies templates to single output files
//!   (the `render` command).
//! - [`FileSetProcessor`] applies one template to every file of a file set
//!   (the `apply` command).
//!
//! Both run strictly sequentially and stop at the first error. Outputs
//! written before the error are left in place.

use std::path::Path;

use crate::error::{Error, Result};

pub mod apply;
pub mod transform;

pub use apply::{ApplyTemplate, FileSetProcessor};
pub use transform::{Transformation, TransformProcessor};

/// Creates the parent directory of `file` (and its ancestors) if missing.
///
/// # Errors
/// * `Error::DirectoryCreationError` naming the directory that could not be
///   created
pub fn ensure_parent_dir<P: AsRef<Path>>(file: P) -> Result<()> {
    let Some(parent) = file.as_ref().parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(parent)
        .map_err(|source| Error::DirectoryCreationError { path: parent.to_path_buf(), source })
}
