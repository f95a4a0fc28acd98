//! Resolution of a template reference to its text.
//! A reference is looked up as an embedded resource first and as a file
//! second; the first strategy that finds it wins.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::encoding;
use crate::error::{Error, Result};
use crate::logger::LogSink;
use crate::resources::EmbeddedResources;

/// Where a template was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Embedded resource with the given name
    Embedded(String),
    /// File at the given path
    FileSystem(PathBuf),
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateOrigin::Embedded(name) => write!(f, "embedded resource: '{name}'"),
            TemplateOrigin::FileSystem(path) => write!(f, "local path: '{}'", path.display()),
        }
    }
}

/// A resolved template.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub text: String,
    pub origin: TemplateOrigin,
}

impl LoadedTemplate {
    /// Directory that sub-template references of a file template resolve
    /// against; `None` for embedded templates.
    pub fn directory(&self) -> Option<PathBuf> {
        match &self.origin {
            TemplateOrigin::Embedded(_) => None,
            TemplateOrigin::FileSystem(path) => Some(
                path.parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            ),
        }
    }
}

/// Loads templates from embedded resources or the filesystem.
pub struct TemplateLoader {
    resources: Arc<EmbeddedResources>,
    encoding: &'static Encoding,
    sink: Arc<dyn LogSink>,
}

impl TemplateLoader {
    pub fn new(
        resources: Arc<EmbeddedResources>,
        encoding: &'static Encoding,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self { resources, encoding, sink }
    }

    pub fn resources(&self) -> &Arc<EmbeddedResources> {
        &self.resources
    }

    /// Resolves `reference`.
    ///
    /// # Arguments
    /// * `reference` - Embedded resource name or file path
    /// * `base_dir` - Directory a relative file path is resolved against;
    ///   the working directory when `None`
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if neither strategy finds the reference
    /// * `Error::FileReadError` if the file exists but cannot be read
    pub fn load(&self, reference: &str, base_dir: Option<&Path>) -> Result<LoadedTemplate> {
        if let Some(text) = self.resources.get(reference) {
            self.sink.debug(&format!("Using resource called {reference}"));
            return Ok(LoadedTemplate {
                text: text.to_string(),
                origin: TemplateOrigin::Embedded(reference.trim_start_matches('/').to_string()),
            });
        }

        self.sink
            .debug(&format!("Could not find a resource called {reference}, trying as a file name"));
        let path = match base_dir {
            Some(base_dir) => base_dir.join(reference),
            None => PathBuf::from(reference),
        };
        if !path.is_file() {
            return Err(Error::TemplateNotFoundError { reference: path.display().to_string() });
        }

        let text = encoding::read_to_string(&path, self.encoding)?;
        Ok(LoadedTemplate { text, origin: TemplateOrigin::FileSystem(path) })
    }
}
