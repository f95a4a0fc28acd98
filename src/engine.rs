//! Template engine adapter.
//! Configures a MiniJinja environment with a chain of resource loaders and
//! a log sink, and evaluates template text against [`Bindings`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;
use minijinja::{AutoEscape, Environment, ErrorKind};

use crate::bindings::Bindings;
use crate::constants::EVALUATION_NAME;
use crate::encoding::{platform_default, write_text};
use crate::error::{Error, Result};
use crate::logger::{HostLog, LogSink};
use crate::resources::{EmbeddedResources, ResourceLoader, EMBEDDED_LOADER, FALLBACK_LOADER};

/// Builder for [`Engine`] instances.
///
/// Every call to [`with_file_loader`](Self::with_file_loader) registers a
/// separate loader (`file0`, `file1`, ...). The embedded and fallback loaders
/// are registered at most once, and the fallback loader always ends up last.
pub struct EngineBuilder {
    loaders: Vec<ResourceLoader>,
    file_loader_count: usize,
    sink: Arc<dyn LogSink>,
    encoding: &'static Encoding,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
            file_loader_count: 0,
            sink: Arc::new(HostLog::default()),
            encoding: platform_default(),
        }
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Encoding used by filesystem loaders to read referenced templates.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Registers a loader reading from the given directories, in order.
    pub fn with_file_loader<I, P>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let name = format!("file{}", self.file_loader_count);
        self.file_loader_count += 1;
        self.loaders.push(ResourceLoader::Filesystem {
            name,
            roots: directories.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_embedded_loader(mut self, resources: Arc<EmbeddedResources>) -> Self {
        if !self.has_loader(EMBEDDED_LOADER) {
            self.loaders.push(ResourceLoader::Embedded(resources));
        }
        self
    }

    pub fn with_fallback_loader(mut self) -> Self {
        if !self.has_loader(FALLBACK_LOADER) {
            self.loaders.push(ResourceLoader::Fallback);
        }
        self
    }

    fn has_loader(&self, name: &str) -> bool {
        self.loaders.iter().any(|loader| loader.name() == name)
    }

    /// Names of the registered loaders, in resolution order.
    pub fn loader_names(&self) -> Vec<&str> {
        self.loaders.iter().map(ResourceLoader::name).collect()
    }

    pub fn build(self) -> Engine {
        let mut loaders: Vec<ResourceLoader> = self
            .loaders
            .into_iter()
            .filter(|loader| !matches!(loader, ResourceLoader::Fallback))
            .collect();
        loaders.push(ResourceLoader::Fallback);

        let loader_names: Vec<String> =
            loaders.iter().map(|loader| loader.name().to_string()).collect();
        self.sink.debug(&format!(
            "Initializing template engine with resource loaders: {}",
            loader_names.join(", ")
        ));

        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let chain = Arc::new(loaders);
        let sink = Arc::clone(&self.sink);
        let encoding = self.encoding;
        env.set_loader(move |name| {
            for loader in chain.iter() {
                match loader.resolve(name, encoding, &*sink) {
                    Ok(Some(source)) => {
                        sink.debug(&format!("Resolved '{name}' with loader '{}'", loader.name()));
                        return Ok(Some(source));
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        return Err(minijinja::Error::new(
                            ErrorKind::InvalidOperation,
                            format!("failed to load '{name}'"),
                        )
                        .with_source(err));
                    }
                }
            }
            Ok(None)
        });

        Engine { env, sink: self.sink, loader_names }
    }
}

/// A configured template engine, read-only once built.
pub struct Engine {
    env: Environment<'static>,
    sink: Arc<dyn LogSink>,
    loader_names: Vec<String>,
}

impl Engine {
    /// Names of the resource loaders, in resolution order.
    pub fn loader_names(&self) -> &[String] {
        &self.loader_names
    }

    /// Evaluates `template` against `bindings`.
    ///
    /// # Errors
    /// * `Error::TemplateEvaluationError` for syntax errors and failures raised
    ///   during evaluation. An unresolved `{% include %}` is not an error: the
    ///   fallback loader substitutes empty content.
    pub fn render(&self, template: &str, bindings: &Bindings) -> Result<String> {
        self.env.render_named_str(EVALUATION_NAME, template, bindings).map_err(|err| {
            self.sink.error("Failed to evaluate template", Some(&err));
            Error::TemplateEvaluationError { name: EVALUATION_NAME.to_string(), source: err }
        })
    }

    /// Evaluates `template` and writes the result to `out` in `encoding`.
    pub fn evaluate<W: Write>(
        &self,
        template: &str,
        bindings: &Bindings,
        out: W,
        encoding: &'static Encoding,
    ) -> Result<()> {
        let rendered = self.render(template, bindings)?;
        write_text(out, &rendered, encoding).map_err(Error::IoError)
    }

    /// Evaluates `template` into the file at `path`, replacing any previous
    /// content. The file is flushed and closed before returning.
    pub fn evaluate_to_file<P: AsRef<Path>>(
        &self,
        template: &str,
        bindings: &Bindings,
        path: P,
        encoding: &'static Encoding,
    ) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render(template, bindings)?;
        let file = File::create(path)
            .map_err(|source| Error::FileWriteError { path: path.to_path_buf(), source })?;
        write_text(BufWriter::new(file), &rendered, encoding)
            .map_err(|source| Error::FileWriteError { path: path.to_path_buf(), source })
    }
}
