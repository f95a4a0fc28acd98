//! Single-transform processing: one template, one output file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;
use serde::Deserialize;

use crate::ambient::AmbientContext;
use crate::bindings::BindingsBuilder;
use crate::engine::EngineBuilder;
use crate::error::Result;
use crate::logger::LogSink;
use crate::processor::ensure_parent_dir;
use crate::resources::EmbeddedResources;
use crate::template::{TemplateLoader, TemplateOrigin};

/// A template reference paired with the file it renders to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub template: String,
    pub output_file: PathBuf,
}

impl Transformation {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(template: S, output_file: P) -> Self {
        Self { template: template.into(), output_file: output_file.into() }
    }
}

/// Applies transformations, binding only the ambient context.
pub struct TransformProcessor<'a> {
    loader: TemplateLoader,
    ambient: &'a AmbientContext,
    encoding: &'static Encoding,
    sink: Arc<dyn LogSink>,
}

impl<'a> TransformProcessor<'a> {
    pub fn new(
        resources: Arc<EmbeddedResources>,
        ambient: &'a AmbientContext,
        encoding: &'static Encoding,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            loader: TemplateLoader::new(resources, encoding, Arc::clone(&sink)),
            ambient,
            encoding,
            sink,
        }
    }

    /// Runs the optional primary transformation followed by `transformations`,
    /// in order, stopping at the first failure.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Output files written, in order
    pub fn run(
        &self,
        primary: Option<&Transformation>,
        transformations: &[Transformation],
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for transformation in primary.into_iter().chain(transformations) {
            self.transform(transformation)?;
            written.push(transformation.output_file.clone());
        }
        Ok(written)
    }

    /// Renders one template into its output file.
    pub fn transform(&self, transformation: &Transformation) -> Result<()> {
        let output_file: &Path = &transformation.output_file;
        ensure_parent_dir(output_file)?;

        let template = self.loader.load(&transformation.template, None)?;

        let builder = EngineBuilder::new()
            .with_log_sink(Arc::clone(&self.sink))
            .with_encoding(self.encoding);
        let builder = match (&template.origin, template.directory()) {
            (TemplateOrigin::Embedded(_), _) => {
                builder.with_embedded_loader(Arc::clone(self.loader.resources()))
            }
            (TemplateOrigin::FileSystem(_), Some(directory)) => {
                builder.with_file_loader([directory])
            }
            (TemplateOrigin::FileSystem(_), None) => builder,
        };
        let engine = builder.with_fallback_loader().build();

        let bindings = BindingsBuilder::new().with_ambient(self.ambient).build();

        self.sink.debug(&format!(
            "Rendering {} to {}",
            template.origin,
            output_file.display()
        ));
        engine.evaluate_to_file(&template.text, &bindings, output_file, self.encoding)
    }
}
