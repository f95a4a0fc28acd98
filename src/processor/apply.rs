//! File-set processing: one template applied to every matched file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;
use indexmap::IndexMap;

use crate::ambient::AmbientContext;
use crate::bindings::{Bindings, BindingsBuilder};
use crate::encoding;
use crate::engine::{Engine, EngineBuilder};
use crate::error::Result;
use crate::fileset::FileSet;
use crate::logger::LogSink;
use crate::paths::relative_path;
use crate::processor::ensure_parent_dir;
use crate::resources::EmbeddedResources;
use crate::template::{TemplateLoader, TemplateOrigin};

/// What to apply and where.
#[derive(Debug, Clone)]
pub struct ApplyTemplate {
    /// Template reference: an embedded resource name or a file name below
    /// `template_directory`
    pub template_name: String,
    /// Directory holding the template and the templates it includes;
    /// defaults to the file-set directory
    pub template_directory: Option<PathBuf>,
    pub file_set: FileSet,
    /// Lowest precedence bindings
    pub properties: IndexMap<String, String>,
}

impl ApplyTemplate {
    pub fn new<S: Into<String>>(template_name: S, file_set: FileSet) -> Self {
        Self {
            template_name: template_name.into(),
            template_directory: None,
            file_set,
            properties: IndexMap::new(),
        }
    }

    pub fn with_template_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.template_directory = Some(directory.into());
        self
    }

    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    fn template_directory(&self) -> &Path {
        self.template_directory.as_deref().unwrap_or(&self.file_set.directory)
    }
}

/// One matched file: its paths relative to the roots and joined onto them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub input_file: String,
    pub output_file: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FileMapping {
    fn new(file_set: &FileSet, input_file: &str, output_file: &str) -> Self {
        Self {
            input_file: input_file.to_string(),
            output_file: output_file.to_string(),
            input: file_set.directory.join(input_file),
            output: file_set.output_root().join(output_file),
        }
    }

    fn input_dir(&self) -> &Path {
        self.input.parent().unwrap_or(Path::new(""))
    }

    fn output_dir(&self) -> &Path {
        self.output.parent().unwrap_or(Path::new(""))
    }
}

/// Applies one template to each file of a file set.
pub struct FileSetProcessor<'a> {
    loader: TemplateLoader,
    ambient: &'a AmbientContext,
    encoding: &'static Encoding,
    sink: Arc<dyn LogSink>,
}

impl<'a> FileSetProcessor<'a> {
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

    /// Applies the template to every matched file, in path order.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Output files written, in order
    ///
    /// # Errors
    /// The first failure aborts the run; see [`crate::error::Error`].
    pub fn run(&self, request: &ApplyTemplate) -> Result<Vec<PathBuf>> {
        let template_directory = request.template_directory();
        let template = self.loader.load(&request.template_name, Some(template_directory))?;
        let engine = self.engine_for(&template.origin, template_directory);

        let files = self.plan(&request.file_set)?;
        self.sink.debug(&format!(
            "Matched {} file(s) in {}",
            files.len(),
            request.file_set.directory.display()
        ));

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            self.apply_one(&engine, &template.text, request, &file)?;
            written.push(file.output);
        }
        Ok(written)
    }

    fn engine_for(&self, origin: &TemplateOrigin, template_directory: &Path) -> Engine {
        let builder =
            EngineBuilder::new().with_log_sink(Arc::clone(&self.sink)).with_encoding(self.encoding);
        // Embedded templates resolve their includes against the embedded
        // resources before the template directory.
        let builder = match origin {
            TemplateOrigin::Embedded(_) => builder
                .with_embedded_loader(Arc::clone(self.loader.resources()))
                .with_file_loader([template_directory]),
            TemplateOrigin::FileSystem(_) => builder.with_file_loader([template_directory]),
        };
        builder.with_fallback_loader().build()
    }

    fn apply_one(
        &self,
        engine: &Engine,
        template: &str,
        request: &ApplyTemplate,
        file: &FileMapping,
    ) -> Result<()> {
        ensure_parent_dir(&file.output)?;

        let content = encoding::read_to_string(&file.input, self.encoding)?;
        let bindings = self.bindings(request, file, content);

        self.sink.debug(&format!("Applying template to {}", file.input_file));
        engine.evaluate_to_file(template, &bindings, &file.output, self.encoding)
    }

    /// Assembles the bindings for one file.
    pub fn bindings(&self, request: &ApplyTemplate, file: &FileMapping, content: String) -> Bindings {
        let input_root = &request.file_set.directory;
        let output_root = request.file_set.output_root();

        let builder = BindingsBuilder::new()
            .properties(request.properties.iter().map(|(k, v)| (k.clone(), v.clone())))
            .computed("content", content)
            .computed("inputPath", relative_path(input_root, file.input_dir()))
            .computed("inputFile", file.input_file.clone())
            .computed("outputPath", relative_path(output_root, file.output_dir()))
            .computed("outputFile", file.output_file.clone())
            .computed("relativePath", relative_path(file.output_dir(), output_root))
            .with_ambient(self.ambient);

        for shadowed in builder.shadowed() {
            self.sink.debug(&shadowed.to_string());
        }
        builder.build()
    }

    /// Resolves the input/output pairs of a file set without applying anything.
    pub fn plan(&self, file_set: &FileSet) -> Result<Vec<FileMapping>> {
        let mapping = file_set.map_included_files()?;
        Ok(mapping
            .iter()
            .map(|(input_file, output_file)| FileMapping::new(file_set, input_file, output_file))
            .collect())
    }
}
