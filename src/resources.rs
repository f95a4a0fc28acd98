//! Resource loading strategies used to resolve template references.
//!
//! A reference is a `/`-separated name. Loaders are consulted in order; the
//! first one returning content wins. The fallback loader never misses: it
//! answers every reference with empty content and a warning, so a broken
//! `{% include %}` renders as nothing instead of aborting evaluation.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;
use indexmap::IndexMap;

use crate::encoding;
use crate::error::Result;
use crate::logger::LogSink;

// Templates compiled into the binary.
const BUNDLED: &[(&str, &str)] = &[
    ("stencil/environment.txt.j2", include_str!("../templates/stencil/environment.txt.j2")),
    (
        "stencil/build-info.properties.j2",
        include_str!("../templates/stencil/build-info.properties.j2"),
    ),
];

/// Name of the embedded resource loader.
pub const EMBEDDED_LOADER: &str = "embedded";

/// Name of the fallback loader.
pub const FALLBACK_LOADER: &str = "fallback";

fn normalize_name(reference: &str) -> &str {
    reference.trim_start_matches('/')
}

/// Templates available without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: IndexMap<String, Cow<'static, str>>,
}

impl EmbeddedResources {
    /// An empty set of resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// The templates shipped with Stencil.
    pub fn bundled() -> Self {
        let mut resources = Self::new();
        for (name, content) in BUNDLED {
            resources.entries.insert((*name).to_string(), Cow::Borrowed(*content));
        }
        resources
    }

    /// Registers an additional resource, replacing one of the same name.
    pub fn with_resource<N, C>(mut self, name: N, content: C) -> Self
    where
        N: AsRef<str>,
        C: Into<Cow<'static, str>>,
    {
        self.entries.insert(normalize_name(name.as_ref()).to_string(), content.into());
        self
    }

    /// Looks up a resource; a leading `/` in `reference` is ignored.
    pub fn get(&self, reference: &str) -> Option<&str> {
        self.entries.get(normalize_name(reference)).map(|content| content.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One strategy of the resource-loader chain.
#[derive(Debug, Clone)]
pub enum ResourceLoader {
    /// Reads references as files below any of `roots`
    Filesystem { name: String, roots: Vec<PathBuf> },
    /// Serves [`EmbeddedResources`]
    Embedded(Arc<EmbeddedResources>),
    /// Answers every reference with empty content
    Fallback,
}

impl ResourceLoader {
    pub fn name(&self) -> &str {
        match self {
            ResourceLoader::Filesystem { name, .. } => name,
            ResourceLoader::Embedded(_) => EMBEDDED_LOADER,
            ResourceLoader::Fallback => FALLBACK_LOADER,
        }
    }

    /// Resolves `reference` to its content, `Ok(None)` when this loader does
    /// not know it.
    ///
    /// # Errors
    /// * `Error::FileReadError` if a matching file exists but cannot be read
    pub fn resolve(
        &self,
        reference: &str,
        encoding: &'static Encoding,
        sink: &dyn LogSink,
    ) -> Result<Option<String>> {
        match self {
            ResourceLoader::Filesystem { roots, .. } => {
                for root in roots {
                    let Some(path) = join_within(root, reference) else {
                        continue;
                    };
                    if path.is_file() {
                        return encoding::read_to_string(&path, encoding).map(Some);
                    }
                }
                Ok(None)
            }
            ResourceLoader::Embedded(resources) => {
                Ok(resources.get(reference).map(str::to_string))
            }
            ResourceLoader::Fallback => {
                sink.warn(&format!("Failed to find {reference}"));
                Ok(Some(String::new()))
            }
        }
    }
}

/// Joins a `/`-separated reference onto `root`, refusing references that
/// would leave it.
fn join_within(root: &Path, reference: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            segment if segment.contains('\\') || segment.contains(':') => return None,
            segment => path.push(segment),
        }
    }
    Some(path)
}
