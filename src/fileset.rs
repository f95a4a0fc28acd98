//! File-set specifications: a directory plus include/exclude patterns.
//! Patterns follow Ant conventions (`*` stays within one path segment, `**`
//! spans segments, a trailing `/` selects everything below a directory) and are
//! matched against `/`-separated paths relative to the file-set directory.

use crate::constants::DEFAULT_EXCLUDES;
use crate::error::{Error, Result};
use crate::mapper::PathMapper;
use crate::paths::to_slash;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn default_true() -> bool {
    true
}

/// A set of files selected below `directory`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSet {
    pub directory: PathBuf,
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default = "default_true")]
    pub use_default_excludes: bool,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default)]
    pub mapper: PathMapper,
}

impl FileSet {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            output_directory: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            use_default_excludes: true,
            follow_symlinks: false,
            mapper: PathMapper::Identity,
        }
    }

    pub fn with_output_directory<P: Into<PathBuf>>(mut self, output_directory: P) -> Self {
        self.output_directory = Some(output_directory.into());
        self
    }

    pub fn include<S: Into<String>>(mut self, pattern: S) -> Self {
        self.includes.push(pattern.into());
        self
    }

    pub fn exclude<S: Into<String>>(mut self, pattern: S) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    pub fn with_mapper(mut self, mapper: PathMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Directory receiving the outputs; defaults to the file-set directory.
    pub fn output_root(&self) -> &Path {
        self.output_directory.as_deref().unwrap_or(&self.directory)
    }

    fn matching_error<S: Into<String>>(&self, reason: S) -> Error {
        Error::FileSetMatchingError { directory: self.directory.clone(), reason: reason.into() }
    }

    fn build_globset<'a, I>(&self, patterns: I) -> Result<GlobSet>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(&normalize_pattern(pattern))
                .literal_separator(true)
                .build()
                .map_err(|e| self.matching_error(format!("invalid pattern '{pattern}': {e}")))?;
            builder.add(glob);
        }
        builder.build().map_err(|e| self.matching_error(e.to_string()))
    }

    /// Returns the relative paths of all included files, sorted.
    ///
    /// # Errors
    /// * `Error::FileSetMatchingError` if the directory does not exist, a
    ///   pattern is invalid or the directory cannot be traversed
    pub fn included_files(&self) -> Result<Vec<String>> {
        if !self.directory.is_dir() {
            return Err(self.matching_error("directory does not exist"));
        }

        let includes = if self.includes.is_empty() {
            self.build_globset(["**"])?
        } else {
            self.build_globset(self.includes.iter().map(String::as_str))?
        };

        let default_excludes: &[&str] =
            if self.use_default_excludes { &DEFAULT_EXCLUDES } else { &[] };
        let excludes = self.build_globset(
            self.excludes.iter().map(String::as_str).chain(default_excludes.iter().copied()),
        )?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.directory).follow_links(self.follow_symlinks).min_depth(1);
        for entry in walker {
            let entry = entry.map_err(|e| self.matching_error(e.to_string()))?;
            // A symlink's own type unless links are followed.
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.directory)
                .map_err(|e| self.matching_error(e.to_string()))?;
            let relative = to_slash(relative);

            if !includes.is_match(&relative) {
                continue;
            }
            if excludes.is_match(&relative) {
                debug!("Excluding {relative}");
                continue;
            }
            files.push(relative);
        }

        files.sort();
        Ok(files)
    }

    /// Maps every included file to its output path, both relative.
    ///
    /// Files the mapper yields no output for are left out.
    pub fn map_included_files(&self) -> Result<IndexMap<String, String>> {
        let mapper = self.mapper.compile().map_err(|reason| self.matching_error(reason))?;

        let mut mapping = IndexMap::new();
        for input in self.included_files()? {
            match mapper.map(&input) {
                Some(output) => {
                    mapping.insert(input, output);
                }
                None => debug!("No output mapped for {input}, skipping"),
            }
        }
        Ok(mapping)
    }
}

/// Converts an Ant-style pattern into a glob understood by globset.
fn normalize_pattern(pattern: &str) -> String {
    let mut pattern = pattern.trim().replace('\\', "/");
    while let Some(stripped) = pattern.strip_prefix("./") {
        pattern = stripped.to_string();
    }
    if pattern.ends_with('/') {
        pattern.push_str("**");
    }
    pattern
}
