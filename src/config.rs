//! Configuration handling for Stencil.
//! This module loads the optional project configuration file
//! (stencil.yaml, stencil.yml or stencil.json) and describes the project
//! metadata exposed to templates as `project`.

use crate::constants::{CONFIG_FILES, SOURCE_ENCODING_PROPERTY};
use crate::error::{Error, Result};
use crate::fileset::FileSet;
use crate::processor::Transformation;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build settings of the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildInfo {
    pub source_encoding: Option<String>,
    pub directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
}

/// Metadata describing the project being built, bound as `project`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub name: Option<String>,
    pub group_id: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub build: BuildInfo,
    pub properties: IndexMap<String, String>,
}

impl ProjectInfo {
    /// Source encoding declared by the project, either in the build section
    /// or as the `project.build.sourceEncoding` property.
    pub fn source_encoding(&self) -> Option<String> {
        self.build
            .source_encoding
            .clone()
            .or_else(|| self.properties.get(SOURCE_ENCODING_PROPERTY).cloned())
    }
}

/// Settings of the `render` command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub template: Option<String>,
    pub output_file: Option<PathBuf>,
    pub transformations: Vec<Transformation>,
}

/// Settings of the `apply` command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyConfig {
    pub template_directory: Option<PathBuf>,
    pub template_name: Option<String>,
    pub properties: IndexMap<String, String>,
    pub file_set: Option<FileSet>,
}

/// Top level of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub encoding: Option<String>,
    pub project: ProjectInfo,
    pub system: IndexMap<String, String>,
    pub render: RenderConfig,
    pub apply: ApplyConfig,
}

/// Finds the first existing configuration file in `dir`.
///
/// # Arguments
/// * `dir` - Directory to search
/// * `config_files` - Candidate file names, in lookup order
pub fn find_config<P: AsRef<Path>>(dir: P, config_files: &[&str]) -> Option<PathBuf> {
    config_files.iter().map(|file| dir.as_ref().join(file)).find(|path| path.is_file())
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
///   for the configuration schema
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("invalid configuration format: {e}"))),
    }
}

/// Loads the configuration.
///
/// An explicitly named file must exist. Without one, the configuration
/// files are looked up in `working_dir`; when none exists an empty
/// configuration is returned.
pub fn load_config<P: AsRef<Path>>(explicit: Option<&Path>, working_dir: P) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(Error::ConfigError(format!(
                    "configuration file '{}' does not exist",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => find_config(&working_dir, &CONFIG_FILES),
    };

    let mut config = match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .map_err(|source| Error::FileReadError { path: path.clone(), source })?;
            parse_config(&content)?
        }
        None => {
            debug!(
                "No configuration file found (tried: {}), using defaults",
                CONFIG_FILES.join(", ")
            );
            Config::default()
        }
    };

    if config.project.base_dir.is_none() {
        config.project.base_dir = Some(working_dir.as_ref().to_path_buf());
    }
    Ok(config)
}
