//! Ambient context captured once per run: project metadata, host
//! (`system`) properties and the process environment.

use std::collections::BTreeMap;
use std::env;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ProjectInfo;
use crate::error::{Error, Result};

/// Values bound as `project`, `system` and `env` in every evaluation.
#[derive(Debug, Clone, Default)]
pub struct AmbientContext {
    pub project: Value,
    pub system: IndexMap<String, String>,
    pub env: IndexMap<String, String>,
}

impl AmbientContext {
    /// Captures the current process state.
    ///
    /// `overrides` are layered over the detected system properties, in order.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the project metadata cannot be represented
    ///   as template data, e.g. a path that is not valid Unicode
    pub fn capture<'a, I>(project: &ProjectInfo, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut system = system_properties();
        for (name, value) in overrides {
            system.insert(name.clone(), value.clone());
        }

        let project = serde_json::to_value(project)
            .map_err(|e| Error::ConfigError(format!("invalid project metadata: {e}")))?;

        Ok(Self { project, system, env: environment() })
    }

    pub fn system_value(&self) -> Value {
        string_map_value(&self.system)
    }

    pub fn env_value(&self) -> Value {
        string_map_value(&self.env)
    }
}

fn string_map_value(map: &IndexMap<String, String>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect())
}

fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

/// Properties describing the host the process runs on.
pub fn system_properties() -> IndexMap<String, String> {
    let mut properties = IndexMap::new();
    let mut set = |name: &str, value: String| {
        properties.insert(name.to_string(), value);
    };

    set("os.name", env::consts::OS.to_string());
    set("os.arch", env::consts::ARCH.to_string());
    set("os.family", env::consts::FAMILY.to_string());
    set("file.separator", std::path::MAIN_SEPARATOR.to_string());
    set("path.separator", if cfg!(windows) { ";" } else { ":" }.to_string());
    set("line.separator", if cfg!(windows) { "\r\n" } else { "\n" }.to_string());
    if let Ok(dir) = env::current_dir() {
        set("user.dir", dir.display().to_string());
    }
    if let Some(home) = first_var(&["HOME", "USERPROFILE"]) {
        set("user.home", home);
    }
    if let Some(user) = first_var(&["USER", "USERNAME"]) {
        set("user.name", user);
    }
    set("tmp.dir", env::temp_dir().display().to_string());
    set("stencil.version", env!("CARGO_PKG_VERSION").to_string());

    properties
}

/// Process environment sorted by name. Variables that are not valid
/// Unicode are skipped.
pub fn environment() -> IndexMap<String, String> {
    env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect()
}
