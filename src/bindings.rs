//! Variable bindings handed to the template engine.
//!
//! Bindings are assembled from three layers, applied in this order:
//! user properties, computed per-file values, ambient context. A later layer
//! always wins over an earlier one.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::ambient::AmbientContext;

/// Flat, ordered name to value mapping visible to a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, Value>);

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Convenience accessor for string values.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Layers of a [`BindingsBuilder`], lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Property,
    Computed,
    Ambient,
}

/// A name defined by a lower layer and overridden by a higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadowed<'a> {
    pub name: &'a str,
    pub layer: Layer,
    pub by: Layer,
}

impl fmt::Display for Shadowed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layer = match self.layer {
            Layer::Property => "Property",
            Layer::Computed => "Computed value",
            Layer::Ambient => "Ambient value",
        };
        let by = match self.by {
            Layer::Property => "a property",
            Layer::Computed => "a computed value",
            Layer::Ambient => "an ambient value",
        };
        write!(f, "{layer} '{}' is shadowed by {by}", self.name)
    }
}

/// Layered builder for [`Bindings`].
#[derive(Debug, Clone, Default)]
pub struct BindingsBuilder {
    properties: IndexMap<String, Value>,
    computed: IndexMap<String, Value>,
    ambient: IndexMap<String, Value>,
}

impl BindingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds user-supplied properties, the lowest precedence layer.
    pub fn properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in properties {
            self.properties.insert(name.into(), value.into());
        }
        self
    }

    /// Sets a value computed for the current file.
    pub fn computed<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.computed.insert(name.into(), value.into());
        self
    }

    /// Sets an ambient value, the highest precedence layer.
    pub fn ambient<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.ambient.insert(name.into(), value.into());
        self
    }

    /// Adds `project`, `system` and `env` from the captured ambient context.
    pub fn with_ambient(self, context: &AmbientContext) -> Self {
        self.ambient("project", context.project.clone())
            .ambient("system", context.system_value())
            .ambient("env", context.env_value())
    }

    /// Names defined by more than one layer, each paired with the layer
    /// whose value survives.
    pub fn shadowed(&self) -> Vec<Shadowed<'_>> {
        let mut shadowed = Vec::new();
        for name in self.properties.keys() {
            let by = if self.ambient.contains_key(name) {
                Layer::Ambient
            } else if self.computed.contains_key(name) {
                Layer::Computed
            } else {
                continue;
            };
            shadowed.push(Shadowed { name, layer: Layer::Property, by });
        }
        for name in self.computed.keys().filter(|name| self.ambient.contains_key(*name)) {
            shadowed.push(Shadowed { name, layer: Layer::Computed, by: Layer::Ambient });
        }
        shadowed
    }

    pub fn build(self) -> Bindings {
        let mut merged = self.properties;
        for layer in [self.computed, self.ambient] {
            for (name, value) in layer {
                merged.insert(name, value);
            }
        }
        Bindings(merged)
    }
}
