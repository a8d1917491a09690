//! Parameters substituted into manifest templates.
//!
//! Templates reference parameters as fields of the root context:
//! - `{{ .Namespace }}` - namespace in which to create objects
//! - `{{ .Capacity }}` - disk space for the persistent volume (e.g. `5Gi`)
//! - `{{ .LocalDiskPath }}` - host path for a local persistent volume
//! - `{{ .Name }}` - any custom value passed with `--set Name=value`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ConfigError, ConfigResult};

pub const NAMESPACE: &str = "Namespace";
pub const CAPACITY: &str = "Capacity";
pub const LOCAL_DISK_PATH: &str = "LocalDiskPath";

/// Key/value set a template is rendered against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParameters {
    values: BTreeMap<String, String>,
}

impl TemplateParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter. Names must be usable as template field names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> ConfigResult<()> {
        if !is_identifier(name) {
            return Err(ConfigError::InvalidName(name.to_string()));
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Set a parameter from a `KEY=VALUE` assignment.
    pub fn set_assignment(&mut self, assignment: &str) -> ConfigResult<()> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidAssignment(assignment.to_string()))?;
        self.set(name.trim(), value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.get(NAMESPACE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builder for creating TemplateParameters.
pub struct TemplateParametersBuilder {
    params: TemplateParameters,
}

impl TemplateParametersBuilder {
    pub fn new() -> Self {
        Self {
            params: TemplateParameters::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.params.values.insert(NAMESPACE.to_string(), namespace.into());
        self
    }

    pub fn with_capacity(mut self, capacity: impl Into<String>) -> Self {
        self.params.values.insert(CAPACITY.to_string(), capacity.into());
        self
    }

    pub fn with_local_disk_path(mut self, path: impl Into<String>) -> Self {
        self.params
            .values
            .insert(LOCAL_DISK_PATH.to_string(), path.into());
        self
    }

    /// Apply `KEY=VALUE` assignments, later ones overriding earlier ones.
    pub fn with_assignments<I, S>(mut self, assignments: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            self.params.set_assignment(assignment.as_ref())?;
        }
        Ok(self)
    }

    pub fn build(self) -> TemplateParameters {
        self.params
    }
}

impl Default for TemplateParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}
