// ABOUTME: Parameter file parsing for long-form and short-form records.
// ABOUTME: Accepts {"ParameterKey": k, "ParameterValue": v} or {k: v} entries.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::{Parameter, ParameterError};

/// An ordered list of parameters with unique keys, as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    /// Build a set, rejecting empty and duplicate keys.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, ParameterError> {
        let mut seen = HashSet::new();
        for parameter in &parameters {
            if parameter.key.is_empty() {
                return Err(ParameterError::EmptyKey);
            }
            if !seen.insert(parameter.key.as_str()) {
                return Err(ParameterError::DuplicateKey(parameter.key.clone()));
            }
        }
        Ok(Self { parameters })
    }

    pub fn from_json(json: &str) -> Result<Self, ParameterError> {
        let entries: Vec<ParameterEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ParameterError> {
        let entries: Option<Vec<ParameterEntry>> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries.unwrap_or_default())
    }

    /// Load a parameters file. `.yml`/`.yaml` files are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, ParameterError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParameterError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    fn from_entries(entries: Vec<ParameterEntry>) -> Result<Self, ParameterError> {
        let parameters = entries
            .into_iter()
            .map(ParameterEntry::into_parameter)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parameters)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn into_vec(self) -> Vec<Parameter> {
        self.parameters
    }
}

const KEY_FIELD: &str = "ParameterKey";
const VALUE_FIELD: &str = "ParameterValue";
const USE_PREVIOUS_FIELD: &str = "UsePreviousValue";

/// One record of a parameters file, before its form is known.
///
/// A record naming `ParameterKey` or `ParameterValue` is long-form and must
/// carry both; anything else is a short-form `{key: value}` record.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ParameterEntry(BTreeMap<String, ScalarValue>);

impl ParameterEntry {
    fn into_parameter(self) -> Result<Parameter, ParameterError> {
        let mut fields = self.0;
        if !fields.contains_key(KEY_FIELD) && !fields.contains_key(VALUE_FIELD) {
            if fields.len() != 1 {
                return Err(ParameterError::AmbiguousRecord(fields.len()));
            }
            let (key, value) = fields
                .pop_first()
                .ok_or(ParameterError::AmbiguousRecord(0))?;
            return Ok(Parameter::new(key, value.into_string()));
        }

        let key = fields
            .remove(KEY_FIELD)
            .ok_or(ParameterError::MissingKey)?
            .into_string();
        if fields.contains_key(USE_PREVIOUS_FIELD) {
            return Err(ParameterError::UnsupportedField {
                key,
                field: USE_PREVIOUS_FIELD.to_string(),
            });
        }
        let value = fields
            .remove(VALUE_FIELD)
            .ok_or_else(|| ParameterError::MissingValue(key.clone()))?;
        if let Some(field) = fields.into_keys().next() {
            return Err(ParameterError::UnsupportedField { key, field });
        }
        Ok(Parameter::new(key, value.into_string()))
    }
}

/// Parameter values are strings on the wire; YAML authors often write bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ScalarValue {
    fn into_string(self) -> String {
        match self {
            ScalarValue::Text(s) => s,
            ScalarValue::Integer(n) => n.to_string(),
            ScalarValue::Float(n) => n.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
        }
    }
}
