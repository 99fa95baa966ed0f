#![warn(missing_docs)]

//! Parameter sets and per-console schemas.
//!
//! Every console variant is driven by a flat namespace of named numeric
//! and boolean parameters. Categories exist purely for presentation
//! (grouping in printed output); they carry no semantics. Each variant
//! declares a [`Schema`] of required and defaulted parameters which is
//! resolved once, up front — a missing required parameter fails fast
//! with [`ParamError::MissingParameters`] instead of surfacing later as
//! an opaque geometry error.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by parameter handling.
#[derive(Error, Debug)]
pub enum ParamError {
    /// One or more required parameters are absent.
    #[error("missing required parameters for {console}: {}", names.join(", "))]
    MissingParameters {
        /// Console variant whose schema failed to resolve.
        console: String,
        /// All missing parameter names, sorted.
        names: Vec<String>,
    },
    /// A parameter exists but has the wrong type.
    #[error("parameter `{name}` is not a {expected}")]
    WrongType {
        /// Parameter name.
        name: String,
        /// Expected type description.
        expected: &'static str,
    },
    /// A parameter referenced at lookup time does not exist.
    #[error("unknown parameter `{0}`")]
    Unknown(String),
    /// Unrecognized parameter file extension.
    #[error("unsupported parameter file extension: {0}")]
    UnsupportedFormat(String),
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parse/serialize failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML parse failure.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),
    /// TOML serialize failure.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// A single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer count.
    Int(i64),
    /// Dimension or factor in mm / degrees / ratio.
    Float(f64),
}

impl ParamValue {
    /// Numeric value as f64 (integers widen; booleans are an error).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Bool(_) => None,
        }
    }

    /// Value as a non-negative count.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) if *v >= 0 => Some(*v as usize),
            ParamValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
            _ => None,
        }
    }

    /// Value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// A flat, ordered parameter namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a raw value.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// Whether a parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Numeric parameter, failing with a typed error.
    pub fn get_f64(&self, name: &str) -> Result<f64, ParamError> {
        let v = self
            .values
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        v.as_f64().ok_or_else(|| ParamError::WrongType {
            name: name.to_string(),
            expected: "number",
        })
    }

    /// Count parameter, failing with a typed error.
    pub fn get_usize(&self, name: &str) -> Result<usize, ParamError> {
        let v = self
            .values
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        v.as_usize().ok_or_else(|| ParamError::WrongType {
            name: name.to_string(),
            expected: "non-negative integer",
        })
    }

    /// Boolean parameter, defaulting to `false` when absent.
    pub fn get_flag(&self, name: &str) -> Result<bool, ParamError> {
        match self.values.get(name) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| ParamError::WrongType {
                name: name.to_string(),
                expected: "boolean",
            }),
        }
    }

    /// Numeric parameter with a fallback for absent keys.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.values
            .get(name)
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    /// Merge `other` into `self`; values in `other` win.
    pub fn merge(&mut self, other: &ParameterSet) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), *v);
        }
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ParamError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ParamError> {
        Ok(toml::to_string(self)?)
    }

    /// Parse from TOML.
    pub fn from_toml(text: &str) -> Result<Self, ParamError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a `.json` or `.toml` file, dispatching on extension.
    pub fn load(path: &Path) -> Result<Self, ParamError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("toml") => Self::from_toml(&text),
            other => Err(ParamError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Write to a `.json` or `.toml` file, dispatching on extension.
    pub fn save(&self, path: &Path) -> Result<(), ParamError> {
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.to_json()?,
            Some("toml") => self.to_toml()?,
            other => {
                return Err(ParamError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl FromIterator<(String, ParamValue)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Declaration of one schema parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: &'static str,
    /// Presentation category (no semantics).
    pub category: &'static str,
    /// Default value; `None` marks the parameter required.
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// A required parameter.
    pub const fn required(name: &'static str, category: &'static str) -> Self {
        Self {
            name,
            category,
            default: None,
        }
    }

    /// An optional parameter with a numeric default.
    pub const fn with_default(name: &'static str, category: &'static str, default: f64) -> Self {
        Self {
            name,
            category,
            default: Some(ParamValue::Float(default)),
        }
    }

    /// An optional count parameter.
    pub const fn with_count(name: &'static str, category: &'static str, default: i64) -> Self {
        Self {
            name,
            category,
            default: Some(ParamValue::Int(default)),
        }
    }

    /// An optional boolean parameter.
    pub const fn with_flag(name: &'static str, category: &'static str, default: bool) -> Self {
        Self {
            name,
            category,
            default: Some(ParamValue::Bool(default)),
        }
    }
}

/// A console variant's parameter schema.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Console variant name, used in error messages.
    pub console: &'static str,
    /// Parameter declarations.
    pub specs: Vec<ParamSpec>,
}

impl Schema {
    /// Create a schema.
    pub fn new(console: &'static str, specs: Vec<ParamSpec>) -> Self {
        Self { console, specs }
    }

    /// The full default parameter set (required parameters have no
    /// defaults and are absent from the result).
    pub fn defaults(&self) -> ParameterSet {
        self.specs
            .iter()
            .filter_map(|s| s.default.map(|d| (s.name.to_string(), d)))
            .collect()
    }

    /// Resolve a user-provided set against this schema: defaults fill the
    /// gaps, then every declared parameter must be present. All missing
    /// required parameters are reported in a single error.
    pub fn resolve(&self, provided: &ParameterSet) -> Result<ParameterSet, ParamError> {
        let mut resolved = self.defaults();
        resolved.merge(provided);

        let missing: Vec<String> = self
            .specs
            .iter()
            .filter(|s| !resolved.contains(s.name))
            .map(|s| s.name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(ParamError::MissingParameters {
                console: self.console.to_string(),
                names: missing,
            })
        }
    }

    /// Distinct categories in declaration order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for s in &self.specs {
            if !seen.contains(&s.category) {
                seen.push(s.category);
            }
        }
        seen
    }

    /// Parameters declared under one category.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ParamSpec> + 'a {
        self.specs.iter().filter(move |s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            "test",
            vec![
                ParamSpec::with_default("board_thickness", "General", 18.0),
                ParamSpec::required("internal_width", "General"),
                ParamSpec::with_count("number_of_keys", "Keyboard", 61),
                ParamSpec::with_flag("enable_holes", "Speakers", false),
            ],
        )
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let mut provided = ParameterSet::new();
        provided.set("internal_width", 1300.0);
        let resolved = schema().resolve(&provided).unwrap();
        assert_eq!(resolved.get_f64("board_thickness").unwrap(), 18.0);
        assert_eq!(resolved.get_f64("internal_width").unwrap(), 1300.0);
        assert_eq!(resolved.get_usize("number_of_keys").unwrap(), 61);
        assert!(!resolved.get_flag("enable_holes").unwrap());
    }

    #[test]
    fn test_resolve_reports_all_missing() {
        let s = Schema::new(
            "bench",
            vec![
                ParamSpec::required("a", "General"),
                ParamSpec::required("b", "General"),
                ParamSpec::with_default("c", "General", 1.0),
            ],
        );
        let err = s.resolve(&ParameterSet::new()).unwrap_err();
        match err {
            ParamError::MissingParameters { console, names } => {
                assert_eq!(console, "bench");
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_provided_overrides_default() {
        let mut provided = ParameterSet::new();
        provided.set("internal_width", 1000.0);
        provided.set("board_thickness", 22.0);
        let resolved = schema().resolve(&provided).unwrap();
        assert_eq!(resolved.get_f64("board_thickness").unwrap(), 22.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut set = ParameterSet::new();
        set.set("width", 1300.0);
        set.set("keys", 61i64);
        set.set("holes", true);
        let json = set.to_json().unwrap();
        let back = ParameterSet::from_json(&json).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut set = ParameterSet::new();
        set.set("width", 870.5);
        set.set("manuals", 2i64);
        let toml = set.to_toml().unwrap();
        let back = ParameterSet::from_toml(&toml).unwrap();
        assert_eq!(back.get_f64("width").unwrap(), 870.5);
        assert_eq!(back.get_usize("manuals").unwrap(), 2);
    }

    #[test]
    fn test_save_load_round_trips_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ParameterSet::new();
        set.set("organ_internal_width", 1300.0);
        set.set("keyboard_total_keys", 61_i64);
        set.set("enable_knob_holes", true);
        for name in ["params.json", "params.toml"] {
            let path = dir.path().join(name);
            set.save(&path).unwrap();
            let back = ParameterSet::load(&path).unwrap();
            assert_eq!(back.get_f64("organ_internal_width").unwrap(), 1300.0);
            assert_eq!(back.get_usize("keyboard_total_keys").unwrap(), 61);
            assert!(back.get_flag("enable_knob_holes").unwrap());
        }
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParameterSet::new()
            .save(&dir.path().join("params.yaml"))
            .unwrap_err();
        assert!(matches!(err, ParamError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_wrong_type() {
        let mut set = ParameterSet::new();
        set.set("flag", true);
        assert!(matches!(
            set.get_f64("flag"),
            Err(ParamError::WrongType { .. })
        ));
    }

    #[test]
    fn test_merge_right_biased() {
        let mut a = ParameterSet::new();
        a.set("x", 1.0);
        a.set("y", 2.0);
        let mut b = ParameterSet::new();
        b.set("y", 3.0);
        a.merge(&b);
        assert_eq!(a.get_f64("y").unwrap(), 3.0);
        assert_eq!(a.get_f64("x").unwrap(), 1.0);
    }

    #[test]
    fn test_categories_in_order() {
        let cats = schema().categories();
        assert_eq!(cats, vec!["General", "Keyboard", "Speakers"]);
    }
}
