use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::engine::TransformEngine;
use crate::errors::LoaderError;

/// Input dialect understood by the fast engine.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl Dialect {
    pub fn is_typescript(self) -> bool {
        matches!(self, Dialect::Ts | Dialect::Tsx)
    }

    pub fn is_jsx(self) -> bool {
        matches!(self, Dialect::Jsx | Dialect::Tsx)
    }
}

/// Alternate fast engine for a single call.
#[derive(Clone)]
pub enum Implementation {
    Engine(Arc<dyn TransformEngine>),
    /// Whatever arrived under `implementation` in the JSON option object.
    Value(Value),
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Engine(_) => f.write_str("Implementation::Engine(..)"),
            Implementation::Value(value) => {
                f.debug_tuple("Implementation::Value").field(value).finish()
            }
        }
    }
}

/// Per-call loader options, deserialized from the host's option object.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOptions {
    /// Syntax level for the fast engine, `es2015` when unset.
    #[serde(default)]
    pub target: Option<String>,

    /// Input dialect for the fast engine, `js` when unset.
    #[serde(default)]
    pub loader: Option<Dialect>,

    #[serde(default, deserialize_with = "implementation_value")]
    pub implementation: Option<Implementation>,

    #[serde(default)]
    pub emit_decorator_metadata: bool,

    /// Module specifiers that force the transpiler. Kept raw since a
    /// non-list value is tolerated and simply disables the import scan.
    #[serde(default)]
    pub modules: Option<Value>,

    /// `Some` whenever the key is present, even with a `null` value.
    #[serde(default, deserialize_with = "present")]
    pub tsconfig_raw: Option<Value>,

    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn implementation_value<'de, D>(deserializer: D) -> Result<Option<Implementation>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(Implementation::Value(value)))
}

impl LoaderOptions {
    pub fn from_value(value: Value) -> Result<Self, LoaderError> {
        serde_json::from_value(value).map_err(LoaderError::InvalidOptions)
    }

    pub fn with_implementation(mut self, engine: Arc<dyn TransformEngine>) -> Self {
        self.implementation = Some(Implementation::Engine(engine));
        self
    }

    /// Checks the alternate engine before any work is done.
    pub fn validate(&self) -> Result<(), LoaderError> {
        match &self.implementation {
            Some(Implementation::Value(value)) if is_truthy(value) => {
                Err(LoaderError::InvalidImplementation {
                    received: type_name(value.get("transform")),
                })
            }
            _ => Ok(()),
        }
    }

    /// The injected engine, if any. Only meaningful after [`Self::validate`].
    pub fn engine(&self) -> Option<&Arc<dyn TransformEngine>> {
        match &self.implementation {
            Some(Implementation::Engine(engine)) => Some(engine),
            _ => None,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Name a JSON member the way a script `typeof` would.
fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) => "object",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_keys_are_passed_through() {
        let options = LoaderOptions::from_value(json!({
            "target": "es2017",
            "loader": "tsx",
            "minify": true,
            "jsc": { "keepClassNames": true },
        }))
        .unwrap();

        assert_eq!(options.target.as_deref(), Some("es2017"));
        assert_eq!(options.loader, Some(Dialect::Tsx));
        assert_eq!(options.passthrough.len(), 2);
        assert_eq!(options.passthrough["minify"], json!(true));
        assert!(options.tsconfig_raw.is_none());
    }

    #[test]
    fn null_tsconfig_raw_still_counts_as_present() {
        let options = LoaderOptions::from_value(json!({ "tsconfigRaw": null })).unwrap();
        assert_eq!(options.tsconfig_raw, Some(Value::Null));
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let err = LoaderOptions::from_value(json!({ "loader": "css" })).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidOptions(_)));
    }

    #[test]
    fn implementation_without_transform_fails_validation() {
        let options = LoaderOptions::from_value(json!({ "implementation": {} })).unwrap();
        let err = options.validate().unwrap_err();
        assert!(matches!(err, LoaderError::InvalidImplementation { received: "undefined" }));
        assert!(err.to_string().ends_with("Received undefined"));
    }

    #[test]
    fn implementation_transform_type_is_reported() {
        let options =
            LoaderOptions::from_value(json!({ "implementation": { "transform": "swc" } })).unwrap();
        assert!(matches!(
            options.validate(),
            Err(LoaderError::InvalidImplementation { received: "string" })
        ));
    }

    #[test]
    fn falsy_implementation_is_ignored() {
        for value in [json!(null), json!(false), json!(0), json!("")] {
            let options = LoaderOptions::from_value(json!({ "implementation": value })).unwrap();
            assert!(options.validate().is_ok());
            assert!(options.engine().is_none());
        }
    }
}
