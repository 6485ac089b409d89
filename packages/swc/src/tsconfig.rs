use serde::Deserialize;
use serde_json::Value;

/// The slice of `compilerOptions` the engines act on. Everything else in the
/// project configuration is opaque and ignored.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub jsx: Option<String>,
    #[serde(default)]
    pub jsx_factory: Option<String>,
    #[serde(default)]
    pub jsx_fragment_factory: Option<String>,
    #[serde(default)]
    pub experimental_decorators: Option<bool>,
    #[serde(default)]
    pub emit_decorator_metadata: Option<bool>,
    #[serde(default)]
    pub use_define_for_class_fields: Option<bool>,
    #[serde(default)]
    pub source_map: Option<bool>,
    #[serde(default)]
    pub inline_source_map: Option<bool>,
}

impl CompilerOptions {
    /// Reads `compilerOptions` out of a whole tsconfig document. Missing or
    /// malformed sections yield the defaults rather than an error, since the
    /// document's shape belongs to the engine.
    pub fn from_tsconfig(tsconfig: &Value) -> Self {
        tsconfig
            .get("compilerOptions")
            .and_then(|options| match serde_json::from_value(options.clone()) {
                Ok(options) => Some(options),
                Err(err) => {
                    log::debug!("ignoring unreadable compilerOptions: {err}");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn decorators(&self) -> bool {
        self.experimental_decorators.unwrap_or(false)
    }

    pub fn decorator_metadata(&self) -> bool {
        self.emit_decorator_metadata.unwrap_or(false)
    }

    pub fn wants_source_map(&self) -> bool {
        self.source_map.unwrap_or(false) || self.inline_source_map.unwrap_or(false)
    }

    /// tsc targets are case-insensitive; the engine wants lowercase.
    pub fn target(&self) -> Option<String> {
        self.target.as_deref().map(str::to_ascii_lowercase)
    }

    /// `react-jsx` and `react-jsxdev` select the automatic runtime.
    pub fn automatic_jsx_runtime(&self) -> bool {
        matches!(
            self.jsx.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("react-jsx") | Some("react-jsxdev")
        )
    }
}
