//! Seams for the two transform engines.
//!
//! The fast engine is a single-file syntax transform driven by per-call
//! options. The transpiler is the decorator-aware path driven only by the
//! project's compiler options. Both hand back raw code and raw source map
//! text; parsing the map is left to the loader.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::options::Dialect;
use crate::tsconfig::CompilerOptions;

mod swc;

pub use self::swc::SwcEngine;

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Options handed to a [`TransformEngine`] once the loader has applied its
/// defaults.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub target: String,
    pub loader: Dialect,
    /// Whether the host asked for a source map.
    pub sourcemap: bool,
    /// Original file path, recorded in the map.
    pub sourcefile: PathBuf,
    /// Inline or discovered project configuration, as raw JSON.
    pub tsconfig_raw: Option<Value>,
    /// Option keys the loader does not recognize, forwarded untouched.
    pub passthrough: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct TranspileOptions {
    pub file_name: PathBuf,
    pub compiler_options: CompilerOptions,
}

/// Fast single-file transform.
pub trait TransformEngine: Send + Sync {
    fn transform(&self, source: &str, options: &TransformOptions) -> anyhow::Result<EngineOutput>;
}

/// Decorator-aware transpile that relies on project compiler options alone.
pub trait Transpiler: Send + Sync {
    fn transpile_module(
        &self,
        source: &str,
        options: &TranspileOptions,
    ) -> anyhow::Result<EngineOutput>;
}
