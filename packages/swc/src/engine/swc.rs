use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use serde_json::{json, Map, Value};
use swc_core::base::config::Options;
use swc_core::base::{try_with_handler, Compiler, HandlerOpts};
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, Globals, SourceMap, GLOBALS};

use super::{EngineOutput, TransformEngine, TransformOptions, TranspileOptions, Transpiler};
use crate::options::Dialect;
use crate::tsconfig::CompilerOptions;

/// Target used by the transpiler when the project names none.
const TRANSPILE_DEFAULT_TARGET: &str = "es5";

/// Both engines, backed by swc's compiler.
///
/// The fast path never emits decorator metadata even when the project asks
/// for it; that is what the transpiler path is for.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwcEngine;

impl TransformEngine for SwcEngine {
    fn transform(&self, source: &str, options: &TransformOptions) -> anyhow::Result<EngineOutput> {
        compile(source, &options.sourcefile, fast_options(options))
    }
}

impl Transpiler for SwcEngine {
    fn transpile_module(
        &self,
        source: &str,
        options: &TranspileOptions,
    ) -> anyhow::Result<EngineOutput> {
        compile(source, &options.file_name, transpile_options(options))
    }
}

fn compile(source: &str, file_name: &Path, options: Value) -> anyhow::Result<EngineOutput> {
    let options: Options = serde_json::from_value(options).context("invalid swc options")?;

    let cm: Arc<SourceMap> = Default::default();
    let compiler = Compiler::new(cm.clone());
    let fm =
        cm.new_source_file(Lrc::new(FileName::Real(file_name.to_path_buf())), source.to_string());

    let output = GLOBALS
        .set(&Globals::new(), || {
            try_with_handler(cm.clone(), HandlerOpts::default(), |handler| {
                compiler.process_js_file(fm, handler, &options)
            })
        })
        .map_err(|err| anyhow!("{err:?}"))?;

    Ok(EngineOutput { code: output.code, map: output.map })
}

pub(crate) fn fast_options(options: &TransformOptions) -> Value {
    let project = options
        .tsconfig_raw
        .as_ref()
        .map(CompilerOptions::from_tsconfig)
        .unwrap_or_default();

    let mut transform = transform_section(&project);
    transform.insert("decoratorMetadata".into(), json!(false));

    let mut document = json!({
        "filename": options.sourcefile.to_string_lossy(),
        "swcrc": false,
        "sourceMaps": options.sourcemap,
        "jsc": {
            "parser": parser_section(options.loader, project.decorators()),
            "target": options.target.to_ascii_lowercase(),
            "transform": transform,
        },
    });
    merge(&mut document, &Value::Object(options.passthrough.clone()));
    document
}

pub(crate) fn transpile_options(options: &TranspileOptions) -> Value {
    let project = &options.compiler_options;
    let target = project.target().unwrap_or_else(|| TRANSPILE_DEFAULT_TARGET.to_string());

    let mut transform = transform_section(project);
    transform.insert("decoratorMetadata".into(), json!(project.decorator_metadata()));

    json!({
        "filename": options.file_name.to_string_lossy(),
        "swcrc": false,
        "sourceMaps": project.wants_source_map(),
        "jsc": {
            "parser": parser_section(dialect_for(&options.file_name), true),
            "target": target,
            "transform": transform,
        },
    })
}

fn parser_section(dialect: Dialect, decorators: bool) -> Value {
    if dialect.is_typescript() {
        json!({ "syntax": "typescript", "tsx": dialect.is_jsx(), "decorators": true })
    } else {
        json!({ "syntax": "ecmascript", "jsx": dialect.is_jsx(), "decorators": decorators })
    }
}

fn transform_section(project: &CompilerOptions) -> Map<String, Value> {
    let mut transform = Map::new();
    transform.insert("legacyDecorator".into(), json!(project.decorators()));
    if let Some(define) = project.use_define_for_class_fields {
        transform.insert("useDefineForClassFields".into(), json!(define));
    }

    let mut react = Map::new();
    if let Some(pragma) = &project.jsx_factory {
        react.insert("pragma".into(), json!(pragma));
    }
    if let Some(pragma_frag) = &project.jsx_fragment_factory {
        react.insert("pragmaFrag".into(), json!(pragma_frag));
    }
    if project.automatic_jsx_runtime() {
        react.insert("runtime".into(), json!("automatic"));
    }
    if !react.is_empty() {
        transform.insert("react".into(), Value::Object(react));
    }

    transform
}

/// Dialect implied by a file name; extensionless files read as TypeScript.
fn dialect_for(file_name: &Path) -> Dialect {
    match file_name.extension().and_then(|ext| ext.to_str()) {
        Some("tsx") => Dialect::Tsx,
        Some("jsx") => Dialect::Jsx,
        Some("js" | "mjs" | "cjs") => Dialect::Js,
        _ => Dialect::Ts,
    }
}

/// Overlays `patch` onto `base`, descending into objects present on both sides.
fn merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
