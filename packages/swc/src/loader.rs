use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ConfigLocator;
use crate::engine::{SwcEngine, TransformEngine, TransformOptions, TranspileOptions, Transpiler};
use crate::errors::LoaderError;
use crate::options::{Dialect, LoaderOptions};
use crate::router::{route, Route};
use crate::tsconfig::CompilerOptions;

pub const DEFAULT_TARGET: &str = "es2015";

/// What the host hands the loader for one file.
#[derive(Debug, Clone)]
pub struct LoaderContext {
    pub resource_path: PathBuf,
    /// The host's current source map mode.
    pub source_map: bool,
    pub options: LoaderOptions,
}

impl LoaderContext {
    pub fn new(resource_path: impl Into<PathBuf>, options: LoaderOptions) -> Self {
        Self { resource_path: resource_path.into(), source_map: false, options }
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }
}

/// Successful result of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<Value>,
}

/// The loader entry point. Cheap to clone; clones share the configuration
/// cache.
#[derive(Clone)]
pub struct TransformLoader {
    engine: Arc<dyn TransformEngine>,
    transpiler: Arc<dyn Transpiler>,
    config: Arc<ConfigLocator>,
}

impl TransformLoader {
    pub fn new(
        engine: Arc<dyn TransformEngine>,
        transpiler: Arc<dyn Transpiler>,
        config: Arc<ConfigLocator>,
    ) -> Self {
        Self { engine, transpiler, config }
    }

    /// swc for both paths, configuration looked up from `config`.
    pub fn with_config(config: Arc<ConfigLocator>) -> Self {
        Self::new(Arc::new(SwcEngine), Arc::new(SwcEngine), config)
    }

    /// swc for both paths, configuration looked up from the process working
    /// directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::with_config(Arc::new(ConfigLocator::from_current_dir()?)))
    }

    pub fn config(&self) -> &Arc<ConfigLocator> {
        &self.config
    }

    /// Host-facing entry: `done` is called exactly once, with either the
    /// output or the error.
    pub async fn run<F>(&self, cx: &LoaderContext, source: &str, done: F)
    where
        F: FnOnce(Result<TransformOutput, LoaderError>),
    {
        done(self.transform(cx, source).await)
    }

    /// Runs one file through the chosen engine.
    ///
    /// The transpiler path takes its compiler options from an inline
    /// `tsconfigRaw` when one is given, and from the discovered project
    /// configuration otherwise. Loaders that only ever hand the transpiler
    /// the discovered file ignore `tsconfigRaw` there; this one does not.
    pub async fn transform(
        &self,
        cx: &LoaderContext,
        source: &str,
    ) -> Result<TransformOutput, LoaderError> {
        let options = &cx.options;
        options.validate()?;

        let engine = options.engine().unwrap_or(&self.engine);

        let mut transform_options = TransformOptions {
            target: options.target.clone().unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            loader: options.loader.unwrap_or_default(),
            sourcemap: cx.source_map,
            sourcefile: cx.resource_path.clone(),
            tsconfig_raw: options.tsconfig_raw.clone(),
            passthrough: options.passthrough.clone(),
        };

        let mut project = None;
        if options.tsconfig_raw.is_none() {
            project = self.config.load().await?;
            if let Some(config) = project {
                transform_options.tsconfig_raw = Some(config.data.clone());
            }
        }

        if transform_options.loader == Dialect::Tsx && has_ts_extension(&cx.resource_path) {
            log::trace!("{}: plain .ts file, parsing without jsx", cx.resource_path.display());
            transform_options.loader = Dialect::Ts;
        }

        let chosen = route(source, options.emit_decorator_metadata, options.modules.as_ref());
        log::debug!("{}: {chosen:?} path", cx.resource_path.display());

        let output = match chosen {
            Route::Strict => {
                let compiler_options = match (&options.tsconfig_raw, project) {
                    (Some(raw), _) => CompilerOptions::from_tsconfig(raw),
                    (None, Some(config)) => config.compiler_options(),
                    (None, None) => CompilerOptions::default(),
                };
                let transpile_options = TranspileOptions {
                    file_name: cx.resource_path.clone(),
                    compiler_options,
                };
                self.transpiler.transpile_module(source, &transpile_options)?
            }
            Route::Fast => engine.transform(source, &transform_options)?,
        };

        let map: Option<Value> = output
            .map
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(LoaderError::SourceMap)?;

        Ok(TransformOutput { code: output.code, map })
    }
}

fn has_ts_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ts"))
}
