//! Bundler loader that sends each source file through one of two engines.
//!
//! Most files take the fast path: a single-file swc transform configured by
//! the per-call [`LoaderOptions`]. Files that use decorators while metadata
//! emission is requested, or that import one of the listed `modules`, take
//! the transpiler path instead, which is configured only by the project's
//! `tsconfig.json`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use swc_transform_loader::{LoaderContext, LoaderOptions, TransformLoader};
//!
//! let loader = TransformLoader::from_current_dir()?;
//! let options = LoaderOptions::from_value(serde_json::json!({ "loader": "ts" }))?;
//! let cx = LoaderContext::new("src/index.ts", options).with_source_map(true);
//! loader
//!     .run(&cx, "export const x: number = 1;", |result| match result {
//!         Ok(output) => println!("{}", output.code),
//!         Err(err) => eprintln!("{err}"),
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

mod comments;
mod config;
mod engine;
mod errors;
mod loader;
mod options;
mod router;
mod tsconfig;

pub use comments::strip_comments;
pub use config::{parse_config, ConfigLocator, ProjectConfig, DEFAULT_CONFIG_FILES};
pub use engine::{
    EngineOutput, SwcEngine, TransformEngine, TransformOptions, TranspileOptions, Transpiler,
};
pub use errors::{ConfigError, LoaderError};
pub use loader::{LoaderContext, TransformLoader, TransformOutput, DEFAULT_TARGET};
pub use options::{Dialect, Implementation, LoaderOptions};
pub use router::{imports_listed_module, listed_modules, route, uses_decorators, Route};
pub use tsconfig::CompilerOptions;
