use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::errors::ConfigError;
use crate::tsconfig::CompilerOptions;

pub const DEFAULT_CONFIG_FILES: &[&str] = &["tsconfig.json"];

/// A discovered project configuration file and its parsed contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub path: PathBuf,
    pub data: Value,
}

impl ProjectConfig {
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions::from_tsconfig(&self.data)
    }
}

/// Finds the project configuration by walking up from a working directory
/// and keeps the first successful result for the rest of its lifetime.
///
/// The cached value is never refreshed, so edits to the file after the first
/// load are not seen.
#[derive(Debug)]
pub struct ConfigLocator {
    cwd: PathBuf,
    file_names: Vec<String>,
    cache: OnceCell<Option<ProjectConfig>>,
}

impl ConfigLocator {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_file_names(cwd, DEFAULT_CONFIG_FILES.iter().copied())
    }

    pub fn with_file_names<I, S>(cwd: impl Into<PathBuf>, file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cwd: cwd.into(),
            file_names: file_names.into_iter().map(Into::into).collect(),
            cache: OnceCell::new(),
        }
    }

    /// Locator rooted at the process working directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// The cached configuration, if a load has already succeeded.
    pub fn cached(&self) -> Option<&Option<ProjectConfig>> {
        self.cache.get()
    }

    /// Loads the configuration once. `Ok(None)` means no candidate file
    /// exists anywhere above the working directory. Failures are not cached.
    pub async fn load(&self) -> Result<Option<&ProjectConfig>, ConfigError> {
        let config = self.cache.get_or_try_init(|| self.read()).await?;
        Ok(config.as_ref())
    }

    /// First candidate found walking from the working directory to the root.
    pub fn find_config(&self) -> Option<PathBuf> {
        self.cwd.ancestors().find_map(|dir| {
            self.file_names
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    async fn read(&self) -> Result<Option<ProjectConfig>, ConfigError> {
        let Some(path) = self.find_config() else {
            log::debug!("no {} found above {}", self.file_names.join(" or "), self.cwd.display());
            return Ok(None);
        };

        log::debug!("loading project configuration from {}", path.display());
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read { path: self.relative(&path), source })?;
        let data = parse_config(&text).map_err(|message| ConfigError::Parse {
            path: self.relative(&path),
            message,
        })?;

        Ok(Some(ProjectConfig { path, data }))
    }

    /// `path` as seen from the working directory.
    fn relative(&self, path: &Path) -> PathBuf {
        pathdiff::diff_paths(path, &self.cwd).unwrap_or_else(|| path.to_path_buf())
    }
}

/// Permissive parse: comments and trailing commas are accepted. An empty
/// document reads as an empty object.
pub fn parse_config(text: &str) -> Result<Value, String> {
    jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map(|value| value.unwrap_or_else(|| Value::Object(Default::default())))
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    #[test]
    fn parses_comments_and_trailing_commas() {
        let value = parse_config(
            r#"{
                // decorators on
                "compilerOptions": { "experimentalDecorators": true, },
                /* trailing */
            }"#,
        )
        .unwrap();
        assert_eq!(value, json!({ "compilerOptions": { "experimentalDecorators": true } }));
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(parse_config(r#"{ "compilerOptions": "#).is_err());
    }

    #[test]
    fn relative_paths_climb_when_needed() {
        assert_eq!(
            ConfigLocator::new("/a/b/c").relative(Path::new("/a/b/tsconfig.json")),
            PathBuf::from("../tsconfig.json")
        );
        assert_eq!(
            ConfigLocator::new("/a/b").relative(Path::new("/a/b/tsconfig.json")),
            PathBuf::from("tsconfig.json")
        );
    }

    #[tokio::test]
    async fn finds_config_in_an_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tsconfig.json"), r#"{ "compilerOptions": {} }"#).unwrap();

        let locator = ConfigLocator::new(&nested);
        let config = locator.load().await.unwrap().unwrap();
        assert_eq!(config.path, dir.path().join("tsconfig.json"));
        assert_eq!(config.data, json!({ "compilerOptions": {} }));
    }

    #[tokio::test]
    async fn candidates_are_tried_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();
        fs::write(dir.path().join("tsconfig.build.json"), r#"{ "build": true }"#).unwrap();

        let locator =
            ConfigLocator::with_file_names(dir.path(), ["tsconfig.build.json", "tsconfig.json"]);
        let config = locator.load().await.unwrap().unwrap();
        assert_eq!(config.data, json!({ "build": true }));
    }

    #[tokio::test]
    async fn missing_config_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ConfigLocator::with_file_names(dir.path(), ["no-such-config-file.json"]);
        assert_eq!(locator.load().await.unwrap(), None);
        assert_eq!(locator.cached(), Some(&None));
    }

    #[tokio::test]
    async fn malformed_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pkg");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{ not json").unwrap();

        let locator = ConfigLocator::new(&nested);
        let err = locator.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), Path::new("../tsconfig.json"));
        assert!(err.to_string().starts_with("Failed to parse tsconfig at ../tsconfig.json: "));
        assert!(locator.cached().is_none());
    }

    #[tokio::test]
    async fn first_result_is_kept_even_if_the_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsconfig.json");
        fs::write(&path, r#"{ "version": 1 }"#).unwrap();

        let locator = ConfigLocator::new(dir.path());
        assert_eq!(locator.load().await.unwrap().unwrap().data, json!({ "version": 1 }));

        // Stale by design: neither edits nor removal are noticed.
        fs::write(&path, r#"{ "version": 2 }"#).unwrap();
        assert_eq!(locator.load().await.unwrap().unwrap().data, json!({ "version": 1 }));
        fs::remove_file(&path).unwrap();
        assert_eq!(locator.load().await.unwrap().unwrap().data, json!({ "version": 1 }));
    }

    #[tokio::test]
    async fn independent_locators_do_not_share_state() {
        let with_config = tempfile::tempdir().unwrap();
        fs::write(with_config.path().join("tsconfig.json"), "{}").unwrap();
        let without_config = tempfile::tempdir().unwrap();

        let a = ConfigLocator::new(with_config.path());
        let b = ConfigLocator::with_file_names(without_config.path(), ["no-such-config-file.json"]);
        assert!(a.load().await.unwrap().is_some());
        assert!(b.load().await.unwrap().is_none());
    }
}
