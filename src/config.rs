// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, SearchError};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub model: ModelConfig,
    pub users: UserSourceConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Base address of the chat completion service, e.g. a DIAL or Azure OpenAI endpoint
    pub endpoint: String,
    pub api_key: Option<String>,
    pub deployment: String,
    /// Sent as `api-version`; empty means the query parameter is omitted
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    File,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSourceConfig {
    pub kind: SourceKind,
    pub base_url: String,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

/// What happens to the run when a single batch call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run once every dispatched batch has finished
    #[default]
    Abort,
    /// Log the failure, drop the batch and keep going
    Skip,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(SearchError::Config(format!(
                "unknown batch failure policy: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub batch_size: usize,
    pub max_concurrency: usize,
    #[serde(default)]
    pub on_batch_error: FailurePolicy,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl Config {
    /// An explicit `path` must exist. Without one, `config/default.toml` is
    /// optional and the built-in defaults fill whatever it does not set.
    /// `USER_SEARCH__*` variables are applied last in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_layered(path, true),
            None => Self::load_layered(Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }

    fn load_layered(path: &Path, file_required: bool) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| SearchError::Config(e.to_string()))?;

        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).required(file_required))
            .add_source(
                config::Environment::with_prefix("USER_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            model: ModelConfig {
                endpoint: "https://ai-proxy.lab.epam.com".to_string(),
                api_key: None,
                deployment: "gpt-4o".to_string(),
                api_version: String::new(),
                temperature: 0.0,
                timeout_secs: None,
            },
            users: UserSourceConfig {
                kind: SourceKind::Http,
                base_url: "http://localhost:8041".to_string(),
                file_path: None,
                timeout_secs: 30,
            },
            search: SearchConfig {
                batch_size: 100,
                max_concurrency: 8,
                on_batch_error: FailurePolicy::Abort,
                show_progress: true,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_batch_size(self.search.batch_size)
            .map_err(|e| SearchError::Config(e.to_string()))?;

        if self.search.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.model.endpoint)
            .map_err(|e| SearchError::Config(e.to_string()))?;

        if self.model.deployment.trim().is_empty() {
            return Err(SearchError::Config(
                "model deployment must not be empty".to_string(),
            ));
        }

        match self.users.kind {
            SourceKind::Http => Validator::validate_url(&self.users.base_url)
                .map_err(|e| SearchError::Config(e.to_string()))?,
            SourceKind::File => {
                if self.users.file_path.is_none() {
                    return Err(SearchError::Config(
                        "users.file_path is required for the file source".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.batch_size, 100);
        assert_eq!(config.search.on_batch_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let mut config = Config::default_config();
        config.search.batch_size = 0;
        assert!(matches!(config.validate(), Err(SearchError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = Config::default_config();
        config.search.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_source_requires_path() {
        let mut config = Config::default_config();
        config.users.kind = SourceKind::File;
        assert!(config.validate().is_err());

        config.users.file_path = Some(PathBuf::from("users.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!(" SKIP ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_missing_default_file_keeps_env_overrides() {
        let temp = TempDir::new().unwrap();
        // only this test touches the variable
        unsafe { std::env::set_var("USER_SEARCH__MODEL__API_KEY", "from-env") };

        let config = Config::load_layered(&temp.path().join("absent.toml"), false).unwrap();
        unsafe { std::env::remove_var("USER_SEARCH__MODEL__API_KEY") };

        assert_eq!(config.model.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.model.deployment, "gpt-4o");
        assert_eq!(config.users.kind, SourceKind::Http);
        assert_eq!(config.search.batch_size, 100);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.toml");
        fs::write(&path, "[search]\nmax_concurrency = 2\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.search.max_concurrency, 2);
        assert_eq!(config.search.batch_size, 100);
        assert_eq!(config.model.endpoint, Config::default_config().model.endpoint);
    }

    #[test]
    fn test_load_from_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search.toml");
        fs::write(
            &path,
            r#"
[model]
endpoint = "https://models.example.com"
deployment = "gpt-4o-mini"

[users]
kind = "file"
base_url = "http://localhost:8041"
file_path = "users.json"
timeout_secs = 5

[search]
batch_size = 50
max_concurrency = 2
on_batch_error = "skip"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.model.deployment, "gpt-4o-mini");
        assert_eq!(config.model.api_version, "");
        assert_eq!(config.users.kind, SourceKind::File);
        assert_eq!(config.search.batch_size, 50);
        assert_eq!(config.search.on_batch_error, FailurePolicy::Skip);
        assert!(config.search.show_progress);
    }
}
