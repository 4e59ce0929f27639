//! Layered configuration: defaults, then a RON file, then environment, then flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_engine::{ClientSettings, Endpoints};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "sku_dashboard.ron";

pub const ENV_SKU_URL: &str = "SKU_DASHBOARD_SKU_URL";
pub const ENV_STATS_URL: &str = "SKU_DASHBOARD_STATS_URL";
pub const ENV_WORKFLOWS_URL: &str = "SKU_DASHBOARD_WORKFLOWS_URL";
pub const ENV_LOG: &str = "SKU_DASHBOARD_LOG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("no SKU endpoint configured (set sku_url, SKU_DASHBOARD_SKU_URL, or --sku-url)")]
    MissingSkuUrl,
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sku_url: Option<String>,
    pub stats_url: Option<String>,
    pub workflows_url: Option<String>,
    /// Base of the workflow editor; rows link to `<base>/workflow/<id>`.
    pub workflow_editor_url: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_body_bytes: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            sku_url: None,
            stats_url: None,
            workflows_url: None,
            workflow_editor_url: None,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_body_bytes: client.max_bytes,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl DashboardConfig {
    /// Resolves the effective config for this process.
    pub fn load(args: &GlobalArgs) -> Result<Self, ConfigError> {
        Self::load_with(args, Path::new(DEFAULT_CONFIG_FILE), |key| {
            std::env::var(key).ok()
        })
    }

    pub(crate) fn load_with(
        args: &GlobalArgs,
        default_file: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None if default_file.is_file() => Self::from_file(default_file)?,
            None => Self::default(),
        };
        config.apply_env(env);
        config.apply_args(args);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(ENV_SKU_URL) {
            self.sku_url = Some(url);
        }
        if let Some(url) = non_empty(ENV_STATS_URL) {
            self.stats_url = Some(url);
        }
        if let Some(url) = non_empty(ENV_WORKFLOWS_URL) {
            self.workflows_url = Some(url);
        }
        if let Some(level) = non_empty(ENV_LOG) {
            self.log_level = level;
        }
    }

    fn apply_args(&mut self, args: &GlobalArgs) {
        if let Some(url) = &args.sku_url {
            self.sku_url = Some(url.clone());
        }
        if let Some(url) = &args.stats_url {
            self.stats_url = Some(url.clone());
        }
        if let Some(url) = &args.workflows_url {
            self.workflows_url = Some(url.clone());
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    /// Configured endpoints; blank URLs count as unset.
    pub fn endpoints(&self) -> Endpoints {
        let non_blank = |url: &Option<String>| url.clone().filter(|url| !url.trim().is_empty());
        Endpoints {
            sku_url: non_blank(&self.sku_url),
            stats_url: non_blank(&self.stats_url),
            workflows_url: non_blank(&self.workflows_url),
        }
    }

    /// Fails for commands that load the SKU list when no list endpoint is set.
    pub fn require_sku_url(&self) -> Result<(), ConfigError> {
        match self.endpoints().sku_url {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingSkuUrl),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_body_bytes,
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        dashboard_logging::parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Link to a workflow in the editor, when an editor base is configured.
    pub fn workflow_link(&self, workflow_id: &str) -> Option<String> {
        let base = self.workflow_editor_url.as_deref()?;
        Some(format!("{}/workflow/{workflow_id}", base.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_with(
            &GlobalArgs::default(),
            &dir.path().join(DEFAULT_CONFIG_FILE),
            env_from(&[]),
        )
        .unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert!(matches!(config.require_sku_url(), Err(ConfigError::MissingSkuUrl)));
    }

    #[test]
    fn default_file_is_picked_up_and_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            DEFAULT_CONFIG_FILE,
            r#"(sku_url: Some("http://file/skus"), request_timeout_secs: 5)"#,
        );
        let config =
            DashboardConfig::load_with(&GlobalArgs::default(), &path, env_from(&[])).unwrap();
        assert_eq!(config.sku_url.as_deref(), Some("http://file/skus"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, DashboardConfig::default().connect_timeout_secs);
        assert_eq!(
            config.client_settings().request_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "custom.ron",
            r#"(sku_url: Some("http://file/skus"), stats_url: Some("http://file/stats"), log_level: "info")"#,
        );
        let args = GlobalArgs {
            config: Some(path),
            sku_url: Some("http://flag/skus".to_string()),
            ..GlobalArgs::default()
        };
        let env = env_from(&[
            (ENV_SKU_URL, "http://env/skus"),
            (ENV_STATS_URL, "http://env/stats"),
            (ENV_LOG, "debug"),
            (ENV_WORKFLOWS_URL, "  "),
        ]);
        let config =
            DashboardConfig::load_with(&args, &dir.path().join("absent.ron"), env).unwrap();

        let endpoints = config.endpoints();
        assert_eq!(endpoints.sku_url.as_deref(), Some("http://flag/skus"));
        assert_eq!(endpoints.stats_url.as_deref(), Some("http://env/stats"));
        assert_eq!(endpoints.workflows_url, None);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn stats_only_config_needs_no_sku_url() {
        let config = DashboardConfig {
            stats_url: Some("http://hooks/stats".to_string()),
            sku_url: Some("  ".to_string()),
            ..DashboardConfig::default()
        };
        let endpoints = config.endpoints();
        assert_eq!(endpoints.sku_url, None);
        assert_eq!(endpoints.stats_url.as_deref(), Some("http://hooks/stats"));
        assert!(matches!(config.require_sku_url(), Err(ConfigError::MissingSkuUrl)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = GlobalArgs {
            config: Some(dir.path().join("nope.ron")),
            ..GlobalArgs::default()
        };
        let err = DashboardConfig::load_with(&args, Path::new("unused.ron"), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "bad.ron", "(sku_url: ");
        let args = GlobalArgs {
            config: Some(path),
            ..GlobalArgs::default()
        };
        let err = DashboardConfig::load_with(&args, Path::new("unused.ron"), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn bad_log_level_is_reported() {
        let config = DashboardConfig {
            log_level: "loud".to_string(),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.level_filter(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn workflow_links_join_cleanly() {
        let config = DashboardConfig {
            workflow_editor_url: Some("https://editor.example/".to_string()),
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.workflow_link("wf1").as_deref(),
            Some("https://editor.example/workflow/wf1")
        );
        assert_eq!(DashboardConfig::default().workflow_link("wf1"), None);
    }
}
