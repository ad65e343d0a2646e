//! Configuration file support for starr.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARR_`, e.g., `STARR_SONARR_URL`)
//! 3. Config file (~/.config/starr/config.toml or ./starr.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [sonarr]
//! url = "http://localhost:8989"
//! api_key = "..."  # or use STARR_SONARR_API_KEY env var
//!
//! [radarr]
//! url = "http://localhost:7878"
//! api_key = "..."
//! max_retries = 3
//!
//! [lidarr]
//! url = "http://localhost:8686"
//! api_key = "..."
//!
//! [readarr]
//! url = "https://media.lan/readarr"
//! api_key = "..."
//! timeout_secs = 60
//!
//! [history]
//! per_page = 250
//! ```

use std::fmt;
use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigBuilder as Builder, Environment, File, FileFormat};
use config::builder::DefaultState;
use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable prefix.
const ENV_PREFIX: &str = "STARR";

/// Per-application keys containing an underscore. The generic environment
/// source splits on `_`, so these are mapped explicitly.
const UNDERSCORED_KEYS: [&str; 3] = ["api_key", "timeout_secs", "max_retries"];

/// The applications starr can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum App {
    Sonarr,
    Radarr,
    Lidarr,
    Readarr,
}

impl App {
    pub(crate) const ALL: [App; 4] = [App::Sonarr, App::Radarr, App::Lidarr, App::Readarr];

    /// Config section and environment variable infix.
    pub(crate) fn key(self) -> &'static str {
        match self {
            App::Sonarr => "sonarr",
            App::Radarr => "radarr",
            App::Lidarr => "lidarr",
            App::Readarr => "readarr",
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            App::Sonarr => "Sonarr",
            App::Radarr => "Radarr",
            App::Lidarr => "Lidarr",
            App::Readarr => "Readarr",
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sonarr: AppConfig,
    pub radarr: AppConfig,
    pub lidarr: AppConfig,
    pub readarr: AppConfig,
    /// Defaults for history listings.
    pub history: HistoryConfig,
}

/// Connection settings for one application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL, including any URL base the application is served under.
    pub url: Option<String>,
    /// API key from Settings > General.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures.
    pub max_retries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: starr::client::DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}

/// Default history options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Records requested per page.
    pub per_page: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            per_page: starr::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Error for an application that has no URL or API key configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MissingSetting {
    app: App,
    key: &'static str,
}

impl fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} not configured. Set {}_{}_{} or `{}` under [{}] in {}",
            self.app,
            self.key,
            ENV_PREFIX,
            self.app.key().to_uppercase(),
            self.key.to_uppercase(),
            self.key,
            self.app.key(),
            Config::default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "starr.toml".to_string()),
        )
    }
}

impl std::error::Error for MissingSetting {}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/starr/config.toml)
    /// 3. Local config file (./starr.toml)
    /// 4. Environment variables with STARR_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "starr") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("starr.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./starr.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., STARR_SONARR_URL -> sonarr.url
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("_")
                .try_parsing(true),
        );

        let builder = match with_env_overrides(builder, |name| std::env::var(name).ok()) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::warn!("Failed to apply environment overrides: {}", e);
                return Config::default();
            }
        };

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    pub(crate) fn app(&self, app: App) -> &AppConfig {
        match app {
            App::Sonarr => &self.sonarr,
            App::Radarr => &self.radarr,
            App::Lidarr => &self.lidarr,
            App::Readarr => &self.readarr,
        }
    }

    /// Client settings for `app`, failing when the URL or API key is missing.
    pub(crate) fn client_config(&self, app: App) -> Result<starr::Config, MissingSetting> {
        let settings = self.app(app);
        let url = non_empty(&settings.url).ok_or(MissingSetting { app, key: "url" })?;
        let api_key =
            non_empty(&settings.api_key).ok_or(MissingSetting { app, key: "api_key" })?;

        Ok(starr::Config {
            url: url.to_string(),
            api_key: api_key.to_string(),
            timeout_secs: settings.timeout_secs,
            max_retries: settings.max_retries,
        })
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "starr").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Map `STARR_<APP>_<KEY>` variables whose key contains an underscore.
fn with_env_overrides(
    mut builder: Builder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Builder<DefaultState>, config::ConfigError> {
    for app in App::ALL {
        for key in UNDERSCORED_KEYS {
            let var = format!("{}_{}_{}", ENV_PREFIX, app.key(), key).to_uppercase();
            if let Some(value) = lookup(&var) {
                builder = builder.set_override(format!("{}.{}", app.key(), key), value)?;
            }
        }
    }

    if let Some(value) = lookup(&format!("{}_HISTORY_PER_PAGE", ENV_PREFIX)) {
        builder = builder.set_override("history.per_page", value)?;
    }

    Ok(builder)
}
