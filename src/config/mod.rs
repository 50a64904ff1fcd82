use serde::Deserialize;
use tokio::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

/// Overrides `app.database_uri` when set.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_at};

mod error;
pub use error::{ConfigError, ConfigResult};

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    database_uri: String,
    /// Serve swagger ui at `/docs`
    #[serde(default)]
    docs: bool,
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        let config = Self::from_slice(&bytes)?;
        Ok(config.with_database_uri(std::env::var(DATABASE_URL_ENV).ok()))
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        Ok(toml::from_slice(bytes)?)
    }

    fn with_database_uri(mut self, uri: Option<String>) -> Self {
        if let Some(uri) = uri.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("database uri taken from {}", DATABASE_URL_ENV);
            self.app.database_uri = uri;
        }
        self
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}
