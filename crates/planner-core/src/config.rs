use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "TeamPlanner";
pub const DEFAULT_ENVIRONMENT: &str = "local";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "./teamplanner.db";
pub const DEFAULT_CONFIG_PATH: &str = "./planner.toml";
pub const DB_INIT_ATTEMPTS: u32 = 30; // give a cold database volume ~30s to appear
pub const DB_INIT_RETRY_DELAY_MS: u64 = 1_000;

/// Top-level config (planner.toml + PLANNER_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Display name, reported by /health and used as the UI title.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Runtime environment label. `local` turns on verbose HTTP tracing.
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            environment: default_environment(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// How many times startup tries to open and migrate the database.
    #[serde(default = "default_init_attempts")]
    pub init_attempts: u32,
    /// Pause between two bootstrap attempts.
    #[serde(default = "default_init_retry_delay_ms")]
    pub init_retry_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            init_attempts: default_init_attempts(),
            init_retry_delay_ms: default_init_retry_delay_ms(),
        }
    }
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}
fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}
fn default_init_attempts() -> u32 {
    DB_INIT_ATTEMPTS
}
fn default_init_retry_delay_ms() -> u64 {
    DB_INIT_RETRY_DELAY_MS
}

impl PlannerConfig {
    /// Load config from a TOML file with PLANNER_* env var overrides.
    ///
    /// Nested keys are separated by a double underscore so field names keep
    /// their own underscores: `PLANNER_SERVER__PORT=9000`,
    /// `PLANNER_DATABASE__INIT_ATTEMPTS=5`. A missing file is not an error;
    /// every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);

        let config: PlannerConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("PLANNER_").split("__"))
            .extract()
            .map_err(|e| crate::error::PlannerError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn is_local(&self) -> bool {
        self.environment.eq_ignore_ascii_case("local")
    }
}
