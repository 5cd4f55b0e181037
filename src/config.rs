use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Environment variable prefix, e.g. `RDSKIT_DATABASE=/tmp/app.sqlite3`
pub const ENV_PREFIX: &str = "RDSKIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RdsConfig {
    /// Path to the SQLite database file
    pub database: String,

    /// Host name used for control lookups (default: OS host name)
    pub host: Option<String>,

    /// Maximum connection lifetime in seconds, 0 disables (default: 15 minutes)
    pub pool_max_lifetime_secs: u64,

    /// Maximum open connections (default: 20)
    pub pool_max_open: u32,

    /// Connections kept open while idle (default: 4)
    pub pool_max_idle: u32,

    /// Wait on a locked database, in milliseconds (default: 5000)
    pub busy_timeout_ms: u64,

    /// Use a single connection instead of a pool
    pub single_conn: bool,
}

const EMPTY_CONFIG: &str = r#"### rdskit configuration file

### SQLite database file
# database = "~/.rdskit/rdskit.sqlite3"

### host name used for control lookups (defaults to the OS host name)
# host = "web-01"

### connection pool settings
# pool_max_lifetime_secs = 900   # 15 minutes, 0 disables
# pool_max_open = 20
# pool_max_idle = 4
# busy_timeout_ms = 5000
# single_conn = false
"#;

impl Default for RdsConfig {
    fn default() -> Self {
        Self {
            database: format!("{}/rdskit.sqlite3", default_dir()),
            host: None,
            pool_max_lifetime_secs: 900, // 15 minutes
            pool_max_open: 20,
            pool_max_idle: 4,
            busy_timeout_ms: 5000,
            single_conn: false,
        }
    }
}

impl RdsConfig {
    /// Load the configuration
    ///
    /// By default `$HOME/.rdskit/rdskit.toml` is used; a commented-out template
    /// is written there if the file does not exist yet. Environment variables
    /// prefixed with `RDSKIT_` override file values.
    pub fn new(path: &Option<String>) -> Result<RdsConfig> {
        let file = match path {
            Some(p) => p.clone(),
            None => {
                let dir = default_dir();
                std::fs::create_dir_all(dir.as_str())
                    .map_err(|e| anyhow!("Unable to create rdskit directory: {}", e))?;
                Self::config_file_path()
            }
        };

        if !Path::new(file.as_str()).exists() {
            std::fs::write(file.as_str(), EMPTY_CONFIG)
                .map_err(|e| anyhow!("Unable to create config file {}: {}", file, e))?;
        }

        Self::load(
            Some(Path::new(file.as_str())),
            config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Build the configuration from an optional TOML file and an environment source
    pub fn load(file: Option<&Path>, env: config::Environment) -> Result<RdsConfig> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow!("Could not convert path to string"))?;
            builder = builder.add_source(config::File::with_name(path_str));
        }
        builder = builder.add_source(env);

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let defaults = RdsConfig::default();

        let database = match config.get("database") {
            Some(p) => expand_home(p),
            None => defaults.database,
        };

        let host = config
            .get("host")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok(RdsConfig {
            database,
            host,
            pool_max_lifetime_secs: parse_or(
                &config,
                "pool_max_lifetime_secs",
                defaults.pool_max_lifetime_secs,
            )?,
            pool_max_open: parse_or(&config, "pool_max_open", defaults.pool_max_open)?,
            pool_max_idle: parse_or(&config, "pool_max_idle", defaults.pool_max_idle)?,
            busy_timeout_ms: parse_or(&config, "busy_timeout_ms", defaults.busy_timeout_ms)?,
            single_conn: parse_or(&config, "single_conn", defaults.single_conn)?,
        })
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let host = match &self.host {
            Some(h) => h.clone(),
            None => format!("{} (OS)", crate::database::local_hostname()),
        };
        let lines = [
            format!("Database:           {}", self.database),
            format!("Host:               {}", host),
            format!(
                "Pool Max Lifetime:  {} seconds",
                self.pool_max_lifetime_secs
            ),
            format!("Pool Max Open:      {}", self.pool_max_open),
            format!("Pool Max Idle:      {}", self.pool_max_idle),
            format!("Busy Timeout:       {} ms", self.busy_timeout_ms),
            format!("Single Connection:  {}", self.single_conn),
        ];
        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        format!("{}/rdskit.toml", default_dir())
    }
}

fn default_dir() -> String {
    let home_dir = dirs::home_dir()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/.rdskit", home_dir)
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}/{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}

fn parse_or<T>(config: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match config.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value '{}' for {}: {}", raw, key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()))
    }

    #[test]
    fn test_defaults() {
        let config = RdsConfig::load(None, no_env()).unwrap();
        assert_eq!(config, RdsConfig::default());
        assert_eq!(config.pool_max_lifetime_secs, 900);
        assert_eq!(config.pool_max_open, 20);
        assert_eq!(config.pool_max_idle, 4);
        assert!(config.database.ends_with("/.rdskit/rdskit.sqlite3"));
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdskit.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "database = \"/tmp/app.sqlite3\"\nhost = \"db-07\"\npool_max_open = 5\nsingle_conn = true"
        )
        .unwrap();

        let config = RdsConfig::load(Some(&path), no_env()).unwrap();
        assert_eq!(config.database, "/tmp/app.sqlite3");
        assert_eq!(config.host.as_deref(), Some("db-07"));
        assert_eq!(config.pool_max_open, 5);
        assert!(config.single_conn);
        assert_eq!(config.pool_max_idle, 4);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdskit.toml");
        std::fs::write(&path, "pool_max_idle = 2\n").unwrap();

        let mut vars = config::Map::new();
        vars.insert("RDSKIT_POOL_MAX_IDLE".to_string(), "8".to_string());
        vars.insert("RDSKIT_HOST".to_string(), "from-env".to_string());
        let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let config = RdsConfig::load(Some(&path), env).unwrap();
        assert_eq!(config.pool_max_idle, 8);
        assert_eq!(config.host.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let mut vars = config::Map::new();
        vars.insert("RDSKIT_POOL_MAX_OPEN".to_string(), "many".to_string());
        let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        assert!(RdsConfig::load(None, env).is_err());
    }

    #[test]
    fn test_new_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");
        let path_str = path.to_str().unwrap().to_string();

        RdsConfig::new(&Some(path_str)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("### rdskit configuration file"));
    }

    #[test]
    fn test_summary_mentions_database() {
        let config = RdsConfig {
            database: "/data/app.sqlite3".to_string(),
            host: Some("web-01".to_string()),
            ..RdsConfig::default()
        };
        let summary = config.summary();
        assert!(summary.contains("/data/app.sqlite3"));
        assert!(summary.contains("web-01"));
    }
}
