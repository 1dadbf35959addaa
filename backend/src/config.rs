//! # Gateway Configuration
//!
//! Settings live in `config.yaml` inside the data directory, which is created
//! with defaults on first start. Environment variables override the file:
//!
//! | Variable              | Setting                |
//! |-----------------------|------------------------|
//! | `ASTROS_DATA_DIR`     | data directory         |
//! | `ASTROS_API_BASE_URL` | Astros API base URL    |
//! | `ASTROS_LISTEN_ADDR`  | gateway listen address |
//! | `ASTROS_WEEK_START`   | `monday` or `sunday`   |
//! | `ASTROS_CORS_ORIGIN`  | allowed UI origin      |

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::WeekStart;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub listen_addr: String,
    pub week_start: WeekStart,
    pub cors_origin: Option<String>,
    pub request_timeout_secs: u64,
    /// Where `config.yaml` and the saved session live; never written to the file
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            listen_addr: "127.0.0.1:3000".to_string(),
            week_start: WeekStart::Monday,
            cors_origin: Some("http://localhost:8080".to_string()),
            request_timeout_secs: 15,
            data_dir: PathBuf::new(),
        }
    }
}

impl AppConfig {
    /// Load the configuration for this process: file first, then environment
    pub fn load() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let data_dir = match lookup("ASTROS_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let mut config = Self::load_from(&data_dir)?;
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Read `config.yaml` from `data_dir`, creating it with defaults if missing
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            let yaml = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
            let config: AppConfig =
                serde_yaml::from_str(&yaml).with_context(|| format!("Invalid configuration in {:?}", path))?;
            debug!("Loaded configuration from {:?}", path);
            config
        } else {
            let config = AppConfig::default();
            fs::create_dir_all(data_dir).with_context(|| format!("Failed to create {:?}", data_dir))?;
            fs::write(&path, serde_yaml::to_string(&config)?)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Created default configuration at {:?}", path);
            config
        };

        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    /// Apply `ASTROS_*` overrides; `lookup` returns the value of a variable
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("ASTROS_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(addr) = lookup("ASTROS_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(week_start) = lookup("ASTROS_WEEK_START") {
            self.week_start = parse_week_start(&week_start)?;
        }
        if let Some(dir) = lookup("ASTROS_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(origin) = lookup("ASTROS_CORS_ORIGIN") {
            self.cors_origin = Some(origin).filter(|o| !o.trim().is_empty());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.listen_addr))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_week_start(raw: &str) -> Result<WeekStart> {
    match raw.trim().to_lowercase().as_str() {
        "monday" => Ok(WeekStart::Monday),
        "sunday" => Ok(WeekStart::Sunday),
        other => bail!("Unknown week start '{}', expected monday or sunday", other),
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("astros"))
        .ok_or_else(|| anyhow!("Could not determine the user data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = AppConfig::load_from(temp_dir.path()).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.data_dir, temp_dir.path());

        let written = fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert!(written.contains("api_base_url"));
        assert!(!written.contains("data_dir"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "api_base_url: https://astros.example.com\nweek_start: sunday\n",
        )
        .unwrap();

        let config = AppConfig::load_from(temp_dir.path()).unwrap();
        assert_eq!(config.api_base_url, "https://astros.example.com");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn test_environment_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::load_from(temp_dir.path()).unwrap();

        let env: HashMap<&str, &str> = [
            ("ASTROS_API_BASE_URL", "http://10.0.0.5:5000"),
            ("ASTROS_LISTEN_ADDR", "0.0.0.0:8000"),
            ("ASTROS_WEEK_START", "Sunday"),
            ("ASTROS_CORS_ORIGIN", ""),
        ]
        .into_iter()
        .collect();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.5:5000");
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn test_bad_week_start_is_an_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "ASTROS_WEEK_START").then(|| "friday".to_string()));
        assert!(result.is_err());
    }
}
