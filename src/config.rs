use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::system::monitor::MonitorConfig;
use crate::system::sampler::SamplerConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub sampler: SamplerSection,
    pub cache: CacheConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub default_sort: String,
    pub sort_descending: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            default_sort: "memory".to_string(),
            sort_descending: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerSection {
    pub poll_interval_ms: u64,
    pub retry_interval_ms: u64,
    pub cpu_window_ms: u64,
    pub reserved_names: Vec<String>,
}

impl Default for SamplerSection {
    fn default() -> Self {
        SamplerSection {
            poll_interval_ms: 2000,
            retry_interval_ms: 1000,
            cpu_window_ms: 200,
            reserved_names: vec!["System".to_string(), "svchost".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub instance_ttl_ms: u64,
    pub probe_window_ms: u64,
    pub sweep_after_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            instance_ttl_ms: 2000,
            probe_window_ms: 100,
            sweep_after_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub cpu_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig { cpu_capacity: 60 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    /// JSON lines instead of plain text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn path(&self) -> Option<PathBuf> {
        self.file.clone().or_else(default_log_path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub filter: String,
    pub kill: String,
    pub instances: String,
    pub cycle_sort: String,
    pub reverse_sort: String,
    pub cycle_theme: String,
    pub help: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            filter: "/".to_string(),
            kill: "k".to_string(),
            instances: "Enter".to_string(),
            cycle_sort: "s".to_string(),
            reverse_sort: "r".to_string(),
            cycle_theme: "t".to_string(),
            help: "?".to_string(),
            refresh: "F5".to_string(),
        }
    }
}

impl Config {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            sampler: SamplerConfig {
                poll_interval: Duration::from_millis(self.sampler.poll_interval_ms),
                retry_interval: Duration::from_millis(self.sampler.retry_interval_ms),
                cpu_window: Duration::from_millis(self.sampler.cpu_window_ms),
                reserved_names: self.sampler.reserved_names.clone(),
            },
            instance_ttl: Duration::from_millis(self.cache.instance_ttl_ms),
            probe_window: Duration::from_millis(self.cache.probe_window_ms),
            cache_sweep_after: Duration::from_millis(self.cache.sweep_after_ms),
            cpu_history_capacity: self.history.cpu_capacity,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("grouptop").join("config.toml"))
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("grouptop").join("grouptop.log"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_rate_ms, 2000);
        assert_eq!(config.general.default_sort, "memory");
        assert!(config.general.sort_descending);
        assert_eq!(config.sampler.poll_interval_ms, 2000);
        assert_eq!(config.cache.instance_ttl_ms, 2000);
        assert_eq!(config.history.cpu_capacity, 60);
        assert_eq!(config.keybinds.quit, "q");
    }

    #[test]
    fn defaults_match_monitor_constants() {
        let monitor = Config::default().monitor_config();
        let expected = MonitorConfig::default();
        assert_eq!(monitor.sampler.poll_interval, expected.sampler.poll_interval);
        assert_eq!(monitor.sampler.retry_interval, expected.sampler.retry_interval);
        assert_eq!(monitor.sampler.cpu_window, expected.sampler.cpu_window);
        assert_eq!(monitor.sampler.reserved_names, expected.sampler.reserved_names);
        assert_eq!(monitor.instance_ttl, expected.instance_ttl);
        assert_eq!(monitor.probe_window, expected.probe_window);
        assert_eq!(monitor.cpu_history_capacity, expected.cpu_history_capacity);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[sampler]
poll_interval_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sampler.poll_interval_ms, 500);
        // Other fields should be defaults
        assert_eq!(config.sampler.retry_interval_ms, 1000);
        assert_eq!(config.general.default_sort, "memory");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 1000
default_sort = "cpu"
sort_descending = false

[sampler]
reserved_names = ["kthreadd"]

[cache]
instance_ttl_ms = 500

[history]
cpu_capacity = 120

[logging]
level = "debug"
file = "/tmp/grouptop.log"
json = true

[colors]
theme = "light"

[keybinds]
quit = "x"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert_eq!(config.general.default_sort, "cpu");
        assert!(!config.general.sort_descending);
        assert_eq!(config.sampler.reserved_names, vec!["kthreadd".to_string()]);
        assert_eq!(config.cache.instance_ttl_ms, 500);
        assert_eq!(config.history.cpu_capacity, 120);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.path(),
            Some(PathBuf::from("/tmp/grouptop.log"))
        );
        assert!(config.logging.json);
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.keybinds.quit, "x");

        let monitor = config.monitor_config();
        assert_eq!(monitor.instance_ttl, Duration::from_millis(500));
        assert_eq!(monitor.cpu_history_capacity, 120);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.refresh_rate_ms, 2000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("grouptop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.refresh_rate_ms, 2000);
        let _ = std::fs::remove_file(&temp);
    }
}
