use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const SUPPORTED_LOCALES: &[&str] = &["es", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Raw `Cookie` header value, e.g. `session=...`.
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default = "default_summary_interval_secs")]
    pub summary_interval_secs: u64,
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub sync_enabled: bool,
    #[serde(default = "default_true")]
    pub open_login: bool,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_summary_interval_secs() -> u64 {
    30
}
fn default_notification_secs() -> u64 {
    3
}
fn default_feedback_ms() -> u64 {
    2000
}
fn default_true() -> bool {
    true
}
fn default_locale() -> String {
    "es".to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            login_path: default_login_path(),
            auth_token: None,
            session_cookie: None,
            deck: None,
            summary_interval_secs: default_summary_interval_secs(),
            notification_secs: default_notification_secs(),
            feedback_ms: default_feedback_ms(),
            request_timeout_secs: None,
            sync_enabled: default_true(),
            open_login: default_true(),
            locale: default_locale(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cajas")
            .join("config.toml")
    }

    /// Repair values that deserialize fine but make no sense at runtime.
    pub fn normalize(&mut self) {
        while self.server_url.ends_with('/') {
            self.server_url.pop();
        }
        if self.server_url.is_empty() {
            self.server_url = default_server_url();
        }
        if !self.login_path.starts_with('/') {
            self.login_path.insert(0, '/');
        }
        if self.summary_interval_secs == 0 {
            self.summary_interval_secs = default_summary_interval_secs();
        }
        if self.notification_secs == 0 {
            self.notification_secs = default_notification_secs();
        }
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        self.deck = self
            .deck
            .take()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty());
        for secret in [&mut self.auth_token, &mut self.session_cookie] {
            if secret.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *secret = None;
            }
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.server_url, self.login_path)
    }

    pub fn summary_interval(&self) -> Duration {
        Duration::from_secs(self.summary_interval_secs)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn feedback_ttl(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.summary_interval_secs, 30);
        assert_eq!(config.notification_secs, 3);
        assert_eq!(config.locale, "es");
        assert!(config.sync_enabled);
        assert!(config.request_timeout_secs.is_none());
        assert!(config.deck.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
server_url = "https://bomberos.example.org/"
deck = "  Rescate "
sync_enabled = false
"#;
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.normalize();
        assert_eq!(config.server_url, "https://bomberos.example.org");
        assert_eq!(config.deck.as_deref(), Some("rescate"));
        assert!(!config.sync_enabled);
        assert_eq!(config.feedback_ms, 2000);
        assert_eq!(config.login_url(), "https://bomberos.example.org/login");
    }

    #[test]
    fn test_normalize_resets_nonsense_values() {
        let mut config = Config {
            summary_interval_secs: 0,
            notification_secs: 0,
            request_timeout_secs: Some(0),
            locale: "fr".to_string(),
            login_path: "entrar".to_string(),
            auth_token: Some("   ".to_string()),
            deck: Some(String::new()),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.summary_interval_secs, 30);
        assert_eq!(config.notification_secs, 3);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.locale, "es");
        assert_eq!(config.login_path, "/entrar");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.deck, None);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            deck: Some("incendios".to_string()),
            locale: "en".to_string(),
            request_timeout_secs: Some(15),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.deck.as_deref(), Some("incendios"));
        assert_eq!(loaded.locale, "en");
        assert_eq!(loaded.request_timeout_secs, Some(15));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.server_url, Config::default().server_url);
    }
}
