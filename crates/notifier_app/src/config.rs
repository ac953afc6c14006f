//! Run configuration, read from a RON file.
//!
//! Only the portal credentials and the webhook URL are required; everything
//! else falls back to defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use notifier_core::DEFAULT_SUBJECT_PREFIX;
use notifier_engine::{
    EnabledCategories, HttpSettings, PortalCredentials, RunSettings, DEFAULT_LESSON_WINDOW_DAYS,
    DEFAULT_STATE_FILENAME,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILENAME: &str = "notifier.ron";
pub const DEFAULT_LOG_FILENAME: &str = "notifier.log";

#[derive(Clone, Deserialize)]
pub struct PortalConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    pub grades: bool,
    pub cancelled_lessons: bool,
    pub announcements: bool,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            grades: true,
            cancelled_lessons: true,
            announcements: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub portal: PortalConfig,
    pub webhook_url: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_to_terminal")]
    pub log_to_terminal: bool,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    #[serde(default = "default_lesson_window_days")]
    pub lesson_window_days: u32,
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILENAME)
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILENAME)
}

fn default_log_to_terminal() -> bool {
    true
}

fn default_subject_prefix() -> String {
    DEFAULT_SUBJECT_PREFIX.to_string()
}

fn default_lesson_window_days() -> u32 {
    DEFAULT_LESSON_WINDOW_DAYS
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file {path:?}"))?;
        Self::parse(&content).with_context(|| format!("invalid configuration file {path:?}"))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = ron::from_str(content)?;
        anyhow::ensure!(!config.portal.url.is_empty(), "portal.url is empty");
        anyhow::ensure!(!config.webhook_url.is_empty(), "webhook_url is empty");
        Ok(config)
    }

    pub fn credentials(&self) -> PortalCredentials {
        PortalCredentials {
            url: self.portal.url.clone(),
            username: self.portal.username.clone(),
            password: self.portal.password.clone(),
        }
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.http.request_timeout_secs),
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            subject_prefix: self.subject_prefix.clone(),
            lesson_window_days: self.lesson_window_days,
            categories: EnabledCategories {
                grades: self.categories.grades,
                cancelled_lessons: self.categories.cancelled_lessons,
                announcements: self.categories.announcements,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        portal: (url: "https://bridge.example.com/api", username: "student", password: "secret"),
        webhook_url: "https://relay.example.com/hook",
    )"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AppConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.state_file, PathBuf::from("notifier_state.ron"));
        assert_eq!(config.log_file, PathBuf::from("notifier.log"));
        assert!(config.log_to_terminal);
        assert_eq!(config.subject_prefix, "[PortalNotify]");

        let settings = config.run_settings();
        assert_eq!(settings.lesson_window_days, 14);
        assert_eq!(settings.categories, EnabledCategories::default());

        let http = config.http_settings();
        assert_eq!(http.connect_timeout, Duration::from_secs(10));
        assert_eq!(http.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::parse(
            r#"(
                portal: (url: "https://bridge.example.com", username: "u", password: "p"),
                webhook_url: "https://relay.example.com/hook",
                state_file: "/var/lib/notifier/state.ron",
                subject_prefix: "[School]",
                lesson_window_days: 7,
                categories: (grades: false),
                http: (request_timeout_secs: 5),
            )"#,
        )
        .unwrap();

        let settings = config.run_settings();
        assert_eq!(settings.subject_prefix, "[School]");
        assert_eq!(settings.lesson_window_days, 7);
        assert!(!settings.categories.grades);
        assert!(settings.categories.announcements);
        assert_eq!(config.http_settings().request_timeout, Duration::from_secs(5));
        assert_eq!(config.http_settings().connect_timeout, Duration::from_secs(10));
        assert_eq!(config.credentials().username, "u");
    }

    #[test]
    fn debug_output_hides_the_password() {
        let config = AppConfig::parse(MINIMAL).unwrap();

        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("student"));
        assert!(!format!("{:?}", config.credentials()).contains("secret"));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        assert!(AppConfig::parse(r#"(webhook_url: "https://relay.example.com/hook")"#).is_err());
    }

    #[test]
    fn empty_webhook_is_rejected() {
        let content = MINIMAL.replace("https://relay.example.com/hook", "");
        assert!(AppConfig::parse(&content).is_err());
    }
}
