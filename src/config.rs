//! Configuration management for the MOSS client
//!
//! Loads account and submission defaults from an optional `moss.toml` with
//! environment overrides (`MOSS_USER_ID`, `MOSS_OPTIONS__MAX_MATCHES`, ...).

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::SessionError;
use crate::protocol::Language;
use crate::session::{DEFAULT_SERVER_ADDRESS, SessionClient, SessionOptions};

/// Default configuration file name, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "moss";

/// Complete client configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the MOSS service
    /// Environment: MOSS_SERVER_ADDRESS
    pub server_address: String,

    /// Account identifier sent in the `moss` command
    /// Environment: MOSS_USER_ID
    pub user_id: String,

    /// Language tag of the submitted sources
    /// Environment: MOSS_LANGUAGE
    pub language: String,

    /// Handshake and query options
    pub options: SessionOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            user_id: String::new(),
            language: "c".to_string(),
            options: SessionOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `moss.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH, false)
    }

    /// Load configuration from `path`; the file must exist when `required` is set
    pub fn load_from(path: &str, required: bool) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix("MOSS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_address cannot be empty".into(),
            ));
        }

        if self.user_id.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "user_id cannot be empty".into(),
            ));
        }

        if let Err(e) = self.language.parse::<Language>() {
            return Err(config::ConfigError::Message(e.to_string()));
        }

        if self.options.max_matches == 0 {
            return Err(config::ConfigError::Message(
                "max_matches must be greater than 0".into(),
            ));
        }

        if self.options.show_limit == 0 {
            return Err(config::ConfigError::Message(
                "show_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Build a disconnected TCP session from this configuration
    pub fn session(&self) -> Result<SessionClient, SessionError> {
        let mut session = SessionClient::new(&self.language, self.user_id.clone())?;
        session.set_server_address(self.server_address.clone())?;
        *session.options_mut()? = self.options.clone();
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Loading reads process-wide MOSS_* variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn valid() -> ClientConfig {
        ClientConfig {
            user_id: "604014254".into(),
            language: "java".into(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server_address, "moss.stanford.edu:7690");
        assert_eq!(config.options.max_matches, 10);
        assert_eq!(config.options.show_limit, 250);
        assert_eq!(config.options.directory_mode, 1);
        assert_eq!(config.options.experimental, 0);
        assert_eq!(config.options.comment, "");
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());
        assert!(ClientConfig::default().validate().is_err());

        let mut config = valid();
        config.language = "cobol".into();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.options.show_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "user_id = \"u1\"\nlanguage = \"python\"\n\n[options]\nmax_matches = 3\ncomment = \"hw 4\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = ClientConfig::load_from(path, true).unwrap();
        assert_eq!(config.user_id, "u1");
        assert_eq!(config.language, "python");
        assert_eq!(config.options.max_matches, 3);
        assert_eq!(config.options.show_limit, 250);
        assert_eq!(config.options.comment, "hw 4");
        assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
    }

    #[test]
    fn test_environment_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        // SAFETY: ENV_LOCK serializes every test touching MOSS_* variables.
        unsafe {
            std::env::set_var("MOSS_USER_ID", "from_env");
            std::env::set_var("MOSS_OPTIONS__MAX_MATCHES", "7");
        }
        let loaded = ClientConfig::load_from(missing.to_str().unwrap(), false);
        unsafe {
            std::env::remove_var("MOSS_USER_ID");
            std::env::remove_var("MOSS_OPTIONS__MAX_MATCHES");
        }

        let config = loaded.unwrap();
        assert_eq!(config.user_id, "from_env");
        assert_eq!(config.options.max_matches, 7);
        assert_eq!(config.options.show_limit, 250);
    }

    #[test]
    fn test_session_from_config() {
        let mut config = valid();
        config.server_address = "127.0.0.1:7690".into();
        config.options.comment = "batch".into();

        let session = config.session().unwrap();
        assert_eq!(session.language(), Language::Java);
        assert_eq!(session.identity(), "604014254");
        assert_eq!(session.server_address(), "127.0.0.1:7690");
        assert_eq!(session.options().comment, "batch");
    }
}
