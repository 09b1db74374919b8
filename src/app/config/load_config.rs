//! Dapp configuration loading from file and environment.

use std::fs;
use std::path::PathBuf;

use url::Url;

use crate::domain::configuration::parse_config_content;
use crate::domain::{AppError, DappConfig};

/// Environment variable the rollup node uses to advertise its HTTP server.
pub const SERVER_URL_ENV: &str = "ROLLUP_HTTP_SERVER_URL";

/// Where configuration comes from, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Optional TOML file.
    pub path: Option<PathBuf>,
    /// Explicit server URL, overriding file and environment.
    pub server_url: Option<Url>,
}

/// Load configuration: defaults, then the file, then `ROLLUP_HTTP_SERVER_URL`,
/// then the explicit server URL.
pub fn load_config(source: &ConfigSource) -> Result<DappConfig, AppError> {
    let mut config = match &source.path {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::ConfigNotFound(path.clone()));
            }
            parse_config_content(&fs::read_to_string(path)?)?
        }
        None => DappConfig::default(),
    };

    if let Ok(raw) = std::env::var(SERVER_URL_ENV)
        && !raw.trim().is_empty()
    {
        config.rollup.server_url = Url::parse(raw.trim()).map_err(|e| {
            AppError::InvalidConfig(format!(
                "{} is not a valid URL ({}): {}",
                SERVER_URL_ENV, e, raw
            ))
        })?;
    }

    if let Some(url) = &source.server_url {
        config.rollup.server_url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    struct EnvVarGuard {
        key: String,
        original: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set<K: Into<String>, V: AsRef<std::ffi::OsStr>>(key: K, value: V) -> Self {
            let key = key.into();
            let original = std::env::var_os(&key);
            unsafe { std::env::set_var(&key, value) };
            Self { key, original }
        }

        fn remove<K: Into<String>>(key: K) -> Self {
            let key = key.into();
            let original = std::env::var_os(&key);
            unsafe { std::env::remove_var(&key) };
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            if let Some(original) = self.original.as_ref() {
                unsafe { std::env::set_var(&self.key, original) };
            } else {
                unsafe { std::env::remove_var(&self.key) };
            }
        }
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("ballot-dapp.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn defaults_without_file_or_env() {
        let _guard = EnvVarGuard::remove(SERVER_URL_ENV);
        let config = load_config(&ConfigSource::default()).unwrap();
        assert_eq!(config, DappConfig::default());
    }

    #[test]
    #[serial]
    fn reads_file() {
        let _guard = EnvVarGuard::remove(SERVER_URL_ENV);
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[governance]\nvoting_period_secs = 60\n");

        let config = load_config(&ConfigSource { path: Some(path), server_url: None }).unwrap();
        assert_eq!(config.governance.voting_period_secs, 60);
    }

    #[test]
    #[serial]
    fn missing_file_is_reported() {
        let _guard = EnvVarGuard::remove(SERVER_URL_ENV);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(&ConfigSource { path: Some(path.clone()), server_url: None })
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigNotFound(p) if p == path));
    }

    #[test]
    #[serial]
    fn env_overrides_file_and_flag_overrides_env() {
        let _guard = EnvVarGuard::set(SERVER_URL_ENV, "http://env-host:5004");
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[rollup]\nserver_url = \"http://file-host:5004\"\n");

        let config =
            load_config(&ConfigSource { path: Some(path.clone()), server_url: None }).unwrap();
        assert_eq!(config.rollup.server_url.host_str(), Some("env-host"));

        let flag = Url::parse("http://flag-host:5004").unwrap();
        let config =
            load_config(&ConfigSource { path: Some(path), server_url: Some(flag) }).unwrap();
        assert_eq!(config.rollup.server_url.host_str(), Some("flag-host"));
    }

    #[test]
    #[serial]
    fn invalid_env_url_is_rejected() {
        let _guard = EnvVarGuard::set(SERVER_URL_ENV, "not a url");
        let err = load_config(&ConfigSource::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(msg) if msg.contains(SERVER_URL_ENV)));
    }
}
