// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::collections::HashMap;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AccessLogFormat, Config, HttpConfig, LogLevel};

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// `KEY=VALUE` file consulted for `PORT` when the process environment lacks it
pub const DOTENV_FILE: &str = ".env";

impl Config {
    /// Load configuration from the given file path (without extension).
    ///
    /// Sources, lowest precedence first: built-in defaults, the config file
    /// (optional), `SERVER_*` environment variables, then `PORT` (from the
    /// environment or `.env`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let port = port_setting(std::env::var(PORT_ENV).ok(), DOTENV_FILE)?;
        Self::build(config_path, port.as_deref())
    }

    fn build(config_path: &str, port_override: Option<&str>) -> Result<Self, config::ConfigError> {
        let port_override = port_override
            .map(|raw| {
                raw.trim().parse::<u16>().map_err(|e| {
                    config::ConfigError::Message(format!("Invalid {PORT_ENV} value '{raw}': {e}"))
                })
            })
            .transpose()?;

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "bench-tools/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 65_536)? // 64KB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port_override.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, for unit tests
    #[cfg(test)]
    pub(crate) fn defaults() -> Self {
        Self::build("does-not-exist/bench-tools-config", None)
            .expect("built-in defaults must deserialize")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// The process environment wins over the dotenv file
fn port_setting(
    env_value: Option<String>,
    dotenv_path: &str,
) -> Result<Option<String>, config::ConfigError> {
    match env_value {
        Some(value) => Ok(Some(value)),
        None => dotenv_var(dotenv_path, PORT_ENV),
    }
}

/// Look up `key` in an optional dotenv file, parsed as section-less INI
fn dotenv_var(path: &str, key: &str) -> Result<Option<String>, config::ConfigError> {
    let vars: HashMap<String, String> = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Ini).required(false))
        .build()?
        .try_deserialize()?;

    // File keys keep their case
    Ok(vars
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dotenv(name: &str, contents: &str) -> String {
        let file = format!("bench-tools-{}-{name}.env", std::process::id());
        let path = std::env::temp_dir().join(file);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    const MISSING_FILE: &str = "does-not-exist/bench-tools-config";

    #[test]
    fn test_defaults() {
        let cfg = Config::build(MISSING_FILE, None).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Combined);
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.http.max_body_size, 65_536);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::build(MISSING_FILE, Some("8081")).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:8081".parse().unwrap()
        );
    }

    #[test]
    fn test_invalid_port_override() {
        assert!(Config::build(MISSING_FILE, Some("http")).is_err());
        assert!(Config::build(MISSING_FILE, Some("70000")).is_err());
    }

    #[test]
    fn test_port_from_dotenv() {
        let path = write_dotenv("port", "# local settings\nDEBUG=1\nPORT=8082\n");
        assert_eq!(port_setting(None, &path).unwrap().as_deref(), Some("8082"));

        let cfg = Config::build(MISSING_FILE, port_setting(None, &path).unwrap().as_deref())
            .unwrap();
        assert_eq!(cfg.server.port, 8082);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_environment_port_beats_dotenv() {
        let path = write_dotenv("precedence", "PORT=8082\n");
        assert_eq!(
            port_setting(Some("9000".to_string()), &path).unwrap().as_deref(),
            Some("9000")
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_dotenv_leaves_port_unset() {
        assert_eq!(port_setting(None, "does-not-exist/.env").unwrap(), None);

        let path = write_dotenv("no-port", "DEBUG=1\n");
        assert_eq!(port_setting(None, &path).unwrap(), None);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::build(MISSING_FILE, Some("5000")).unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
