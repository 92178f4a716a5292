//! Application configuration
//!
//! Configuration is loaded once at startup from:
//! 1. Default values
//! 2. Config file (~/.config/studip-sync/config.toml)
//! 3. Environment variables (STUDIP_SYNC_* prefix)
//! 4. Command-line overrides
//!
//! Later sources take precedence. The resulting `Config` is not mutated
//! afterwards and is passed by reference to every component.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix
const ENV_PREFIX: &str = "STUDIP_SYNC";

/// Name of the directory holding downloaded files
pub const ARCHIVE_DIR: &str = "archive";

/// Name of the directory holding the current semester's symlinks
pub const LINKS_DIR: &str = "this-semester";

/// Name of the file holding the selected semester id
pub const SEMESTER_MARKER: &str = ".current-semester";

/// How the session credential is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// Read the session cookie from the browser's session store
    Cookie,
    /// Use the `session_cookie` value from config or environment
    Manual,
}

impl FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cookie" => Ok(AuthMethod::Cookie),
            "manual" => Ok(AuthMethod::Manual),
            other => Err(format!(
                "Auth method \"{}\" not supported (expected cookie or manual)",
                other
            )),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Cookie => write!(f, "cookie"),
            AuthMethod::Manual => write!(f, "manual"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the mirrored data (archive, links, semester marker)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Stud.IP host name
    #[serde(default = "default_host")]
    pub host: String,

    /// Path prefix of the REST API on the host
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_auth_method")]
    pub auth_method: AuthMethod,

    /// Browser to extract the session cookie from
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Session cookie value for `auth_method = "manual"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// Commit archive and link changes to git
    #[serde(default)]
    pub use_git: bool,

    /// Push after each commit
    #[serde(default = "default_true")]
    pub git_push: bool,

    #[serde(default = "default_commit_prefix")]
    pub git_commit_message_prefix: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Write logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line; `None` leaves the loaded value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub auth_method: Option<AuthMethod>,
    pub browser: Option<String>,
    pub use_git: Option<bool>,
    pub git_commit_message_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            api_prefix: default_api_prefix(),
            auth_method: default_auth_method(),
            browser: default_browser(),
            session_cookie: None,
            use_git: false,
            git_push: true,
            git_commit_message_prefix: default_commit_prefix(),
            timeout_secs: default_timeout(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, honoring a `--config` path and CLI overrides
    pub fn load_with(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_var("DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }

        if let Some(val) = env_var("HOST") {
            self.host = val;
        }

        if let Some(val) = env_var("AUTH_METHOD") {
            self.auth_method = val
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}_AUTH_METHOD: {}", ENV_PREFIX, e))?;
        }

        if let Some(val) = env_var("BROWSER") {
            self.browser = val;
        }

        if let Some(val) = env_var("USE_GIT") {
            self.use_git = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // Empty string clears it
        if let Some(val) = env_var("SESSION_COOKIE") {
            self.session_cookie = if val.is_empty() { None } else { Some(val) };
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref dir) = overrides.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(method) = overrides.auth_method {
            self.auth_method = method;
        }
        if let Some(ref browser) = overrides.browser {
            self.browser = browser.clone();
        }
        if let Some(use_git) = overrides.use_git {
            self.use_git = use_git;
        }
        if let Some(ref prefix) = overrides.git_commit_message_prefix {
            self.git_commit_message_prefix = prefix.clone();
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with STUDIP_SYNC_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Some(path) = env_var("CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studip-sync")
            .join("config.toml")
    }

    /// Base URL of the REST API, without trailing slash
    pub fn api_base_url(&self) -> String {
        format!(
            "https://{}{}",
            self.host,
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// Directory holding downloaded files
    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_DIR)
    }

    /// Directory holding the current semester's symlinks
    pub fn links_dir(&self) -> PathBuf {
        self.data_dir.join(LINKS_DIR)
    }

    /// File holding the selected semester id
    pub fn semester_marker_path(&self) -> PathBuf {
        self.data_dir.join(SEMESTER_MARKER)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, name)).ok()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "studip.uni-passau.de".to_string()
}

fn default_api_prefix() -> String {
    "/studip/api.php".to_string()
}

fn default_auth_method() -> AuthMethod {
    AuthMethod::Cookie
}

fn default_browser() -> String {
    "firefox".to_string()
}

fn default_true() -> bool {
    true
}

fn default_commit_prefix() -> String {
    "studip-sync: ".to_string()
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    pub(crate) struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        pub(crate) fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    pub(crate) const ENV_VARS: &[&str] = &[
        "STUDIP_SYNC_CONFIG",
        "STUDIP_SYNC_DATA_DIR",
        "STUDIP_SYNC_HOST",
        "STUDIP_SYNC_AUTH_METHOD",
        "STUDIP_SYNC_BROWSER",
        "STUDIP_SYNC_USE_GIT",
        "STUDIP_SYNC_SESSION_COOKIE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.use_git);
        assert!(config.git_push);
        assert_eq!(config.auth_method, AuthMethod::Cookie);
        assert_eq!(config.browser, "firefox");
        assert_eq!(config.git_commit_message_prefix, "studip-sync: ");
        assert_eq!(
            config.api_base_url(),
            "https://studip.uni-passau.de/studip/api.php"
        );
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/studip"),
            ..Config::default()
        };

        assert_eq!(config.archive_dir(), PathBuf::from("/data/studip/archive"));
        assert_eq!(
            config.links_dir(),
            PathBuf::from("/data/studip/this-semester")
        );
        assert_eq!(
            config.semester_marker_path(),
            PathBuf::from("/data/studip/.current-semester")
        );
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STUDIP_SYNC_DATA_DIR", "/tmp/studip-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/studip-test"));
    }

    #[test]
    fn test_env_override_use_git() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STUDIP_SYNC_USE_GIT", "true");
        config.apply_env_overrides().unwrap();
        assert!(config.use_git);

        env::set_var("STUDIP_SYNC_USE_GIT", "0");
        config.apply_env_overrides().unwrap();
        assert!(!config.use_git);
    }

    #[test]
    fn test_env_override_auth_method() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STUDIP_SYNC_AUTH_METHOD", "manual");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.auth_method, AuthMethod::Manual);

        env::set_var("STUDIP_SYNC_AUTH_METHOD", "oauth");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_session_cookie() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STUDIP_SYNC_SESSION_COOKIE", "abc123");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.session_cookie.as_deref(), Some("abc123"));

        env::set_var("STUDIP_SYNC_SESSION_COOKIE", "");
        config.apply_env_overrides().unwrap();
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            host = "elearning.example.edu"
            auth_method = "manual"
            session_cookie = "s3cr3t"
            use_git = true
            git_push = false
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.host, "elearning.example.edu");
        assert_eq!(config.auth_method, AuthMethod::Manual);
        assert_eq!(config.session_cookie.as_deref(), Some("s3cr3t"));
        assert!(config.use_git);
        assert!(!config.git_push);
        // Unset keys keep their defaults
        assert_eq!(config.api_prefix, "/studip/api.php");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(!config.use_git);
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_overrides_win() {
        let _guard = EnvGuard::new(ENV_VARS);
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/from/file\"\nbrowser = \"firefox\"\n").unwrap();

        env::set_var("STUDIP_SYNC_DATA_DIR", "/from/env");

        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("/from/cli")),
            use_git: Some(true),
            git_commit_message_prefix: Some("sync: ".to_string()),
            ..ConfigOverrides::default()
        };
        let config = Config::load_with(Some(&path), &overrides).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/from/cli"));
        assert!(config.use_git);
        assert_eq!(config.git_commit_message_prefix, "sync: ");
        assert_eq!(config.auth_method, AuthMethod::Cookie);
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            data_dir: PathBuf::from("/data/studip"),
            use_git: true,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("auth_method = \"cookie\""));
        assert!(!toml_str.contains("session_cookie"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.use_git, config.use_git);
    }
}
