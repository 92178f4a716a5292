//! Session credentials
//!
//! Stud.IP authenticates API calls with the browser session cookie
//! (`Seminar_Session`). It is either read from Firefox's session store or
//! configured manually.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::{AuthMethod, Config};
use crate::error::{Error, LookupError, Result};

const COOKIE_NAME: &str = "Seminar_Session";

/// Decompressors for Firefox's mozlz4 session files, in order of preference
const DEJSONLZ4: [&str; 2] = ["dejsonlz4", "dejsonlz4.com"];

/// Obtain the session cookie according to the configured auth method
pub fn session_cookie(config: &Config) -> Result<String> {
    match config.auth_method {
        AuthMethod::Manual => config
            .session_cookie
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "auth_method = \"manual\" requires session_cookie in the config file \
                     or STUDIP_SYNC_SESSION_COOKIE"
                        .to_string(),
                )
            }),
        AuthMethod::Cookie => match config.browser.as_str() {
            "firefox" => firefox_cookie(&config.host),
            other => Err(Error::Config(format!("Browser \"{}\" not supported", other))),
        },
    }
}

fn firefox_cookie(host: &str) -> Result<String> {
    let root = firefox_dir()?;
    let ini_path = root.join("profiles.ini");
    let ini = std::fs::read_to_string(&ini_path).map_err(|e| Error::io(e, &ini_path))?;
    let profile = profile_dir(&root, &ini)?;
    debug!("Using Firefox profile {:?}", profile);

    let store = profile.join("sessionstore-backups").join("recovery.jsonlz4");
    let session = decompress(&store)?;
    find_cookie(&session, host)
}

/// Directory containing Firefox's `profiles.ini`
fn firefox_dir() -> Result<PathBuf> {
    let missing = || LookupError::BrowserProfile("cannot determine home directory".into());

    let dir = if cfg!(target_os = "windows") {
        dirs::data_dir().ok_or_else(missing)?.join("Mozilla").join("Firefox")
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().ok_or_else(missing)?.join("Firefox")
    } else {
        dirs::home_dir().ok_or_else(missing)?.join(".mozilla").join("firefox")
    };
    Ok(dir)
}

/// Pick the profile directory from the contents of `profiles.ini`
///
/// Prefers the profile marked `Default=1`, then `[Profile0]`.
fn profile_dir(root: &Path, ini: &str) -> Result<PathBuf> {
    let mut profiles: Vec<(String, Vec<(String, String)>)> = Vec::new();
    for line in ini.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            profiles.push((section.to_string(), Vec::new()));
        } else if let (Some((key, value)), Some((_, entries))) =
            (line.split_once('='), profiles.last_mut())
        {
            entries.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let profile = profiles
        .iter()
        .filter(|(name, _)| name.starts_with("Profile"))
        .find(|(_, entries)| entry(entries, "Default").as_deref() == Some("1"))
        .or_else(|| profiles.iter().find(|(name, _)| name == "Profile0"))
        .ok_or_else(|| LookupError::BrowserProfile("no profile in profiles.ini".into()))?;

    let path = entry(&profile.1, "Path")
        .ok_or_else(|| LookupError::BrowserProfile(format!("[{}] has no Path", profile.0)))?;
    let relative = entry(&profile.1, "IsRelative").as_deref() != Some("0");

    Ok(if relative {
        root.join(path)
    } else {
        PathBuf::from(path)
    })
}

fn entry(entries: &[(String, String)], key: &str) -> Option<String> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Decompress a mozlz4 file with the external `dejsonlz4` tool
fn decompress(path: &Path) -> Result<serde_json::Value> {
    let tool = DEJSONLZ4
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| Error::Capability {
            tool: DEJSONLZ4[0].to_string(),
        })?;

    let output = Command::new(&tool)
        .arg(path)
        .output()
        .map_err(|e| Error::io(e, &tool))?;
    if !output.status.success() {
        return Err(Error::Command {
            command: format!("{} {}", tool.display(), path.display()),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    serde_json::from_slice(&output.stdout).map_err(|source| Error::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Find the session cookie for `host` in a decoded Firefox session
fn find_cookie(session: &serde_json::Value, host: &str) -> Result<String> {
    session
        .get("cookies")
        .and_then(|c| c.as_array())
        .into_iter()
        .flatten()
        .find(|cookie| {
            let cookie_host = cookie.get("host").and_then(|h| h.as_str()).unwrap_or("");
            cookie_host.trim_start_matches('.') == host
                && cookie.get("name").and_then(|n| n.as_str()) == Some(COOKIE_NAME)
        })
        .and_then(|cookie| cookie.get("value").and_then(|v| v.as_str()))
        .map(str::to_string)
        .ok_or_else(|| {
            LookupError::Cookie {
                host: host.to_string(),
            }
            .into()
        })
}
