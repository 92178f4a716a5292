//! Config command handlers

use std::path::Path;

use anyhow::Result;

use studip_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration
///
/// The session cookie itself is never printed.
pub fn show(config: &Config, config_path: &Path, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "host": config.host,
                    "api_prefix": config.api_prefix,
                    "auth_method": config.auth_method.to_string(),
                    "browser": config.browser,
                    "session_cookie_set": config.session_cookie.is_some(),
                    "use_git": config.use_git,
                    "git_push": config.git_push,
                    "git_commit_message_prefix": config.git_commit_message_prefix,
                    "timeout_secs": config.timeout_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:                  {}", config.data_dir.display());
            println!("  host:                      {}", config.host);
            println!("  api_prefix:                {}", config.api_prefix);
            println!("  auth_method:               {}", config.auth_method);
            println!("  browser:                   {}", config.browser);
            println!(
                "  session_cookie:            {}",
                if config.session_cookie.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!("  use_git:                   {}", config.use_git);
            println!("  git_push:                  {}", config.git_push);
            println!(
                "  git_commit_message_prefix: {:?}",
                config.git_commit_message_prefix
            );
            println!("  timeout_secs:              {}", config.timeout_secs);
            println!(
                "  log_file:                  {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", config_path.display());
        }
    }

    Ok(())
}
