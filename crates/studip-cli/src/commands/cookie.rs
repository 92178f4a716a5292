//! Get-cookie command handler

use anyhow::{Context, Result};

use studip_core::credentials;
use studip_core::Config;

use crate::output::Output;

/// Print the session cookie that would be used for API requests
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let cookie =
        credentials::session_cookie(config).context("Failed to obtain the session cookie")?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({"host": config.host, "cookie": cookie})
        );
    } else {
        println!("{}", cookie);
    }

    Ok(())
}
