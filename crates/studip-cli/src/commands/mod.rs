//! Command handlers

pub mod config;
pub mod cookie;
pub mod select;
pub mod status;
pub mod sync;

/// Wrap a core error, hinting at an expired session when the server refused
fn remote_error(err: studip_core::Error, action: &str) -> anyhow::Error {
    if err.is_transport() {
        anyhow::Error::new(err).context(format!(
            "{} (if this keeps happening, log in to Stud.IP in the browser again)",
            action
        ))
    } else {
        anyhow::Error::new(err).context(action.to_string())
    }
}
