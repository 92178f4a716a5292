//! Sync command handler

use anyhow::{Context, Result};

use studip_core::{Config, Mirror, SemesterState};

use crate::output::Output;

/// Download new documents of the selected semester into the archive
pub fn sync(config: &Config, output: &Output) -> Result<()> {
    let state = SemesterState::load(config.semester_marker_path())
        .context("Failed to read the current semester")?;
    if state.current().is_none() {
        output.message("No semester selected, syncing all semesters. Select one with:");
        output.message("  studip-sync select-semester");
    }

    let mirror = Mirror::open(config).context("Failed to connect to Stud.IP")?;

    output.message(&format!("Syncing into {}...", config.archive_dir().display()));
    let report = mirror
        .sync(&state)
        .map_err(|e| super::remote_error(e, "Sync failed"))?;
    output.print_report(&report, &config.archive_dir());

    Ok(())
}
