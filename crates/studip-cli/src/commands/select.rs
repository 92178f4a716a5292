//! Select-semester command handler

use anyhow::{Context, Result};

use studip_core::{Config, Mirror, SemesterState};

use crate::chooser::TerminalChooser;
use crate::output::Output;

/// Select the current semester and rebuild the this-semester links
///
/// Without a title the user picks one interactively.
pub fn select(config: &Config, title: Option<String>, output: &Output) -> Result<()> {
    let mut state = SemesterState::load(config.semester_marker_path())
        .context("Failed to read the current semester")?;
    let mirror = Mirror::open(config).context("Failed to connect to Stud.IP")?;

    let semester = mirror
        .select_semester(&mut state, title.as_deref(), &TerminalChooser)
        .map_err(|e| super::remote_error(e, "Selecting the semester failed"))?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({"id": semester.id, "title": semester.title})
        );
    } else if output.is_quiet() {
        println!("{}", semester.id);
    } else {
        output.success(&format!("Current semester: {}", semester.title));
        output.message(&format!("Courses linked in {}", config.links_dir().display()));
    }

    Ok(())
}
