//! Status command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use studip_core::{Config, SemesterState};

use crate::output::{Output, OutputFormat};

/// Show the local mirror state without contacting the server
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let state = SemesterState::load(config.semester_marker_path())
        .context("Failed to read the current semester")?;
    let archive = config.archive_dir();
    let links = config.links_dir();
    let courses = count_entries(&archive);
    let linked = count_entries(&links);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "current_semester": state.current(),
                    "archive": {
                        "path": archive,
                        "courses": courses
                    },
                    "this_semester": {
                        "path": links,
                        "courses": linked
                    },
                    "use_git": config.use_git
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", state.current().unwrap_or(""));
        }
        OutputFormat::Human => {
            println!("studip-sync Status");
            println!("==================");
            println!();
            println!("Data directory: {}", config.data_dir.display());
            println!(
                "Semester:       {}",
                state.current().unwrap_or("(not selected)")
            );
            println!();
            println!("Archive:");
            println!("  Location: {}", archive.display());
            println!("  Courses:  {}", courses);
            println!();
            println!("This semester:");
            println!("  Location: {}", links.display());
            println!("  Courses:  {}", linked);
            println!();
            println!(
                "Git: {}",
                if config.use_git { "enabled" } else { "disabled" }
            );
        }
    }

    Ok(())
}

/// Number of entries directly below `dir`, zero if it does not exist
fn count_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
