//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::path::Path;

use studip_core::SyncReport;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print the outcome of a sync run
    pub fn print_report(&self, report: &SyncReport, archive_root: &Path) {
        match self.format {
            OutputFormat::Human => {
                for path in &report.downloaded {
                    println!("+ {}", relative_to(path, archive_root));
                }
                for path in &report.placeholders {
                    println!("? {} (not downloadable)", relative_to(path, archive_root));
                }
                for path in &report.collisions {
                    println!("! {} (several remote files, kept the last)", path);
                }
                if report.changed() {
                    println!();
                }
                println!("{}", summary(report));
            }
            OutputFormat::Json => match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize report: {}", e),
            },
            OutputFormat::Quiet => {
                for path in report.downloaded.iter().chain(&report.placeholders) {
                    println!("{}", path.display());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line summary of a sync run
fn summary(report: &SyncReport) -> String {
    if !report.changed() {
        return format!("Archive up to date ({} files)", report.skipped);
    }
    format!(
        "{} downloaded, {} placeholder(s), {} already present",
        report.downloaded.len(),
        report.placeholders.len(),
        report.skipped
    )
}

fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
