//! studip-sync Core Library
//!
//! This crate mirrors the course documents of a Stud.IP account into a
//! local directory. Files are downloaded once and never refreshed; a
//! second directory of symlinks shows only the courses of the selected
//! semester. Both directories can optionally be committed to git.
//!
//! # Layout on disk
//!
//! ```text
//! <data_dir>/
//!   archive/<course>/<folder>/.../<file>   downloaded documents
//!   this-semester/<course> -> ../archive/<course>
//!   .current-semester                      selected semester id
//! ```
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mirror = Mirror::open(&config)?;
//! let state = SemesterState::load(config.semester_marker_path())?;
//!
//! let report = mirror.sync(&state)?;
//! ```
//!
//! # Modules
//!
//! - `mirror`: Unified entry point (main entry point)
//! - `api`: Stud.IP REST client and wire models
//! - `tree`: Course and folder tree fetching
//! - `flatten`: Folder trees to flat path maps
//! - `archive`: Download-if-absent archive synchronization
//! - `links`: The this-semester symlink view
//! - `semester`: Current semester selection
//! - `credentials`: Session cookie lookup
//! - `vcs`: Optional git commits
//! - `config`: Application configuration

pub mod api;
pub mod archive;
pub mod config;
pub mod credentials;
pub mod error;
pub mod flatten;
pub mod links;
pub mod mirror;
pub mod sanitize;
pub mod semester;
pub mod tree;
pub mod vcs;

#[cfg(test)]
mod testing;

pub use api::models::Semester;
pub use api::{RemoteApi, StudipClient};
pub use archive::SyncReport;
pub use config::{AuthMethod, Config, ConfigOverrides};
pub use error::{Error, LookupError, Result};
pub use flatten::FileMap;
pub use mirror::Mirror;
pub use semester::{SemesterChooser, SemesterState};
