//! Archive synchronization
//!
//! Brings the local archive up to date with a [`FileMap`]. A path that
//! exists on disk is complete; it is never downloaded, compared or
//! touched again. Everything else is fetched, so re-running after an
//! interrupted sync resumes where it stopped.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::api::models::FileMeta;
use crate::api::{fetch, RemoteApi};
use crate::error::{Error, Result};
use crate::flatten::FileMap;
use crate::sanitize;
use crate::vcs::VersionControl;

/// Content written in place of files the server refuses to hand out
pub const PLACEHOLDER_CONTENT: &str = "studip-sync:non-downloadable-file";

/// Suffix of in-progress downloads
const PARTIAL_SUFFIX: &str = ".part";

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Files downloaded in this run
    pub downloaded: Vec<PathBuf>,
    /// Placeholders written for non-downloadable files
    pub placeholders: Vec<PathBuf>,
    /// Entries already present on disk
    pub skipped: usize,
    /// Logical paths claimed by more than one remote file
    pub collisions: Vec<String>,
}

impl SyncReport {
    /// Whether the archive was modified
    pub fn changed(&self) -> bool {
        !self.downloaded.is_empty() || !self.placeholders.is_empty()
    }
}

enum Fetched {
    Downloaded(u64),
    Placeholder,
}

/// Downloads missing archive entries
pub struct ArchiveSync<'a> {
    api: &'a dyn RemoteApi,
    vcs: &'a dyn VersionControl,
    commit_message: String,
}

impl<'a> ArchiveSync<'a> {
    pub fn new(api: &'a dyn RemoteApi, vcs: &'a dyn VersionControl, message_prefix: &str) -> Self {
        Self {
            api,
            vcs,
            commit_message: format!("{}updated archive", message_prefix),
        }
    }

    /// Download every entry of `file_map` missing below `archive_root`,
    /// then commit the archive
    pub fn sync(&self, file_map: &FileMap, archive_root: &Path) -> Result<SyncReport> {
        let mut report = SyncReport {
            collisions: file_map.collisions().to_vec(),
            ..SyncReport::default()
        };
        for path in &report.collisions {
            warn!("Several remote files map to {}; keeping the last one", path);
        }
        fs::create_dir_all(archive_root).map_err(|e| Error::io(e, archive_root))?;

        for (logical_path, file_id) in file_map {
            let target = sanitize::archive_path(archive_root, logical_path);
            if target.exists() {
                report.skipped += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(e, parent))?;
            }

            match self.fetch_entry(file_id, &target)? {
                Fetched::Downloaded(bytes) => {
                    info!("Downloaded {} ({} bytes)", logical_path, bytes);
                    report.downloaded.push(target);
                }
                Fetched::Placeholder => {
                    warn!(
                        "File {} is not downloadable, created placeholder {:?}",
                        logical_path, target
                    );
                    report.placeholders.push(target);
                }
            }
        }

        self.vcs.commit_path(archive_root, &self.commit_message)?;
        Ok(report)
    }

    fn fetch_entry(&self, file_id: &str, target: &Path) -> Result<Fetched> {
        let meta: FileMeta = fetch(self.api, &format!("/file/{}", file_id))?;

        if !meta.is_downloadable {
            fs::write(target, PLACEHOLDER_CONTENT).map_err(|e| Error::io(e, target))?;
            return Ok(Fetched::Placeholder);
        }

        let bytes = self.download(file_id, target)?;
        Ok(Fetched::Downloaded(bytes))
    }

    /// Stream a file into a sibling `.part` file, then move it into place
    ///
    /// `target` only ever appears complete.
    fn download(&self, file_id: &str, target: &Path) -> Result<u64> {
        let partial = partial_path(target);
        let result = self.download_to(file_id, &partial);

        match result {
            Ok(bytes) => {
                fs::rename(&partial, target).map_err(|e| Error::io(e, target))?;
                Ok(bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&partial);
                Err(e)
            }
        }
    }

    fn download_to(&self, file_id: &str, partial: &Path) -> Result<u64> {
        let file = File::create(partial).map_err(|e| Error::io(e, partial))?;
        let mut writer = BufWriter::new(file);

        let bytes = self
            .api
            .download(&format!("/file/{}/download", file_id), &mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| Error::io(e.into_error(), partial))?;
        file.sync_all().map_err(|e| Error::io(e, partial))?;
        Ok(bytes)
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    target.with_file_name(name)
}
