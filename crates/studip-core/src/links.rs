//! The this-semester view
//!
//! A directory of symlinks, one per course of the selected semester,
//! pointing into the archive. It is rebuilt from scratch on every
//! selection; anything placed in it by hand is lost.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::sanitize;
use crate::tree::TreeFetcher;
use crate::vcs::VersionControl;

/// Regenerates the symlink farm for a semester
pub struct SemesterLinker<'a> {
    fetcher: &'a TreeFetcher<'a>,
    vcs: &'a dyn VersionControl,
    commit_message: String,
}

impl<'a> SemesterLinker<'a> {
    pub fn new(
        fetcher: &'a TreeFetcher<'a>,
        vcs: &'a dyn VersionControl,
        message_prefix: &str,
    ) -> Self {
        Self {
            fetcher,
            vcs,
            commit_message: format!("{}updated this-semester links", message_prefix),
        }
    }

    /// Replace `links_root` with one link per course title of the semester
    ///
    /// Returns the number of links created. Titles are deduplicated; the
    /// order in which links are created is unspecified.
    pub fn relink(
        &self,
        semester_id: Option<&str>,
        archive_root: &Path,
        links_root: &Path,
    ) -> Result<usize> {
        let titles: HashSet<String> = self
            .fetcher
            .list_courses(semester_id)?
            .iter()
            .map(|course| sanitize::segment(&course.title))
            .collect();

        if links_root.exists() {
            info!("Removing old links directory {:?}", links_root);
            fs::remove_dir_all(links_root).map_err(|e| Error::io(e, links_root))?;
        }
        fs::create_dir_all(links_root).map_err(|e| Error::io(e, links_root))?;

        let target_base = relative_path(links_root, archive_root)?;
        for title in &titles {
            let link = links_root.join(title);
            symlink_dir(&target_base.join(title), &link).map_err(|e| Error::io(e, &link))?;
        }
        info!("Linked {} courses into {:?}", titles.len(), links_root);

        self.vcs.commit_path(links_root, &self.commit_message)?;
        Ok(titles.len())
    }
}

/// Path of `target` relative to the directory `base`
///
/// Both are made absolute first; neither has to exist.
fn relative_path(base: &Path, target: &Path) -> Result<PathBuf> {
    let base = absolute(base)?;
    let target = absolute(target)?;

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }
    Ok(relative)
}

/// Absolute, lexically normalized form of `path`
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(e, path))?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
