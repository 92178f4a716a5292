//! Mirror of a Stud.IP account (main entry point)
//!
//! Ties the remote API, the tree fetcher, the archive and the semester
//! view together. One `Mirror` serves one command invocation.

use tracing::{info, warn};

use crate::api::models::Semester;
use crate::api::{RemoteApi, StudipClient};
use crate::archive::{ArchiveSync, SyncReport};
use crate::config::Config;
use crate::credentials;
use crate::error::Result;
use crate::flatten::flatten_courses;
use crate::links::SemesterLinker;
use crate::semester::{self, SemesterChooser, SemesterState};
use crate::tree::TreeFetcher;
use crate::vcs::{self, VersionControl};

pub struct Mirror {
    config: Config,
    api: Box<dyn RemoteApi>,
    vcs: Box<dyn VersionControl>,
}

impl Mirror {
    /// Connect using the configured credentials and version control
    pub fn open(config: &Config) -> Result<Self> {
        let vcs = vcs::from_config(config)?;
        let cookie = credentials::session_cookie(config)?;
        let api = StudipClient::new(config, &cookie)?;
        Ok(Self::with_parts(config.clone(), Box::new(api), vcs))
    }

    /// Build a mirror from explicit collaborators
    pub fn with_parts(
        config: Config,
        api: Box<dyn RemoteApi>,
        vcs: Box<dyn VersionControl>,
    ) -> Self {
        Self { config, api, vcs }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download everything new in the selected semester's courses
    ///
    /// Without a selected semester, courses of all semesters are mirrored.
    pub fn sync(&self, state: &SemesterState) -> Result<SyncReport> {
        let semester_id = state.current();
        if semester_id.is_none() {
            warn!("No semester selected, syncing courses of all semesters");
        }

        let fetcher = TreeFetcher::new(self.api.as_ref());
        let courses = fetcher.fetch_courses(semester_id)?;
        let file_map = flatten_courses(&courses);
        info!(
            "Found {} files in {} courses",
            file_map.len(),
            courses.len()
        );

        ArchiveSync::new(
            self.api.as_ref(),
            self.vcs.as_ref(),
            &self.config.git_commit_message_prefix,
        )
        .sync(&file_map, &self.config.archive_dir())
    }

    /// Select the current semester and rebuild the semester view
    ///
    /// `title` must match a remote semester exactly; without it `chooser`
    /// is asked. The persisted state changes only if the title resolves.
    pub fn select_semester(
        &self,
        state: &mut SemesterState,
        title: Option<&str>,
        chooser: &dyn SemesterChooser,
    ) -> Result<Semester> {
        let fetcher = TreeFetcher::new(self.api.as_ref());
        let semesters = fetcher.fetch_semesters()?;
        let semester = semester::resolve(&semesters, title, chooser)?;
        info!("Selected semester {} ({})", semester.title, semester.id);

        state.save(&semester.id)?;
        self.vcs.commit_path(
            state.path(),
            &format!(
                "{}updated current semester",
                self.config.git_commit_message_prefix
            ),
        )?;

        self.relink_with(&fetcher, Some(&semester.id))?;
        Ok(semester)
    }

    fn relink_with(&self, fetcher: &TreeFetcher<'_>, semester_id: Option<&str>) -> Result<usize> {
        SemesterLinker::new(
            fetcher,
            self.vcs.as_ref(),
            &self.config.git_commit_message_prefix,
        )
        .relink(
            semester_id,
            &self.config.archive_dir(),
            &self.config.links_dir(),
        )
    }
}
