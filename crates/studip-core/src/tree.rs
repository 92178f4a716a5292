//! Course document trees
//!
//! Walks the remote folder hierarchy of each course and builds an owned,
//! in-memory tree. Folders own their files and child folders; the server
//! guarantees the hierarchy is acyclic.

use std::cell::OnceCell;

use tracing::debug;

use crate::api::models::{Page, RawCourse, RawFile, RawFolder, Semester, UserInfo};
use crate::api::{fetch, RemoteApi};
use crate::error::Result;

/// A file in a course folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub id: String,
    pub name: String,
    pub is_downloadable: bool,
}

/// A course folder with its complete subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub is_readable: bool,
    pub files: Vec<File>,
    pub subfolders: Vec<Folder>,
}

impl Folder {
    /// Number of files in this folder and all subfolders
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .subfolders
                .iter()
                .map(Folder::file_count)
                .sum::<usize>()
    }
}

/// A course, optionally with its document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub title: String,
    /// Absent when the course has no documents module
    pub top_folder: Option<Folder>,
}

impl From<RawFile> for File {
    fn from(raw: RawFile) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            is_downloadable: raw.is_downloadable.unwrap_or(true),
        }
    }
}

/// Fetches course and folder trees from the remote API
///
/// Requests are issued one at a time, depth-first. Any failing request
/// aborts the whole fetch.
pub struct TreeFetcher<'a> {
    api: &'a dyn RemoteApi,
    user_id: OnceCell<String>,
}

impl<'a> TreeFetcher<'a> {
    pub fn new(api: &'a dyn RemoteApi) -> Self {
        Self {
            api,
            user_id: OnceCell::new(),
        }
    }

    /// Id of the authenticated user, fetched once per fetcher
    pub fn user_id(&self) -> Result<&str> {
        if let Some(id) = self.user_id.get() {
            return Ok(id);
        }
        let user: UserInfo = fetch(self.api, "/user")?;
        Ok(self.user_id.get_or_init(|| user.user_id))
    }

    /// All semesters known to the server
    pub fn fetch_semesters(&self) -> Result<Vec<Semester>> {
        let page: Page<Semester> = fetch(self.api, "/semesters")?;
        Ok(page.collection.into_inner())
    }

    /// Courses of the current user without their document trees
    ///
    /// With `semester_id` set only that semester's courses are listed,
    /// otherwise courses of all semesters.
    pub fn list_courses(&self, semester_id: Option<&str>) -> Result<Vec<RawCourse>> {
        let user_id = self.user_id()?;
        let path = match semester_id {
            Some(id) => format!("/user/{}/courses?semester={}", user_id, id),
            None => format!("/user/{}/courses", user_id),
        };
        let page: Page<RawCourse> = fetch(self.api, &path)?;
        Ok(page.collection.into_inner())
    }

    /// Courses of the current user with their complete document trees
    pub fn fetch_courses(&self, semester_id: Option<&str>) -> Result<Vec<Course>> {
        self.list_courses(semester_id)?
            .into_iter()
            .map(|raw| {
                let top_folder = match raw.documents_path() {
                    Some(path) => {
                        let folder = self.fetch_top_folder(path)?;
                        if let Some(ref folder) = folder {
                            debug!("Course '{}' has {} files", raw.title, folder.file_count());
                        }
                        folder
                    }
                    None => {
                        debug!("Course '{}' has no documents module", raw.title);
                        None
                    }
                };
                Ok(Course {
                    id: raw.course_id,
                    title: raw.title,
                    top_folder,
                })
            })
            .collect()
    }

    /// Fetch the root folder of a course from its documents module link
    ///
    /// The root is always listed; readability only applies below it.
    fn fetch_top_folder(&self, path: &str) -> Result<Option<Folder>> {
        let raw: RawFolder = fetch(self.api, path)?;
        let Some(id) = raw.id.filter(|id| !id.is_empty()) else {
            debug!("Documents module at {} has no root folder", path);
            return Ok(None);
        };

        let mut folder = Folder {
            id,
            name: raw.name,
            is_readable: raw.is_readable.unwrap_or(true),
            ..Folder::default()
        };
        self.fill(&mut folder)?;
        Ok(Some(folder))
    }

    /// Fetch the subtree below a folder stub
    ///
    /// Unreadable folders, and folders whose readability is not reported,
    /// come back empty without any request being made.
    pub fn fetch_subfolders(&self, stub: &RawFolder) -> Result<Folder> {
        let mut folder = Folder {
            id: stub.id.clone().unwrap_or_default(),
            name: stub.name.clone(),
            is_readable: stub.is_readable.unwrap_or(false),
            ..Folder::default()
        };

        if !folder.is_readable || folder.id.is_empty() {
            debug!("Skipping unreadable folder '{}'", folder.name);
            return Ok(folder);
        }

        self.fill(&mut folder)?;
        Ok(folder)
    }

    /// List files and subfolders of `folder` and recurse into the subfolders
    fn fill(&self, folder: &mut Folder) -> Result<()> {
        let subfolders: Page<RawFolder> =
            fetch(self.api, &format!("/folder/{}/subfolders", folder.id))?;
        let files: Page<RawFile> = fetch(self.api, &format!("/folder/{}/files", folder.id))?;

        folder.files = files.collection.into_inner().into_iter().map(File::from).collect();
        folder.subfolders = subfolders
            .collection
            .into_inner()
            .iter()
            .map(|stub| self.fetch_subfolders(stub))
            .collect::<Result<_>>()?;
        Ok(())
    }
}
