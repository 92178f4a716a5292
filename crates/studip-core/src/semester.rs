//! Current semester selection
//!
//! The selected semester id lives in a small marker file in the data
//! directory. It is read once at startup into a [`SemesterState`] and
//! written only when the user selects a semester.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::models::Semester;
use crate::error::{Error, LookupError, Result};

/// Picks one semester title interactively
pub trait SemesterChooser {
    /// Return the chosen title, or `None` if the user chose nothing
    fn choose(&self, titles: &[String]) -> Result<Option<String>>;
}

/// Persisted current-semester marker
#[derive(Debug, Clone)]
pub struct SemesterState {
    path: PathBuf,
    current: Option<String>,
}

impl SemesterState {
    /// Read the marker at `path`; a missing file means nothing is selected
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(content) => Some(content.trim().to_string()).filter(|id| !id.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::io(e, path)),
        };
        Ok(Self { path, current })
    }

    /// Id of the selected semester
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `semester_id` as the current semester
    pub fn save(&mut self, semester_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, parent))?;
        }
        fs::write(&self.path, semester_id).map_err(|e| Error::io(e, &self.path))?;
        self.current = Some(semester_id.to_string());
        Ok(())
    }
}

/// Find the semester to select among `semesters`
///
/// A given title must match exactly. Without a title the chooser is
/// offered every title in server order.
pub fn resolve(
    semesters: &[Semester],
    title: Option<&str>,
    chooser: &dyn SemesterChooser,
) -> Result<Semester> {
    let title = match title {
        Some(title) => title.to_string(),
        None => {
            let titles: Vec<String> = semesters.iter().map(|s| s.title.clone()).collect();
            chooser
                .choose(&titles)?
                .ok_or(LookupError::NoSemesterChosen)?
        }
    };

    semesters
        .iter()
        .find(|s| s.title == title)
        .cloned()
        .ok_or_else(|| LookupError::Semester(title).into())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Chooser returning a fixed answer
    pub(crate) struct FixedChooser(pub Option<&'static str>);

    impl SemesterChooser for FixedChooser {
        fn choose(&self, titles: &[String]) -> Result<Option<String>> {
            Ok(self
                .0
                .filter(|t| titles.iter().any(|title| title.as_str() == *t))
                .map(str::to_string))
        }
    }

    /// Chooser that must not be asked
    pub(crate) struct NeverChooser;

    impl SemesterChooser for NeverChooser {
        fn choose(&self, _titles: &[String]) -> Result<Option<String>> {
            panic!("chooser should not be used when a title is given")
        }
    }

    fn semesters() -> Vec<Semester> {
        vec![
            Semester {
                id: "s1".to_string(),
                title: "WS 2023/24".to_string(),
            },
            Semester {
                id: "s2".to_string(),
                title: "SS 2024".to_string(),
            },
        ]
    }

    #[test]
    fn test_load_missing_marker() {
        let dir = TempDir::new().unwrap();
        let state = SemesterState::load(dir.path().join(".current-semester")).unwrap();
        assert!(state.current().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".current-semester");

        let mut state = SemesterState::load(&path).unwrap();
        state.save("s2").unwrap();
        assert_eq!(state.current(), Some("s2"));

        let reloaded = SemesterState::load(&path).unwrap();
        assert_eq!(reloaded.current(), Some("s2"));
    }

    #[test]
    fn test_load_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".current-semester");
        fs::write(&path, "s1\n").unwrap();

        let state = SemesterState::load(&path).unwrap();
        assert_eq!(state.current(), Some("s1"));
    }

    #[test]
    fn test_resolve_by_title() {
        let semester = resolve(&semesters(), Some("SS 2024"), &NeverChooser).unwrap();
        assert_eq!(semester.id, "s2");
    }

    #[test]
    fn test_resolve_unknown_title() {
        let err = resolve(&semesters(), Some("WS 2030/31"), &NeverChooser).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::Semester(ref t)) if t == "WS 2030/31"));
    }

    #[test]
    fn test_resolve_interactive() {
        let semester = resolve(&semesters(), None, &FixedChooser(Some("WS 2023/24"))).unwrap();
        assert_eq!(semester.id, "s1");
    }

    #[test]
    fn test_resolve_nothing_chosen() {
        let err = resolve(&semesters(), None, &FixedChooser(None)).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::NoSemesterChosen)));
    }
}
