//! Flattening of document trees into logical paths
//!
//! A logical path is `<course-title>/<folder>/.../<file-name>` where every
//! segment has gone through [`sanitize::segment`]. The root folder of a
//! course is represented by the course title itself.

use std::collections::btree_map::{self, BTreeMap};

use crate::sanitize::{self, SEPARATOR};
use crate::tree::{Course, Folder};

/// Logical path → remote file id
///
/// When two remote files map to the same logical path the later one wins
/// and the path is remembered in [`FileMap::collisions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: BTreeMap<String, String>,
    collisions: Vec<String>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing and recording any earlier one at `path`
    pub fn insert(&mut self, path: String, file_id: String) {
        if self.entries.contains_key(&path) {
            self.collisions.push(path.clone());
        }
        self.entries.insert(path, file_id);
    }

    /// Merge `other` into this map, later entries winning
    pub fn merge(&mut self, other: FileMap) {
        self.collisions.extend(other.collisions);
        for (path, id) in other.entries {
            self.insert(path, id);
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths that were assigned more than once
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a FileMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, String)> for FileMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = FileMap::new();
        for (path, id) in iter {
            map.insert(path, id);
        }
        map
    }
}

/// Flatten the files below `folder` into logical paths under `parent_path`
///
/// Direct files land at `<parent_path>/<file>`, files of a subfolder at
/// `<parent_path>/<subfolder>/<file>`, depth-first in server order.
/// Unreadable subfolders are skipped along with anything below them.
pub fn flatten(folder: &Folder, parent_path: &str) -> FileMap {
    let mut map = FileMap::new();
    collect(folder, parent_path, &mut map);
    map
}

fn collect(folder: &Folder, prefix: &str, map: &mut FileMap) {
    for file in &folder.files {
        map.insert(join(prefix, &file.name), file.id.clone());
    }
    for subfolder in folder.subfolders.iter().filter(|f| f.is_readable) {
        collect(subfolder, &join(prefix, &subfolder.name), map);
    }
}

fn join(prefix: &str, name: &str) -> String {
    format!("{}{}{}", prefix, SEPARATOR, sanitize::segment(name))
}

/// Flatten all courses, each rooted at its title
pub fn flatten_courses(courses: &[Course]) -> FileMap {
    let mut map = FileMap::new();
    for course in courses {
        if let Some(ref top) = course.top_folder {
            map.merge(flatten(top, &sanitize::segment(&course.title)));
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::File;

    fn file(id: &str, name: &str) -> File {
        File {
            id: id.to_string(),
            name: name.to_string(),
            is_downloadable: true,
        }
    }

    fn folder(name: &str, files: Vec<File>, subfolders: Vec<Folder>) -> Folder {
        Folder {
            id: format!("id-{}", name),
            name: name.to_string(),
            is_readable: true,
            files,
            subfolders,
        }
    }

    #[test]
    fn test_flatten_nested() {
        let root = folder(
            "root",
            vec![file("id1", "f1")],
            vec![folder("sub", vec![file("id2", "f2")], vec![])],
        );

        let map = flatten(&root, "Course");
        let expected: FileMap = [
            ("Course/f1".to_string(), "id1".to_string()),
            ("Course/sub/f2".to_string(), "id2".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_flatten_deep_tree() {
        let root = folder(
            "root",
            vec![],
            vec![folder(
                "a",
                vec![file("x", "x.txt")],
                vec![folder("b", vec![], vec![folder("c", vec![file("y", "y.txt")], vec![])])],
            )],
        );

        let map = flatten(&root, "T");
        assert_eq!(map.get("T/a/x.txt"), Some("x"));
        assert_eq!(map.get("T/a/b/c/y.txt"), Some("y"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_flatten_unreadable_contributes_nothing() {
        let mut hidden = folder(
            "hidden",
            vec![file("secret", "exam.pdf")],
            vec![folder("deeper", vec![file("deep", "key.pdf")], vec![])],
        );
        hidden.is_readable = false;
        let root = folder("root", vec![file("id1", "f1")], vec![hidden]);

        let map = flatten(&root, "Course");
        assert_eq!(map.len(), 1);
        assert!(map.iter().all(|(path, _)| !path.contains("hidden")));
    }

    #[test]
    fn test_flatten_escapes_names() {
        let root = folder(
            "root",
            vec![file("id1", "A:B?.pdf")],
            vec![folder("2024/25", vec![file("id2", "notes.txt")], vec![])],
        );

        let map = flatten(&root, "C_D");
        assert_eq!(map.get("C_D/A_B_.pdf"), Some("id1"));
        assert_eq!(map.get("C_D/2024_25/notes.txt"), Some("id2"));
    }

    #[test]
    fn test_collision_last_write_wins() {
        let root = folder(
            "root",
            vec![file("first", "report.pdf"), file("second", "report.pdf")],
            vec![],
        );

        let map = flatten(&root, "Course");
        assert_eq!(map.get("Course/report.pdf"), Some("second"));
        assert_eq!(map.collisions(), &["Course/report.pdf".to_string()]);
    }

    #[test]
    fn test_flatten_courses() {
        let courses = vec![
            Course {
                id: "c1".to_string(),
                title: "C/D".to_string(),
                top_folder: Some(folder("root", vec![file("id1", "A:B?.pdf")], vec![])),
            },
            Course {
                id: "c2".to_string(),
                title: "No Documents".to_string(),
                top_folder: None,
            },
        ];

        let map = flatten_courses(&courses);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("C_D/A_B_.pdf"), Some("id1"));
    }

    #[test]
    fn test_courses_with_same_title_collide() {
        let course = |id: &str, file_id: &str| Course {
            id: id.to_string(),
            title: "Seminar A".to_string(),
            top_folder: Some(folder("root", vec![file(file_id, "intro.pdf")], vec![])),
        };

        let map = flatten_courses(&[course("c1", "old"), course("c2", "new")]);
        assert_eq!(map.get("Seminar A/intro.pdf"), Some("new"));
        assert_eq!(map.collisions().len(), 1);
    }
}
