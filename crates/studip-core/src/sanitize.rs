//! Portable file names
//!
//! Remote names may contain characters that are invalid on some
//! filesystems. The same rules apply on every host so that an archive can
//! move between operating systems.

use std::path::{Path, PathBuf};

/// Characters replaced by `_` in every archive path
pub const FORBIDDEN_CHARS: [char; 8] = ['<', '>', ':', '"', '\\', '|', '?', '*'];

/// Separator of logical paths
pub const SEPARATOR: char = '/';

/// Replace forbidden characters in a logical path with `_`
///
/// Separators are kept, so this can be applied to whole paths.
pub fn sanitize(path: &str) -> String {
    path.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Turn a single remote name into one path segment
///
/// Embedded separators become `_` so a name never spans directories, and
/// names that would address the current or parent directory are escaped.
pub fn segment(name: &str) -> String {
    let escaped = sanitize(&name.replace(SEPARATOR, "_"));
    match escaped.as_str() {
        "" => "_".to_string(),
        "." => "_".to_string(),
        ".." => "__".to_string(),
        _ => escaped,
    }
}

/// Location of a logical path below `root`
pub fn archive_path(root: &Path, logical_path: &str) -> PathBuf {
    sanitize(logical_path)
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_forbidden_char() {
        assert_eq!(sanitize(r#"a<b>c:d"e\f|g?h*i"#), "a_b_c_d_e_f_g_h_i");
        assert_eq!(sanitize("plain/name.pdf"), "plain/name.pdf");
    }

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("C/D"), "C_D");
        assert_eq!(segment(r"C\D"), "C_D");
        assert_eq!(segment("A:B?.pdf"), "A_B_.pdf");
    }

    #[test]
    fn test_segment_special_names() {
        assert_eq!(segment(""), "_");
        assert_eq!(segment("."), "_");
        assert_eq!(segment(".."), "__");
        assert_eq!(segment("..."), "...");
    }

    #[test]
    fn test_archive_path() {
        let root = Path::new("/data/archive");
        assert_eq!(
            archive_path(root, "C_D/A:B?.pdf"),
            PathBuf::from("/data/archive/C_D/A_B_.pdf")
        );
    }

    #[test]
    fn test_archive_path_never_contains_forbidden_chars() {
        let root = Path::new("/data/archive");
        let path = archive_path(root, r#"Course "2024"/Week *1*/notes<v2>|final?.txt"#);
        let relative = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
        assert!(!relative.contains(&FORBIDDEN_CHARS[..]));
        assert_eq!(relative, "Course _2024_/Week _1_/notes_v2__final_.txt");
    }
}
