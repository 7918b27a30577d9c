//! Most-recently-opened documents.
//!
//! Backs the "Open Recent" submenu. Persistence lives in the storage crate;
//! this type only owns the ordering rules.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of recent files to track
pub const MAX_RECENT_FILES: usize = 10;

/// Recent file paths, most recent first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PathBuf>", into = "Vec<PathBuf>")]
pub struct RecentFiles {
    files: Vec<PathBuf>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the recent files list
    ///
    /// If the file already exists in the list, it is moved to the front.
    /// The list is capped at MAX_RECENT_FILES entries.
    pub fn add<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();

        self.files.retain(|p| p != &path);
        self.files.insert(0, path);
        self.files.truncate(MAX_RECENT_FILES);
    }

    /// Returns the list of recent files (most recent first)
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.files.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

// Normalizes whatever was on disk: first occurrence wins, capped.
impl From<Vec<PathBuf>> for RecentFiles {
    fn from(paths: Vec<PathBuf>) -> Self {
        let mut files: Vec<PathBuf> = Vec::with_capacity(paths.len().min(MAX_RECENT_FILES));
        for path in paths {
            if files.len() == MAX_RECENT_FILES {
                break;
            }
            if !files.contains(&path) {
                files.push(path);
            }
        }

        Self { files }
    }
}

impl From<RecentFiles> for Vec<PathBuf> {
    fn from(recent: RecentFiles) -> Self {
        recent.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let mut recent = RecentFiles::new();
        recent.add("/path/to/file1.pdf");
        recent.add("/path/to/file2.pdf");

        assert_eq!(recent.len(), 2);
        assert_eq!(recent.files()[0], PathBuf::from("/path/to/file2.pdf"));
        assert_eq!(recent.files()[1], PathBuf::from("/path/to/file1.pdf"));
    }

    #[test]
    fn test_add_duplicate_moves_to_front() {
        let mut recent = RecentFiles::new();
        recent.add("/path/to/file1.pdf");
        recent.add("/path/to/file2.pdf");
        recent.add("/path/to/file1.pdf");

        assert_eq!(recent.len(), 2);
        assert_eq!(recent.get(0), Some(Path::new("/path/to/file1.pdf")));
        assert_eq!(recent.get(1), Some(Path::new("/path/to/file2.pdf")));
    }

    #[test]
    fn test_max_files_limit() {
        let mut recent = RecentFiles::new();

        for i in 0..15 {
            recent.add(format!("/path/to/file{}.pdf", i));
        }

        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(recent.files()[0], PathBuf::from("/path/to/file14.pdf"));
        assert_eq!(recent.files()[9], PathBuf::from("/path/to/file5.pdf"));
    }

    #[test]
    fn test_clear() {
        let mut recent = RecentFiles::new();
        recent.add("/path/to/file1.pdf");

        recent.clear();

        assert!(recent.is_empty());
    }

    #[test]
    fn test_json_is_plain_array() {
        let mut recent = RecentFiles::new();
        recent.add("/a.pdf");
        recent.add("/with \"quotes\"/b.pdf");

        let json = serde_json::to_string(&recent).expect("recent list should serialize");
        assert_eq!(json, r#"["/with \"quotes\"/b.pdf","/a.pdf"]"#);

        let parsed: RecentFiles = serde_json::from_str(&json).expect("recent list should parse");
        assert_eq!(parsed, recent);
    }

    #[test]
    fn test_loading_normalizes_duplicates_and_length() {
        let mut paths: Vec<PathBuf> =
            (0..12).map(|i| PathBuf::from(format!("/docs/{i}.pdf"))).collect();
        paths.insert(1, PathBuf::from("/docs/0.pdf"));

        let recent = RecentFiles::from(paths);

        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(recent.get(0), Some(Path::new("/docs/0.pdf")));
        assert_eq!(recent.get(1), Some(Path::new("/docs/1.pdf")));
        assert_eq!(recent.get(9), Some(Path::new("/docs/9.pdf")));
    }
}
