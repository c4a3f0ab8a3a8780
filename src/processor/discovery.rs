//! Export file discovery.
//!
//! Lists candidate files in a folder by extension, optionally descending
//! into sub-folders. Results are sorted so repeated runs append rows in the
//! same order.

use crate::error::{ParseError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Finds export files under one folder
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    root: PathBuf,
    extension: String,
    recursive: bool,
}

impl FileDiscovery {
    /// `extension` is matched case-sensitively and given without the dot
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            recursive: false,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sorted paths of all matching files
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ParseError::io(
                &self.root,
                io::Error::new(io::ErrorKind::NotFound, "input folder not found"),
            ));
        }

        let mut files = if self.recursive {
            self.walk()?
        } else {
            self.list()?
        };
        files.sort();

        debug!(
            "Found {} .{} files in {}",
            files.len(),
            self.extension,
            self.root.display()
        );
        Ok(files)
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| ParseError::io(&self.root, e))? {
            let path = entry.map_err(|e| ParseError::io(&self.root, e))?.path();
            if path.is_file() && has_extension(&path, &self.extension) {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                ParseError::io(path, io::Error::from(e))
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), &self.extension) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Check if a path ends in `.{extension}`
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_export_folder(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("exports");
        let nested = root.join("batch-2");
        fs::create_dir_all(&nested).unwrap();

        fs::write(root.join("Run2_B_val.csv"), "x").unwrap();
        fs::write(root.join("Run1_A_val.csv"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join("Run3_C_val.CSV"), "x").unwrap();
        fs::write(nested.join("Run4_D_val.csv"), "x").unwrap();
        root
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_discover_filters_extension_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_export_folder(&temp_dir);

        let files = FileDiscovery::new(&root, "csv").discover().unwrap();
        assert_eq!(names(&files), vec!["Run1_A_val.csv", "Run2_B_val.csv"]);
    }

    #[test]
    fn test_discover_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_export_folder(&temp_dir);

        let files = FileDiscovery::new(&root, "csv")
            .with_recursive(true)
            .discover()
            .unwrap();
        assert_eq!(
            names(&files),
            vec!["Run1_A_val.csv", "Run2_B_val.csv", "Run4_D_val.csv"]
        );
    }

    #[test]
    fn test_discover_other_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_export_folder(&temp_dir);

        let files = FileDiscovery::new(&root, "txt").discover().unwrap();
        assert_eq!(names(&files), vec!["notes.txt"]);
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileDiscovery::new(temp_dir.path().join("absent"), "csv").discover();

        match result.unwrap_err() {
            ParseError::Io { path, .. } => assert!(path.ends_with("absent")),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_has_extension_is_case_sensitive() {
        assert!(has_extension(Path::new("a.csv"), "csv"));
        assert!(!has_extension(Path::new("a.CSV"), "csv"));
        assert!(!has_extension(Path::new("csv"), "csv"));
    }
}
