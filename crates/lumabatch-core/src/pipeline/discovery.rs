//! Finding eligible image files in an input directory.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Png,
    Tiff,
    Tga,
    Jpeg,
    Bmp,
}

impl InputFormat {
    /// Match a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "tga" => Some(Self::Tga),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Format implied by a path's extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A file selected for processing.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
}

impl DiscoveredFile {
    /// File name without directories, as reported in progress and outcomes.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// List regular files directly inside `dir` with a supported extension.
///
/// Subdirectories are not descended into. Unknown extensions and unreadable
/// entries are skipped. Results are sorted by path.
pub fn discover(dir: &Path) -> Vec<DiscoveredFile> {
    let mut files: Vec<DiscoveredFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_eligible(entry.path()))
        .map(|entry| DiscoveredFile {
            path: entry.into_path(),
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!("Discovered {} eligible file(s) in {:?}", files.len(), dir);

    for names in shared_stems(&files) {
        tracing::warn!(
            "Files {} share a stem and will overwrite the same output",
            names.join(", ")
        );
    }
    files
}

/// Groups of file names whose stems collide, in path order.
///
/// Every file produces `<stem>.png`, so each group races for one output file.
pub fn shared_stems(files: &[DiscoveredFile]) -> Vec<Vec<String>> {
    let mut by_stem: BTreeMap<OsString, Vec<String>> = BTreeMap::new();
    for file in files {
        let stem = file.path.file_stem().unwrap_or_default().to_os_string();
        by_stem.entry(stem).or_default().push(file.file_name());
    }
    by_stem
        .into_values()
        .filter(|names| names.len() > 1)
        .collect()
}

/// Check whether a path has a supported image extension.
pub fn is_eligible(path: &Path) -> bool {
    InputFormat::from_path(path).is_some()
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_eligible() {
        assert!(is_eligible(Path::new("test.png")));
        assert!(is_eligible(Path::new("test.JPG")));
        assert!(is_eligible(Path::new("test.jpeg")));
        assert!(is_eligible(Path::new("test.tif")));
        assert!(is_eligible(Path::new("test.TIFF")));
        assert!(is_eligible(Path::new("test.tga")));
        assert!(is_eligible(Path::new("test.bmp")));
        assert!(!is_eligible(Path::new("test.txt")));
        assert!(!is_eligible(Path::new("test.webp")));
        assert!(!is_eligible(Path::new("png")));
    }

    #[test]
    fn test_discover_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("c.JPG"), b"x").unwrap();

        let names: Vec<String> = discover(dir.path())
            .iter()
            .map(DiscoveredFile::file_name)
            .collect();
        assert_eq!(names, vec!["a.png", "c.JPG"]);
    }

    #[test]
    fn test_discover_skips_directories_and_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("folder.png");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("inner.png"), b"x").unwrap();
        std::fs::write(dir.path().join("top.bmp"), b"xy").unwrap();

        let files = discover(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "top.bmp");
    }

    #[test]
    fn test_shared_stems_groups_colliding_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "a.jpg", "b.tif", "scan.v2.tga", "scan.v2.bmp", "c.bmp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = discover(dir.path());
        assert_eq!(files.len(), 6);
        assert_eq!(
            shared_stems(&files),
            vec![
                vec!["a.jpg".to_string(), "a.png".to_string()],
                vec!["scan.v2.bmp".to_string(), "scan.v2.tga".to_string()],
            ]
        );
    }

    #[test]
    fn test_shared_stems_empty_when_unique() {
        let files: Vec<DiscoveredFile> = ["x.png", "y.png", "x.png.bmp"]
            .iter()
            .map(|name| DiscoveredFile {
                path: PathBuf::from(name),
            })
            .collect();
        assert!(shared_stems(&files).is_empty());
    }
}
