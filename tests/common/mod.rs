//! Common test utilities for Skillpack integration tests

use std::io::Read;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Header of a bundle that passes schema checks
pub const VALID_HEADER: &str = "---\nname: pdf-tools\ndescription: Fill and inspect PDF forms\ntype: tool\n---\n";

/// A temporary bundle directory for integration tests
#[allow(dead_code)]
pub struct TestBundle {
    /// Temporary directory holding the bundle and any output directories
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the bundle root
    pub path: PathBuf,
}

impl TestBundle {
    /// Create an empty bundle directory named `pdf-tools`
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("pdf-tools");
        std::fs::create_dir_all(&path).expect("Failed to create bundle directory");
        Self { temp, path }
    }

    /// Create a bundle whose entry document has a valid header and `body`
    #[allow(dead_code)]
    pub fn with_body(body: &str) -> Self {
        let bundle = Self::new();
        bundle.write_skill(VALID_HEADER, body);
        bundle
    }

    /// Write the entry document from a header block and a body
    #[allow(dead_code)]
    pub fn write_skill(&self, header: &str, body: &str) {
        self.write_file("SKILL.md", &format!("{header}{body}"));
    }

    /// Write a file in the bundle
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// A path next to the bundle, outside of it
    #[allow(dead_code)]
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Check if a file exists in the bundle
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// The real skillpack binary with a clean environment
#[allow(deprecated, dead_code)]
pub fn skillpack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("skillpack").expect("skillpack binary is built");
    cmd.env_remove("SKILLPACK_CONFIG")
        .env_remove("SKILLPACK_LOG")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

/// Members of a produced archive with their contents, in archive order
#[allow(dead_code)]
pub fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).expect("Failed to open archive");
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .entries()
        .expect("Failed to read archive entries")
        .map(|entry| {
            let mut entry = entry.expect("Failed to read archive entry");
            let name = entry
                .path()
                .expect("Failed to read member path")
                .to_string_lossy()
                .into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).expect("Failed to read member");
            (name, data)
        })
        .collect()
}

/// The gzip header comment of a produced archive
#[allow(dead_code)]
pub fn archive_comment(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).expect("Failed to open archive");
    let mut decoder = flate2::read::GzDecoder::new(file);
    let mut sink = Vec::new();
    decoder.read_to_end(&mut sink).expect("Failed to decompress archive");
    decoder
        .header()
        .and_then(|h| h.comment())
        .map(|c| String::from_utf8_lossy(c).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_creation() {
        let bundle = TestBundle::new();
        assert!(bundle.path.exists());
        assert!(bundle.path.ends_with("pdf-tools"));
    }

    #[test]
    fn test_bundle_file_operations() {
        let bundle = TestBundle::with_body("Body\n");
        bundle.write_file("scripts/run.sh", "echo hi\n");
        assert!(bundle.file_exists("SKILL.md"));
        assert!(bundle.file_exists("scripts/run.sh"));
    }
}
