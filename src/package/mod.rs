//! Bundle packaging
//!
//! A passing bundle (or a failing one under `--force`) is written as a
//! deterministic tar.gz next to nothing else: the archive is built in a
//! temporary file inside the output directory and renamed into place only
//! once it is complete and hashed.

mod archive;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::bundle::Bundle;
use crate::error::{self, Result};
use crate::frontmatter::FrontmatterRecord;
use crate::hash;
use crate::path_utils;
use crate::report::{ValidationReport, Verdict};
use crate::schema;

/// File name suffix of produced artifacts
pub const ARCHIVE_SUFFIX: &str = ".skill.tar.gz";

/// Gzip header comment marking an artifact built despite a failing report
pub const OVERRIDE_COMMENT: &str = "skillpack:override";

/// A written archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    pub path: PathBuf,
    /// Sorted bundle-relative member paths
    pub members: Vec<String>,
    /// `blake3:<hex>` of the archive bytes
    pub hash: String,
    /// Built under `--force` from a failing report
    pub overridden: bool,
}

/// Artifact base name: the declared name when valid, else the directory name
pub fn artifact_name(bundle: &Bundle, record: Option<&FrontmatterRecord>) -> String {
    record
        .and_then(|r| r.name.as_deref())
        .map(str::trim)
        .filter(|name| schema::is_valid_name(name))
        .map(str::to_string)
        .unwrap_or_else(|| path_utils::make_path_safe(&bundle.dir_name()))
}

/// Package `bundle` into `output_dir`
///
/// Refuses without touching the filesystem when the report fails and
/// `force` is not set.
pub fn package(
    bundle: &Bundle,
    report: &ValidationReport,
    name: &str,
    output_dir: &Path,
    force: bool,
) -> Result<PackageArtifact> {
    let failed = report.verdict() == Verdict::Fail;
    if failed && !force {
        return Err(error::package::refused(report.error_count()));
    }
    let overridden = failed && force;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        error::fs::write_failed(output_dir.display().to_string(), e.to_string())
    })?;
    let destination = output_dir.join(format!("{name}{ARCHIVE_SUFFIX}"));

    let mut temp = NamedTempFile::new_in(output_dir).map_err(|e| {
        error::package::failed(format!(
            "cannot create temporary file in {}: {e}",
            output_dir.display()
        ))
    })?;

    {
        let comment = overridden.then_some(OVERRIDE_COMMENT);
        let mut tar = archive::create_deterministic_tar(temp.as_file_mut(), comment);
        for entry in &bundle.files {
            let data = std::fs::read(bundle.absolute(&entry.path)).map_err(|e| {
                error::fs::read_failed(entry.path.clone(), e.to_string())
            })?;
            archive::write_entry(&mut tar, &entry.path, &data, entry.executable)?;
        }
        let file = archive::finish(tar)?;
        file.flush()
            .and_then(|()| file.sync_all())
            .map_err(|e| error::package::failed(format!("cannot sync archive: {e}")))?;
    }

    let hash = hash::hash_file(temp.path())?;
    temp.persist(&destination)?;

    let members = bundle.member_paths();
    tracing::info!(
        members = members.len(),
        overridden,
        "wrote {} ({})",
        destination.display(),
        hash
    );

    Ok(PackageArtifact {
        path: destination,
        members,
        hash,
        overridden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::report::{Diagnostic, DiagnosticCode};
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    const SKILL: &str = "---\nname: demo\ndescription: A demo\ntype: tool\n---\nRun `scripts/run.sh`.\n";

    fn make_bundle(dir: &Path) -> Bundle {
        fs::create_dir_all(dir.join("scripts")).unwrap();
        fs::create_dir_all(dir.join("references")).unwrap();
        fs::write(dir.join("SKILL.md"), SKILL).unwrap();
        fs::write(dir.join("scripts/run.sh"), "#!/bin/sh\necho hi\n").unwrap();
        fs::write(dir.join("references/guide.md"), "# Guide\n").unwrap();
        fs::write(dir.join(".hidden"), "secret").unwrap();
        Bundle::open(dir, &ValidatorConfig::default(), None).unwrap()
    }

    fn failing_report() -> ValidationReport {
        ValidationReport::new(vec![Diagnostic::new(DiagnosticCode::MissingName, "missing")])
    }

    fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
        let file = fs::File::open(path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let mut e = e.unwrap();
                let path = e.path().unwrap().to_string_lossy().into_owned();
                let mut data = Vec::new();
                e.read_to_end(&mut data).unwrap();
                (path, data)
            })
            .collect()
    }

    #[test]
    fn test_round_trip_matches_inventory() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("demo"));
        let out = temp.path().join("out");

        let artifact = package(&bundle, &ValidationReport::default(), "demo", &out, false).unwrap();
        assert_eq!(artifact.path, out.join("demo.skill.tar.gz"));
        assert!(!artifact.overridden);
        assert!(artifact.hash.starts_with(hash::HASH_PREFIX));

        let entries = read_archive(&artifact.path);
        let names: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["SKILL.md", "references/guide.md", "scripts/run.sh"]);
        assert_eq!(artifact.members, names);
        for (path, data) in &entries {
            assert_eq!(data, &fs::read(bundle.absolute(path)).unwrap());
        }
    }

    #[test]
    fn test_archives_are_byte_identical() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("demo"));
        let report = ValidationReport::default();

        let first = package(&bundle, &report, "demo", &temp.path().join("a"), false).unwrap();
        let second = package(&bundle, &report, "demo", &temp.path().join("b"), false).unwrap();
        assert_eq!(first.hash, second.hash);
        assert_eq!(fs::read(&first.path).unwrap(), fs::read(&second.path).unwrap());
    }

    #[test]
    fn test_refusal_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("demo"));
        let out = temp.path().join("out");

        let err = package(&bundle, &failing_report(), "demo", &out, false).unwrap_err();
        assert!(err.to_string().contains("Refusing to package"));
        assert!(!out.exists());
    }

    #[test]
    fn test_force_records_override() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("demo"));
        let out = temp.path().join("out");

        let artifact = package(&bundle, &failing_report(), "demo", &out, true).unwrap();
        assert!(artifact.overridden);

        let mut decoder = GzDecoder::new(fs::File::open(&artifact.path).unwrap());
        let mut sink = Vec::new();
        decoder.read_to_end(&mut sink).unwrap();
        let comment = decoder.header().and_then(|h| h.comment()).map(<[u8]>::to_vec);
        assert_eq!(comment, Some(OVERRIDE_COMMENT.as_bytes().to_vec()));
        assert_eq!(read_archive(&artifact.path).len(), 3);
    }

    #[test]
    fn test_only_artifact_left_in_output_dir() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("demo"));
        let out = temp.path().join("out");

        package(&bundle, &ValidationReport::default(), "demo", &out, false).unwrap();
        let names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["demo.skill.tar.gz"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_mode_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("demo");
        make_bundle(&dir);
        fs::set_permissions(dir.join("scripts/run.sh"), fs::Permissions::from_mode(0o775)).unwrap();
        let bundle = Bundle::open(&dir, &ValidatorConfig::default(), None).unwrap();

        let artifact =
            package(&bundle, &ValidationReport::default(), "demo", &temp.path().join("out"), false)
                .unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(&artifact.path).unwrap()));
        let modes: Vec<(String, u32)> = archive
            .entries()
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                (
                    e.path().unwrap().to_string_lossy().into_owned(),
                    e.header().mode().unwrap(),
                )
            })
            .collect();
        assert!(modes.contains(&("scripts/run.sh".to_string(), 0o755)));
        assert!(modes.contains(&("SKILL.md".to_string(), 0o644)));
    }

    #[test]
    fn test_artifact_name_fallback() {
        let temp = TempDir::new().unwrap();
        let bundle = make_bundle(&temp.path().join("My Bundle"));
        let record = FrontmatterRecord {
            name: Some("Not Valid!".to_string()),
            ..Default::default()
        };
        assert_eq!(artifact_name(&bundle, Some(&record)), "My-Bundle");

        let record = FrontmatterRecord {
            name: Some("pdf-tools".to_string()),
            ..Default::default()
        };
        assert_eq!(artifact_name(&bundle, Some(&record)), "pdf-tools");
        assert_eq!(artifact_name(&bundle, None), "My-Bundle");
    }
}
