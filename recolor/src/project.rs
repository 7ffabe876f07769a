//! Projecting icon resources onto a directory tree and back.
//!
//! A dump strips the leading `resources/icons/` segments from each eligible
//! key and writes the payload under the remaining relative path, escaping
//! left verbatim (`paint%20brush%20tool.png` stays percent-encoded on disk).
//! An import reconstructs the same relative path per key and substitutes the
//! file's bytes when one exists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::bundle::ResourceValue;
use crate::error::Result;
use crate::merge::KeyFilter;
use crate::set::ResourceSet;

/// Relative filesystem path for an icon key: everything after the top two
/// path segments. `None` when nothing remains.
#[must_use]
pub fn projected_path(key: &str) -> Option<PathBuf> {
    let mut segments = key.split('/').skip(2).peekable();
    segments.peek()?;
    Some(segments.collect())
}

/// Result of an icon import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Keys whose payload was replaced from disk.
    pub replaced: Vec<String>,
    /// Total icon-eligible keys examined.
    pub examined: usize,
    /// Files below the input directory that matched no resource key.
    pub strays: Vec<PathBuf>,
}

/// Writes every eligible icon payload below `output_dir`.
///
/// Byte-exact copies; directories are created on demand. Returns the number
/// of files written.
pub fn dump_icons(set: &ResourceSet, output_dir: &Path, filter: &KeyFilter) -> Result<usize> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = 0;

    for (key, value) in set.iter() {
        if !filter.matches(key) {
            continue;
        }
        let Some(bytes) = value.as_bytes() else {
            continue;
        };
        let Some(relative) = projected_path(key) else {
            continue;
        };

        let target = output_dir.join(&relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, bytes)?;
        debug!(key, path = %target.display(), "dumped icon");
        written += 1;
    }

    info!(written, "dumped icon resources");
    Ok(written)
}

/// Builds a new set with eligible payloads replaced from `input_dir`.
///
/// Exactly two outcomes per eligible key: replaced when the projected file
/// exists, kept otherwise. A file that exists but cannot be read is logged
/// and the original payload kept; it never aborts the import.
#[must_use]
pub fn import_icons(
    set: &ResourceSet,
    input_dir: &Path,
    filter: &KeyFilter,
) -> (ResourceSet, ImportReport) {
    let mut out = ResourceSet::new();
    let mut report = ImportReport::default();
    let mut expected: HashSet<PathBuf> = HashSet::new();

    for (key, original) in set.iter() {
        if !filter.matches(key) {
            out.insert(key, original.clone());
            continue;
        }
        report.examined += 1;

        let candidate = projected_path(key).map(|rel| {
            expected.insert(rel.clone());
            input_dir.join(rel)
        });
        let replacement = match candidate {
            Some(path) if path.is_file() => match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    error!(key, path = %path.display(), %err, "failed to read replacement");
                    None
                }
            },
            _ => None,
        };

        match replacement {
            Some(bytes) => {
                debug!(key, "imported replacement payload");
                out.insert(key, ResourceValue::Stream(bytes));
                report.replaced.push(key.to_string());
            }
            None => out.insert(key, original.clone()),
        }
    }

    // Advisory only; a broken walk never fails the import itself.
    match stray_files(input_dir, &expected) {
        Ok(strays) => {
            for stray in &strays {
                warn!(path = %stray.display(), "input file matches no resource key");
            }
            report.strays = strays;
        }
        Err(err) => warn!(%err, "could not scan input directory for stray files"),
    }

    (out, report)
}

/// Files below `input_dir` whose relative path is not in `expected`.
///
/// Typos in replacement file names would otherwise be silently ignored, so
/// the import surfaces them.
fn stray_files(input_dir: &Path, expected: &HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut strays = Vec::new();
    if !input_dir.is_dir() {
        return Ok(strays);
    }
    for entry in WalkDir::new(input_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(input_dir)
            .map_err(|e| crate::error::Error::InvalidPath(e.to_string()))?;
        if !expected.contains(relative) {
            strays.push(entry.path().to_path_buf());
        }
    }
    Ok(strays)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::merge::ICON_FILTER;

    fn icon_set() -> ResourceSet {
        let mut set = ResourceSet::new();
        set.insert(
            "resources/icons/tools/brushtool.imageset/paint%20brush%20tool.png",
            ResourceValue::Stream(vec![1, 2, 3]),
        );
        set.insert(
            "resources/icons/toplevel.png",
            ResourceValue::Stream(vec![4, 5]),
        );
        set.insert(
            "resources/other/readme.txt",
            ResourceValue::String("skip me".into()),
        );
        set
    }

    #[test]
    fn projection_strips_top_two_segments() {
        assert_eq!(
            projected_path("resources/icons/tools/brushtool.imageset/x.png"),
            Some(PathBuf::from("tools/brushtool.imageset/x.png"))
        );
        assert_eq!(
            projected_path("resources/icons/toplevel.png"),
            Some(PathBuf::from("toplevel.png"))
        );
        assert_eq!(projected_path("resources/icons"), None);
    }

    #[test]
    fn dump_writes_eligible_payloads_only() {
        let set = icon_set();
        let dir = tempdir().unwrap();

        let written = dump_icons(&set, dir.path(), &ICON_FILTER).unwrap();

        assert_eq!(written, 2);
        let brush = dir
            .path()
            .join("tools/brushtool.imageset/paint%20brush%20tool.png");
        assert_eq!(std::fs::read(brush).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            std::fs::read(dir.path().join("toplevel.png")).unwrap(),
            vec![4, 5]
        );
        assert!(!dir.path().join("readme.txt").exists());
    }

    #[test]
    fn import_replaces_only_keys_with_files() {
        let set = icon_set();
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tools/brushtool.imageset")).unwrap();
        std::fs::write(
            dir.path()
                .join("tools/brushtool.imageset/paint%20brush%20tool.png"),
            [9, 9, 9],
        )
        .unwrap();

        let (imported, report) = import_icons(&set, dir.path(), &ICON_FILTER);

        assert_eq!(
            imported.get("resources/icons/tools/brushtool.imageset/paint%20brush%20tool.png"),
            Some(&ResourceValue::Stream(vec![9, 9, 9]))
        );
        assert_eq!(
            imported.get("resources/icons/toplevel.png"),
            Some(&ResourceValue::Stream(vec![4, 5]))
        );
        assert_eq!(report.examined, 2);
        assert_eq!(
            report.replaced,
            vec!["resources/icons/tools/brushtool.imageset/paint%20brush%20tool.png".to_string()]
        );
        assert!(report.strays.is_empty());
    }

    #[test]
    fn misnamed_input_files_are_reported_as_strays() {
        let set = icon_set();
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("topIevel.png"), [1]).unwrap();

        let (_, report) = import_icons(&set, dir.path(), &ICON_FILTER);

        assert!(report.replaced.is_empty());
        assert_eq!(report.strays, vec![dir.path().join("topIevel.png")]);
    }

    #[test]
    fn dump_then_import_is_lossless() {
        let set = icon_set();
        let dir = tempdir().unwrap();
        dump_icons(&set, dir.path(), &ICON_FILTER).unwrap();

        let (imported, report) = import_icons(&set, dir.path(), &ICON_FILTER);

        for (key, value) in set.iter() {
            if ICON_FILTER.matches(key) {
                assert_eq!(
                    imported.get(key).and_then(ResourceValue::as_bytes),
                    value.as_bytes(),
                    "payload mismatch for {key}"
                );
            } else {
                assert_eq!(imported.get(key), Some(value));
            }
        }
        assert_eq!(report.replaced.len(), 2);
    }
}
