//! High-level patching workflows over on-disk bundle files.
//!
//! Every mutating workflow is two-phase: the transformation runs fully in
//! memory and yields a [`PendingUpdate`], then [`PendingUpdate::commit`]
//! persists it. The target file is untouched until commit, and the commit
//! itself goes through a sibling temp file so a crash mid-write never leaves
//! a half-written bundle behind.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::bundle::{load_bundle, write_bundle, ResourceValue};
use crate::error::{Error, Result};
use crate::merge::{self, MergeReport, COLORIZE_FILTER, ICON_FILTER};
use crate::project::{self, ImportReport};
use crate::remap::AFFINITY_V3_TO_V2;

/// Bundle holding the application's icon resources.
pub const ICON_BUNDLE_FILE: &str = "Serif.Affinity.g.resources";

/// Previous-version bundle the colorize merge reads icons from.
pub const REFERENCE_BUNDLE_FILE: &str = "Serif.Affinity.v2.g.resources";

/// Bundle holding the splash screen image.
pub const SPLASH_BUNDLE_FILE: &str = "Affinity.g.resources";

/// Key of the splash screen image inside [`SPLASH_BUNDLE_FILE`].
pub const SPLASH_KEY: &str = "resources/images/splash.imageset/studioprosplash.png";

/// A serialized bundle waiting to replace its target file.
#[derive(Debug)]
pub struct PendingUpdate {
    target: PathBuf,
    bytes: Vec<u8>,
}

impl PendingUpdate {
    /// The file the update will replace on commit.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically replaces the target file with the new bundle bytes.
    ///
    /// Writes to a temp file in the target's directory and renames it into
    /// place, so readers see either the old bundle or the new one, never a
    /// partial write.
    pub fn commit(self) -> Result<()> {
        let parent = self
            .target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::InvalidPath(self.target.display().to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        std::io::Write::write_all(&mut tmp, &self.bytes)?;
        tmp.persist(&self.target)?;
        info!(target = %self.target.display(), "committed bundle update");
        Ok(())
    }
}

/// Verifies the current user can create files in `dir`.
///
/// Creates and removes a throwaway file. A permission failure maps to
/// [`Error::AccessDenied`]; any other IO failure passes through.
pub fn check_write_access(dir: &Path) -> Result<()> {
    let probe = dir.join(".recolor-write-probe");
    match std::fs::write(&probe, b"probe") {
        Ok(()) => {
            std::fs::remove_file(&probe)?;
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Error::AccessDenied {
                path: dir.to_path_buf(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Copies `file` into `backup_dir` as `<name>.bak` before mutation.
///
/// Returns the backup's path. Failures are reported as
/// [`Error::BackupFailed`] so callers can abort before touching the target.
pub fn backup_file(file: &Path, backup_dir: &Path) -> Result<PathBuf> {
    let fail = |source: std::io::Error| Error::BackupFailed {
        path: file.to_path_buf(),
        source,
    };

    let name = file
        .file_name()
        .ok_or_else(|| Error::InvalidPath(file.display().to_string()))?;
    let mut backup_name = name.to_os_string();
    backup_name.push(".bak");

    std::fs::create_dir_all(backup_dir).map_err(fail)?;
    let backup = backup_dir.join(backup_name);
    std::fs::copy(file, &backup).map_err(fail)?;
    info!(from = %file.display(), to = %backup.display(), "backed up bundle");
    Ok(backup)
}

/// Merges previous-version colored icons into the installed icon bundle.
///
/// Loads both bundles, merges colorize-eligible entries through the
/// version rename table and returns the prepared update alongside the
/// per-key report. Nothing is written until the update is committed.
#[instrument(skip_all, fields(target = %target_bundle.display()))]
pub fn colorize_icons(
    target_bundle: &Path,
    reference_bundle: &Path,
) -> Result<(PendingUpdate, MergeReport)> {
    let primary = load_bundle(target_bundle)?;
    let reference = load_bundle(reference_bundle)?;

    let (merged, report) = merge::merge(&primary, &reference, &COLORIZE_FILTER, &AFFINITY_V3_TO_V2);
    info!(
        merged = report.merged(),
        kept = report.kept(),
        failed = report.failed(),
        "merged icon payloads"
    );

    let bytes = write_bundle(&merged)?;
    let update = PendingUpdate {
        target: target_bundle.to_path_buf(),
        bytes,
    };
    Ok((update, report))
}

/// Dumps the icon resources of a bundle file below `output_dir`.
#[instrument(skip_all, fields(bundle = %bundle.display()))]
pub fn dump_icons(bundle: &Path, output_dir: &Path) -> Result<usize> {
    let set = load_bundle(bundle)?;
    project::dump_icons(&set, output_dir, &ICON_FILTER)
}

/// Replaces icon payloads of a bundle file from files below `input_dir`.
#[instrument(skip_all, fields(bundle = %bundle.display()))]
pub fn import_icons(bundle: &Path, input_dir: &Path) -> Result<(PendingUpdate, ImportReport)> {
    let set = load_bundle(bundle)?;
    let (imported, report) = project::import_icons(&set, input_dir, &ICON_FILTER);
    info!(
        replaced = report.replaced.len(),
        examined = report.examined,
        "imported icon payloads"
    );

    let bytes = write_bundle(&imported)?;
    let update = PendingUpdate {
        target: bundle.to_path_buf(),
        bytes,
    };
    Ok((update, report))
}

/// Swaps the splash screen image of a bundle file for `image`'s bytes.
///
/// The bundle must already contain [`SPLASH_KEY`]; replacing is supported,
/// introducing a new entry is not.
#[instrument(skip_all, fields(bundle = %bundle.display()))]
pub fn replace_splash(bundle: &Path, image: &Path) -> Result<PendingUpdate> {
    let set = load_bundle(bundle)?;
    if !set.contains_key(SPLASH_KEY) {
        return Err(Error::ResourceNotFound {
            key: SPLASH_KEY.to_string(),
        });
    }

    let picture = std::fs::read(image)?;
    info!(image = %image.display(), bytes = picture.len(), "read splash replacement");

    let mut updated = set;
    updated.insert(SPLASH_KEY, ResourceValue::Stream(picture));

    let bytes = write_bundle(&updated)?;
    Ok(PendingUpdate {
        target: bundle.to_path_buf(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::merge::MergeOutcome;
    use crate::set::ResourceSet;

    fn write_set(path: &Path, set: &ResourceSet) {
        std::fs::write(path, write_bundle(set).unwrap()).unwrap();
    }

    #[test]
    fn write_access_check_leaves_no_residue() {
        let dir = tempdir().unwrap();
        check_write_access(dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn backup_copies_next_to_bak_suffix() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(ICON_BUNDLE_FILE);
        std::fs::write(&file, b"bundle bytes").unwrap();
        let backups = dir.path().join("backup");

        let backup = backup_file(&file, &backups).unwrap();

        assert_eq!(backup, backups.join("Serif.Affinity.g.resources.bak"));
        assert_eq!(std::fs::read(&backup).unwrap(), b"bundle bytes");
        // Original untouched.
        assert_eq!(std::fs::read(&file).unwrap(), b"bundle bytes");
    }

    #[test]
    fn backup_of_missing_file_reports_backup_failure() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.resources");

        let err = backup_file(&missing, dir.path()).unwrap_err();
        assert!(matches!(err, Error::BackupFailed { .. }));
    }

    #[test]
    fn colorize_prepares_without_touching_target_until_commit() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(ICON_BUNDLE_FILE);
        let reference = dir.path().join(REFERENCE_BUNDLE_FILE);

        let mut primary = ResourceSet::new();
        primary.insert(
            "resources/icons/tools/x.png",
            ResourceValue::Stream(vec![1]),
        );
        primary.insert("resources/other/keep.txt", ResourceValue::String("k".into()));
        write_set(&target, &primary);

        let mut v2 = ResourceSet::new();
        v2.insert(
            "resources/icons/tools/x.png",
            ResourceValue::Stream(vec![2, 2]),
        );
        write_set(&reference, &v2);

        let before = std::fs::read(&target).unwrap();
        let (update, report) = colorize_icons(&target, &reference).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), before);
        assert_eq!(report.merged(), 1);
        assert_eq!(report.records[0].outcome, MergeOutcome::Merged);

        update.commit().unwrap();
        let patched = load_bundle(&target).unwrap();
        assert_eq!(
            patched.get("resources/icons/tools/x.png"),
            Some(&ResourceValue::Stream(vec![2, 2]))
        );
        assert_eq!(
            patched.get("resources/other/keep.txt"),
            Some(&ResourceValue::String("k".into()))
        );
    }

    #[test]
    fn import_then_reload_roundtrips_dumped_icons() {
        let dir = tempdir().unwrap();
        let bundle = dir.path().join(ICON_BUNDLE_FILE);
        let icons = dir.path().join("icons");

        let mut set = ResourceSet::new();
        set.insert(
            "resources/icons/tools/a.png",
            ResourceValue::Stream(vec![1, 2, 3]),
        );
        write_set(&bundle, &set);

        assert_eq!(dump_icons(&bundle, &icons).unwrap(), 1);
        std::fs::write(icons.join("tools/a.png"), [7, 7]).unwrap();

        let (update, report) = import_icons(&bundle, &icons).unwrap();
        update.commit().unwrap();

        assert_eq!(report.replaced, vec!["resources/icons/tools/a.png"]);
        let patched = load_bundle(&bundle).unwrap();
        assert_eq!(
            patched.get("resources/icons/tools/a.png"),
            Some(&ResourceValue::Stream(vec![7, 7]))
        );
    }

    #[test]
    fn splash_replacement_requires_existing_key() {
        let dir = tempdir().unwrap();
        let bundle = dir.path().join(SPLASH_BUNDLE_FILE);
        let image = dir.path().join("new.png");
        std::fs::write(&image, [5, 5, 5]).unwrap();

        write_set(&bundle, &ResourceSet::new());
        let err = replace_splash(&bundle, &image).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound { .. }));

        let mut set = ResourceSet::new();
        set.insert(SPLASH_KEY, ResourceValue::Stream(vec![0]));
        write_set(&bundle, &set);

        replace_splash(&bundle, &image).unwrap().commit().unwrap();
        let patched = load_bundle(&bundle).unwrap();
        assert_eq!(
            patched.get(SPLASH_KEY),
            Some(&ResourceValue::Stream(vec![5, 5, 5]))
        );
    }
}
