//! Cross-version resource merging.
//!
//! The merge walks the primary (installed) resource set in order and builds a
//! fresh set of the same keys. Entries matching the eligibility filter take
//! their payload from the reference set when it has one under the remapped
//! key; everything else copies through untouched. One broken or missing
//! reference entry never aborts the run — the operator wants the remaining
//! icons merged regardless.

use tracing::{debug, error, warn};

use crate::bundle::ResourceValue;
use crate::error::{Error, Result};
use crate::remap::KeyRemapTable;
use crate::set::ResourceSet;

/// Suffix/prefix test deciding which keys participate in a merge.
///
/// A key is eligible when it ends with the suffix and starts with at least
/// one of the prefixes. Modeled as data so the engine stays independent of
/// the particular version pair being bridged.
#[derive(Debug, Clone, Copy)]
pub struct KeyFilter {
    /// Required key suffix, e.g. `.png`.
    pub suffix: &'static str,
    /// Accepted key prefixes.
    pub prefixes: &'static [&'static str],
}

impl KeyFilter {
    /// Whether `key` passes the suffix and prefix tests.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        key.ends_with(self.suffix) && self.prefixes.iter().any(|p| key.starts_with(p))
    }
}

/// Icon paths replaced by the colorize merge.
pub const COLORIZE_FILTER: KeyFilter = KeyFilter {
    suffix: ".png",
    prefixes: &[
        "resources/icons/tools/",
        "resources/icons/colourpicker.imageset",
        "resources/icons/formatdropper.imageset",
    ],
};

/// All dumpable/importable icon resources.
pub const ICON_FILTER: KeyFilter = KeyFilter {
    suffix: ".png",
    prefixes: &["resources/icons/"],
};

/// What happened to one eligible key during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The reference payload replaced the original.
    Merged,
    /// No reference entry was found; the original payload was kept.
    KeptOriginal,
    /// Fetching the reference payload failed; the original was kept.
    Failed(String),
}

/// Per-key merge outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    /// The primary-set key the record is about.
    pub key: String,
    /// What happened to it.
    pub outcome: MergeOutcome,
}

/// Outcomes for every eligible key of a merge run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// One record per eligible key, in primary iteration order.
    pub records: Vec<MergeRecord>,
}

impl MergeReport {
    /// Number of keys that took the reference payload.
    #[must_use]
    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Merged))
    }

    /// Number of keys kept because the reference had no entry.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::KeptOriginal))
    }

    /// Number of keys kept because fetching the reference payload failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MergeOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&MergeOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Merges `reference` payloads into `primary` for keys passing `filter`.
///
/// Every key of `primary` appears exactly once in the result, in primary
/// iteration order; keys only present in `reference` are never introduced.
/// Ineligible keys copy through byte-for-byte. Eligible keys are looked up
/// in `reference` under `remap(key)` and fall back to the original payload
/// on a miss or a per-entry failure.
#[must_use]
pub fn merge(
    primary: &ResourceSet,
    reference: &ResourceSet,
    filter: &KeyFilter,
    remap: &KeyRemapTable,
) -> (ResourceSet, MergeReport) {
    let mut out = ResourceSet::new();
    let mut report = MergeReport::default();

    for (key, original) in primary.iter() {
        if !filter.matches(key) {
            out.insert(key, original.clone());
            continue;
        }

        let reference_key = remap.remap(key);
        let outcome = match reference.get(reference_key) {
            Some(value) => match fetch_payload(key, value) {
                Ok(payload) => {
                    debug!(key, reference_key, "merged reference payload");
                    out.insert(key, payload);
                    MergeOutcome::Merged
                }
                Err(err) => {
                    error!(key, %err, "failed to merge reference payload");
                    out.insert(key, original.clone());
                    MergeOutcome::Failed(err.to_string())
                }
            },
            None => {
                warn!(key, reference_key, "no reference payload, keeping original");
                out.insert(key, original.clone());
                MergeOutcome::KeptOriginal
            }
        };
        report.records.push(MergeRecord {
            key: key.to_string(),
            outcome,
        });
    }

    (out, report)
}

/// Pulls the replacement payload out of a reference entry.
///
/// Image keys must resolve to raw bytes; anything else in that slot means
/// the reference bundle is damaged, which is a per-entry failure rather than
/// a fatal one.
fn fetch_payload(key: &str, value: &ResourceValue) -> Result<ResourceValue> {
    if value.as_bytes().is_some() {
        Ok(value.clone())
    } else {
        Err(Error::PayloadNotBytes {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn stream(bytes: &[u8]) -> ResourceValue {
        ResourceValue::Stream(bytes.to_vec())
    }

    #[test]
    fn filter_requires_both_suffix_and_prefix() {
        assert!(COLORIZE_FILTER.matches("resources/icons/tools/x.png"));
        assert!(!COLORIZE_FILTER.matches("resources/icons/tools/x.xaml"));
        assert!(!COLORIZE_FILTER.matches("resources/images/splash.png"));
        assert!(COLORIZE_FILTER.matches("resources/icons/colourpicker.imageset/picker.png"));
    }

    #[test]
    fn eligible_key_takes_reference_payload() {
        let mut primary = ResourceSet::new();
        primary.insert("A.png", stream(b"bytesA"));
        primary.insert("resources/icons/tools/x.png", stream(b"bytesX1"));
        let mut reference = ResourceSet::new();
        reference.insert("resources/icons/tools/x.png", stream(b"bytesX2"));

        let (merged, report) =
            merge(&primary, &reference, &COLORIZE_FILTER, &KeyRemapTable::IDENTITY);

        assert_eq!(merged.get("A.png"), Some(&stream(b"bytesA")));
        assert_eq!(
            merged.get("resources/icons/tools/x.png"),
            Some(&stream(b"bytesX2"))
        );
        assert_eq!(
            report.records,
            vec![MergeRecord {
                key: "resources/icons/tools/x.png".to_string(),
                outcome: MergeOutcome::Merged,
            }]
        );
    }

    #[test]
    fn missing_reference_keeps_original_and_continues() {
        let mut primary = ResourceSet::new();
        primary.insert("A.png", stream(b"bytesA"));
        primary.insert("resources/icons/tools/x.png", stream(b"bytesX1"));
        let reference = ResourceSet::new();

        let (merged, report) =
            merge(&primary, &reference, &COLORIZE_FILTER, &KeyRemapTable::IDENTITY);

        assert_eq!(
            merged.get("resources/icons/tools/x.png"),
            Some(&stream(b"bytesX1"))
        );
        assert_eq!(report.kept(), 1);
        assert_eq!(report.merged(), 0);
    }

    #[test]
    fn renamed_key_resolves_through_remap_table() {
        let mut primary = ResourceSet::new();
        primary.insert(
            "resources/icons/tools/measuretool.imageset/measure%20tool.png",
            stream(b"mono"),
        );
        let mut reference = ResourceSet::new();
        reference.insert(
            "resources/icons/tools/measuretool.imageset/measuretool.png",
            stream(b"colored"),
        );

        let (merged, report) = merge(
            &primary,
            &reference,
            &COLORIZE_FILTER,
            &crate::remap::AFFINITY_V3_TO_V2,
        );

        assert_eq!(
            merged.get("resources/icons/tools/measuretool.imageset/measure%20tool.png"),
            Some(&stream(b"colored"))
        );
        assert_eq!(report.merged(), 1);
    }

    #[test]
    fn non_byte_reference_payload_is_a_soft_failure() {
        let mut primary = ResourceSet::new();
        primary.insert("resources/icons/tools/x.png", stream(b"bytesX1"));
        let mut reference = ResourceSet::new();
        reference.insert(
            "resources/icons/tools/x.png",
            ResourceValue::String("not bytes".into()),
        );

        let (merged, report) =
            merge(&primary, &reference, &COLORIZE_FILTER, &KeyRemapTable::IDENTITY);

        assert_eq!(
            merged.get("resources/icons/tools/x.png"),
            Some(&stream(b"bytesX1"))
        );
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn no_keys_dropped_duplicated_or_introduced() {
        let mut primary = ResourceSet::new();
        primary.insert("one.txt", ResourceValue::String("1".into()));
        primary.insert("resources/icons/tools/a.png", stream(b"a1"));
        primary.insert("resources/icons/tools/b.png", stream(b"b1"));
        let mut reference = ResourceSet::new();
        reference.insert("resources/icons/tools/a.png", stream(b"a2"));
        reference.insert("resources/icons/tools/only-in-reference.png", stream(b"x"));

        let (merged, _) =
            merge(&primary, &reference, &COLORIZE_FILTER, &KeyRemapTable::IDENTITY);

        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(
            keys,
            ["one.txt", "resources/icons/tools/a.png", "resources/icons/tools/b.png"]
        );
    }
}
