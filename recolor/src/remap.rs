//! Static key translation between the two icon naming schemes.
//!
//! A handful of tool icons were renamed between v2 and v3; everything else
//! kept its key. The correspondence is data, not logic: supporting another
//! version pair means extending [`AFFINITY_V3_TO_V2`], nothing else.

/// A fixed `(source key, reference key)` correspondence.
///
/// [`remap`](KeyRemapTable::remap) is total: keys without an entry map to
/// themselves.
#[derive(Debug, Clone, Copy)]
pub struct KeyRemapTable {
    pairs: &'static [(&'static str, &'static str)],
}

impl KeyRemapTable {
    /// A table with no renames; every key maps to itself.
    pub const IDENTITY: KeyRemapTable = KeyRemapTable { pairs: &[] };

    /// Builds a table over a fixed pair list.
    #[must_use]
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        KeyRemapTable { pairs }
    }

    /// Translates a source key into the reference set's naming scheme.
    #[must_use]
    pub fn remap<'k>(&self, key: &'k str) -> &'k str {
        self.pairs
            .iter()
            .find(|(from, _)| *from == key)
            .map_or(key, |(_, to)| *to)
    }
}

/// Icon keys that the v3 release renamed relative to v2.
pub const AFFINITY_V3_TO_V2: KeyRemapTable = KeyRemapTable::new(&[
    (
        "resources/icons/tools/brushtool.imageset/paint%20brush%20tool_2.png",
        "resources/icons/tools/brushtool.imageset/paint%20brush%20tool.png",
    ),
    (
        "resources/icons/tools/brushtool.imageset/paint%20brush%20tool@2x_2.png",
        "resources/icons/tools/brushtool.imageset/paint%20brush%20tool@2x.png",
    ),
    (
        "resources/icons/tools/objectselectiontool.imageset/object%20selection%20tool.png",
        "resources/icons/tools/objectselectiontool.imageset/object_selection_tool.png",
    ),
    (
        "resources/icons/tools/objectselectiontool.imageset/object%20selection%20tool@2x.png",
        "resources/icons/tools/objectselectiontool.imageset/object_selection_tool@2x.png",
    ),
    (
        "resources/icons/tools/measuretool.imageset/measure%20tool.png",
        "resources/icons/tools/measuretool.imageset/measuretool.png",
    ),
    (
        "resources/icons/tools/measuretool.imageset/measure%20tool@2x.png",
        "resources/icons/tools/measuretool.imageset/measuretool@2x.png",
    ),
    (
        "resources/icons/tools/strokewidthtool.imageset/line%20width%20tool%20mono.png",
        "resources/icons/tools/strokewidthtool.imageset/line%20width%20tool.png",
    ),
    (
        "resources/icons/tools/strokewidthtool.imageset/line%20width%20tool%20mono@2x.png",
        "resources/icons/tools/strokewidthtool.imageset/line%20width%20tool@2x.png",
    ),
    (
        "resources/icons/tools/inpaintingbrushtool.imageset/inpainting%20tool.png",
        "resources/icons/tools/inpaintingbrushtool.imageset/inpainting%20brush%20tool.png",
    ),
    (
        "resources/icons/tools/inpaintingbrushtool.imageset/inpainting%20tool@2x.png",
        "resources/icons/tools/inpaintingbrushtool.imageset/inpainting%20brush%20tool@2x.png",
    ),
]);
