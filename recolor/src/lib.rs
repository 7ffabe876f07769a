//! # recolor
//!
//! A library for patching the embedded image resources of Affinity v3
//! installations: restoring the v2 colored tool icons, dumping and importing
//! icon sets, and swapping the splash screen.
//!
//! ## Quick Start
//!
//! ### Restoring colored icons
//!
//! ```no_run
//! use std::path::Path;
//! use recolor::workflow;
//!
//! let dir = Path::new("C:/Program Files/Affinity/Affinity");
//! workflow::check_write_access(dir)?;
//!
//! let (update, report) = workflow::colorize_icons(
//!     &dir.join(workflow::ICON_BUNDLE_FILE),
//!     Path::new(workflow::REFERENCE_BUNDLE_FILE),
//! )?;
//! println!("{} icons merged", report.merged());
//! update.commit()?;
//! # Ok::<(), recolor::Error>(())
//! ```
//!
//! ### Round-tripping icons through a folder
//!
//! ```no_run
//! use std::path::Path;
//! use recolor::workflow;
//!
//! let bundle = Path::new("Serif.Affinity.g.resources");
//! workflow::dump_icons(bundle, Path::new("icons"))?;
//! // ... edit the dumped PNGs ...
//! let (update, _) = workflow::import_icons(bundle, Path::new("icons"))?;
//! update.commit()?;
//! # Ok::<(), recolor::Error>(())
//! ```

pub mod bundle;
pub mod error;
pub mod install;
pub mod merge;
pub mod project;
pub mod remap;
pub mod set;
pub mod workflow;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::bundle::{load_bundle, read_bundle, write_bundle, ResourceValue};
    pub use crate::error::{Error, Result};
    pub use crate::merge::{
        merge, KeyFilter, MergeOutcome, MergeRecord, MergeReport, COLORIZE_FILTER, ICON_FILTER,
    };
    pub use crate::project::{dump_icons, import_icons, projected_path, ImportReport};
    pub use crate::remap::{KeyRemapTable, AFFINITY_V3_TO_V2};
    pub use crate::set::ResourceSet;
    pub use crate::workflow::{
        backup_file, check_write_access, colorize_icons, replace_splash, PendingUpdate,
        ICON_BUNDLE_FILE, REFERENCE_BUNDLE_FILE, SPLASH_BUNDLE_FILE, SPLASH_KEY,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
