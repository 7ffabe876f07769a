use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Subcommand, ValueEnum};

pub mod check;
pub mod colorize;
pub mod dump;
pub mod import;
pub mod splash;

/// Resource family a dump or import operates on.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResourceTarget {
    /// The `resources/icons/` PNG resources.
    Icons,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify the install directory is writable
    Check {
        /// Install directory (default: from the registry)
        dir: Option<PathBuf>,
    },

    /// Restore the v2 colored tool icons
    Colorize {
        /// Install directory (default: from the registry)
        dir: Option<PathBuf>,

        /// v2 reference bundle (default: next to this executable)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Kill a running Affinity instance first
        #[arg(short, long)]
        terminate: bool,

        /// Backup directory (default: next to this executable)
        #[arg(short, long)]
        backup: Option<PathBuf>,

        /// Wait for confirmation before writing the patched bundle
        #[arg(short, long)]
        pause: bool,
    },

    /// Dump icon resources to a folder
    Dump {
        /// What to dump
        target: ResourceTarget,

        /// Install directory (default: from the registry)
        dir: Option<PathBuf>,

        /// Output folder
        #[arg(short, long, default_value = "icons")]
        output: PathBuf,
    },

    /// Replace icon resources from a folder
    Import {
        /// What to import
        target: ResourceTarget,

        /// Install directory (default: from the registry)
        dir: Option<PathBuf>,

        /// Input folder
        #[arg(short, long, default_value = "icons")]
        input: PathBuf,
    },

    /// Replace the splash screen image
    Splash {
        /// Install directory (default: from the registry)
        dir: Option<PathBuf>,

        /// Replacement image file
        #[arg(short = 'i', long)]
        img: PathBuf,

        /// Kill a running Affinity instance first
        #[arg(short, long)]
        terminate: bool,

        /// Backup directory (default: next to this executable)
        #[arg(short, long)]
        backup: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Check { dir } => check::execute(&resolve_dir(dir.as_deref())?),
            Commands::Colorize {
                dir,
                reference,
                terminate,
                backup,
                pause,
            } => colorize::execute(
                &resolve_dir(dir.as_deref())?,
                reference.as_deref(),
                *terminate,
                backup.as_deref(),
                *pause,
            ),
            Commands::Dump {
                target: ResourceTarget::Icons,
                dir,
                output,
            } => dump::execute(&resolve_dir(dir.as_deref())?, output),
            Commands::Import {
                target: ResourceTarget::Icons,
                dir,
                input,
            } => import::execute(&resolve_dir(dir.as_deref())?, input),
            Commands::Splash {
                dir,
                img,
                terminate,
                backup,
            } => splash::execute(
                &resolve_dir(dir.as_deref())?,
                img,
                *terminate,
                backup.as_deref(),
            ),
        }
    }
}

/// The install directory: given explicitly, or read from the registry.
fn resolve_dir(dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => recolor::install::default_install_dir()
            .context("no install directory given and none found in the registry; pass one explicitly"),
    }
}

/// Directory of the running executable, for bundled defaults.
pub(crate) fn exe_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("could not locate the running executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.to_path_buf())
}
