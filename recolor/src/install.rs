//! Locating and stopping the installed application.

use std::path::PathBuf;
use std::process::Command;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Registry key recording the installation directory.
#[cfg(windows)]
const INSTALL_KEY: &str = "SOFTWARE\\Serif\\Affinity\\Affinity";

/// Registry value holding the installation directory.
#[cfg(windows)]
const INSTALL_VALUE: &str = "Affinity Install Path";

/// Process name of the running application, without extension.
const APP_PROCESS: &str = "Affinity";

/// Reads the installation directory from the machine registry.
///
/// Only meaningful on Windows installs; elsewhere the directory must be
/// given explicitly and this returns [`Error::InstallDirNotFound`].
#[cfg(windows)]
pub fn default_install_dir() -> Result<PathBuf> {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = hklm
        .open_subkey(INSTALL_KEY)
        .map_err(|_| Error::InstallDirNotFound)?;
    let path: String = key
        .get_value(INSTALL_VALUE)
        .map_err(|_| Error::InstallDirNotFound)?;
    info!(path, "resolved install directory from registry");
    Ok(PathBuf::from(path))
}

/// Reads the installation directory from the machine registry.
///
/// Only meaningful on Windows installs; elsewhere the directory must be
/// given explicitly and this returns [`Error::InstallDirNotFound`].
#[cfg(not(windows))]
pub fn default_install_dir() -> Result<PathBuf> {
    Err(Error::InstallDirNotFound)
}

/// Force-stops any running instance of the application.
///
/// The bundles cannot be replaced while the application holds them open.
/// A non-zero exit from the process killer means no instance was running,
/// which is fine.
pub fn terminate_app() -> Result<()> {
    let status = if cfg!(windows) {
        Command::new("taskkill")
            .args(["/F", "/IM", &format!("{APP_PROCESS}.exe")])
            .status()?
    } else {
        Command::new("pkill").args(["-x", APP_PROCESS]).status()?
    };

    if status.success() {
        info!("terminated running application instance");
    } else {
        warn!(%status, "no running application instance found");
    }
    Ok(())
}
