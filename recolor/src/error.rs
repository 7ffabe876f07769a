//! Error types for the `recolor` engine

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `recolor` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The directory is not writable by the current user.
    #[error("no write access to \"{path}\"")]
    AccessDenied {
        /// The directory that failed the write-access check.
        path: PathBuf,
    },

    /// Backing up the target file before mutation failed.
    #[error("failed to back up \"{path}\": {source}")]
    BackupFailed {
        /// The file that could not be backed up.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Resource Bundle Errors ====================
    /// The file is not a valid .resources bundle (missing 0xBEEFCACE magic).
    #[error("invalid resource bundle magic: found 0x{found:08X}")]
    InvalidBundleMagic {
        /// The magic value actually read.
        found: u32,
    },

    /// The bundle declares a reader version this crate does not handle.
    #[error("unsupported resource reader version: {version}")]
    UnsupportedBundleVersion {
        /// The version number found in the bundle header.
        version: u32,
    },

    /// An entry uses a payload type code outside the built-in set.
    #[error("unsupported resource type code 0x{code:02X} for \"{key}\"")]
    UnsupportedTypeCode {
        /// The type code byte read from the data section.
        code: u8,
        /// The resource key the entry belongs to.
        key: String,
    },

    /// The bundle ended before a complete section could be read.
    #[error("unexpected end of resource bundle")]
    UnexpectedEof,

    /// A resource name or string payload is not valid UTF-16/UTF-8.
    #[error("malformed string data in resource bundle: {0}")]
    MalformedString(String),

    /// A payload size or section offset does not fit the bundle.
    #[error("invalid resource bundle layout: {0}")]
    InvalidBundleLayout(String),

    // ==================== Resource Set Errors ====================
    /// The requested entry does not exist in the resource set.
    #[error("resource not found: \"{key}\"")]
    ResourceNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A reference payload was expected to be raw bytes but is not.
    #[error("payload for \"{key}\" is not a byte stream")]
    PayloadNotBytes {
        /// The key whose payload has the wrong shape.
        key: String,
    },

    // ==================== Environment Errors ====================
    /// Could not automatically determine the Affinity installation directory.
    #[error("could not determine the Affinity install path")]
    InstallDirNotFound,

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::MalformedString(err.to_string())
    }
}

impl From<std::string::FromUtf16Error> for Error {
    fn from(err: std::string::FromUtf16Error) -> Self {
        Error::MalformedString(err.to_string())
    }
}

impl<F> From<tempfile::PersistError<F>> for Error {
    fn from(err: tempfile::PersistError<F>) -> Self {
        Error::Io(err.error)
    }
}

/// A specialized Result type for `recolor` operations.
pub type Result<T> = std::result::Result<T, Error>;
