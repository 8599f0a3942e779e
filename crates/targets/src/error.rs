use std::path::PathBuf;

use contract::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration directory could not be watched.
    #[error("failed to watch config directory: {0}")]
    Watch(#[from] notify::Error),
    /// The package manager query failed.
    #[error(transparent)]
    PackageManager(#[from] binder::Error),
}

impl Error {
    /// Classifies a package-manager failure. `None` for local failures and
    /// for failures the package manager declared.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Io { .. } | Self::Watch(_) => None,
            Self::PackageManager(e) => e.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
