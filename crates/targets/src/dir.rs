//! Loading the policy configuration directory.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::warn;

use crate::config::PatchLevel;
use crate::config::TargetConfig;
use crate::config::TeeStatus;
use crate::error::Error;
use crate::error::Result;

pub const TARGET_FILE: &str = "target.txt";
pub const PATCH_LEVEL_FILE: &str = "security_patch.txt";
pub const TEE_STATUS_FILE: &str = "tee_status";

/// Everything read from one configuration directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDir {
    pub targets: TargetConfig,
    pub patch_level: Option<PatchLevel>,
    pub tee: TeeStatus,
}

impl ConfigDir {
    /// Reads `target.txt`, `security_patch.txt` and `tee_status` from `root`.
    ///
    /// A missing file is logged and replaced by its default. A file that
    /// exists but cannot be read is an error.
    pub async fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();

        let targets = match read_optional(root.join(TARGET_FILE)).await? {
            Some(text) => TargetConfig::parse(&text),
            None => {
                warn!("{TARGET_FILE} not found in {}", root.display());
                TargetConfig::default()
            }
        };
        let patch_level = read_optional(root.join(PATCH_LEVEL_FILE)).await?.and_then(|t| PatchLevel::parse(&t));
        let tee = read_optional(root.join(TEE_STATUS_FILE))
            .await?
            .map_or(TeeStatus::Unknown, |t| TeeStatus::parse(&t));

        info!("loaded {} targets, patch level {:?}, tee {:?}", targets.len(), patch_level, tee);
        Ok(Self { targets, patch_level, tee })
    }

    /// Records the TEE self-check result in `root`.
    pub async fn store_tee_status(root: impl AsRef<Path>, status: TeeStatus) -> Result<()> {
        let Some(line) = status.to_line() else {
            return Ok(());
        };
        let path = root.as_ref().join(TEE_STATUS_FILE);
        tokio::fs::write(&path, line).await.map_err(|source| Error::Io { path, source })
    }
}

async fn read_optional(path: PathBuf) -> Result<Option<String>> {
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io { path, source }),
    }
}
