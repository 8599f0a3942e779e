//! # Target Policy
//!
//! Decides per calling UID whether an attestation request should be patched
//! or answered with a generated chain. The packages behind a UID come from the
//! package manager; how each package is treated comes from `TargetConfig`.

use tokio::sync::RwLock;
use tracing::debug;
use tracing::error;

use pkgmgr::PackageManagerProxy;

use crate::config::Mode;
use crate::config::TeeStatus;
use crate::dir::ConfigDir;
use crate::error::Result;

/// What to do for one calling UID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    pub hack: bool,
    pub generate: bool,
}

impl Decision {
    /// Folds the modes of every package sharing the UID.
    ///
    /// `Auto` packages follow the TEE: patched while it works, generated once
    /// it is broken, and left alone while its state is unknown.
    pub fn from_modes(modes: impl IntoIterator<Item = Mode>, tee: TeeStatus) -> Self {
        let mut decision = Self::default();
        for mode in modes {
            match (mode, tee) {
                (Mode::LeafHack, _) | (Mode::Auto, TeeStatus::Working) => decision.hack = true,
                (Mode::Generate, _) | (Mode::Auto, TeeStatus::Broken) => decision.generate = true,
                (Mode::Auto, TeeStatus::Unknown) => {}
            }
        }
        decision
    }
}

pub struct TargetPolicy {
    pm: PackageManagerProxy,
    config: RwLock<ConfigDir>,
}

impl TargetPolicy {
    pub fn new(pm: PackageManagerProxy, config: ConfigDir) -> Self {
        Self { pm, config: RwLock::new(config) }
    }

    /// Replaces the configuration, e.g. after a file in the directory changed.
    pub async fn reload(&self, config: ConfigDir) {
        *self.config.write().await = config;
    }

    pub async fn config(&self) -> ConfigDir {
        self.config.read().await.clone()
    }

    /// Looks up the packages of `uid` and decides.
    #[tracing::instrument(skip(self))]
    pub async fn decide(&self, uid: i32) -> Result<Decision> {
        let packages = self.pm.get_packages_for_uid(uid).await?;
        let config = self.config.read().await;
        let modes = packages.iter().filter_map(|p| config.targets.mode(p));
        let decision = Decision::from_modes(modes, config.tee);
        debug!("{packages:?} -> {decision:?}");
        Ok(decision)
    }

    /// Returns true if requests from `uid` should be patched.
    /// Any failure is logged and answered with `false`.
    pub async fn need_hack(&self, uid: i32) -> bool {
        self.decide_or_log(uid).await.hack
    }

    /// Returns true if requests from `uid` should get a generated chain.
    /// Any failure is logged and answered with `false`.
    pub async fn need_generate(&self, uid: i32) -> bool {
        self.decide_or_log(uid).await.generate
    }

    async fn decide_or_log(&self, uid: i32) -> Decision {
        self.decide(uid).await.unwrap_or_else(|e| {
            error!("failed to get packages for uid {uid}: {e}");
            Decision::default()
        })
    }
}
