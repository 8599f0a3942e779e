//! # Targets
//!
//! Attestation target policy: which calling UIDs get a patched certificate
//! and which get a generated one, based on the packages the package manager
//! reports for the UID and the files in a configuration directory, reloaded
//! by `ConfigWatcher` when they change.

pub mod config;
pub mod dir;
pub mod error;
pub mod policy;
pub mod watch;

pub use config::Mode;
pub use config::PatchLevel;
pub use config::TargetConfig;
pub use config::TeeStatus;
pub use dir::ConfigDir;
pub use error::Error;
pub use error::Result;
pub use policy::Decision;
pub use policy::TargetPolicy;
pub use watch::ConfigWatcher;
