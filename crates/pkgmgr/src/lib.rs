//! # Package Manager
//!
//! The `android.content.pm.IPackageManager` contract and both of its ends:
//!
//! - `PackageManagerProxy`: typed client calls over a `RemoteHandle`.
//! - `PackageManagerStub`: serves a local `PackageManager` through a
//!   `Dispatcher`.
//! - `PackageTable`: an in-memory `PackageManager`.
//!
//! ```
//! # use pkgmgr::*;
//! # use binder::{LocalBinder, RemoteHandle};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), binder::Error> {
//! let table = PackageTable::new()
//!     .with_package(PackageInfo::new("com.example.app", 1000));
//! let transport = LocalBinder::new(PackageManagerStub::new(table).into_dispatcher()).into_transport();
//!
//! let pm = PackageManagerProxy::as_interface(RemoteHandle::new(&transport))?;
//! assert_eq!(pm.get_packages_for_uid(1000).await?, ["com.example.app"]);
//! # Ok(())
//! # }
//! ```

pub mod interface;
pub mod proxy;
pub mod service;
pub mod stub;
pub mod table;
pub mod types;

pub use interface::DESCRIPTOR;
pub use interface::PACKAGE_MANAGER;
pub use proxy::PackageManagerProxy;
pub use service::PackageManager;
pub use stub::PackageManagerStub;
pub use table::PackageTable;
pub use types::FLAG_SYSTEM;
pub use types::MATCH_SYSTEM_ONLY;
pub use types::PackageInfo;
pub use types::UserId;
pub use types::widen_flags;

#[cfg(test)]
mod tests;
