//! The local package-manager interface.

use contract::Failure;

use crate::types::PackageInfo;
use crate::types::UserId;
use crate::types::widen_flags;

pub type Result<T> = std::result::Result<T, Failure>;

/// A package-manager implementation that a `PackageManagerStub` can serve.
///
/// The 32-bit flag variants widen their flags and forward to the 64-bit ones
/// unless overridden.
#[async_trait::async_trait]
pub trait PackageManager: Send + Sync + 'static {
    /// Names of the packages sharing `uid`.
    async fn get_packages_for_uid(&self, uid: i32) -> Result<Vec<String>>;

    async fn get_package_info_long(
        &self,
        package_name: &str,
        flags: i64,
        user: UserId,
    ) -> Result<Option<PackageInfo>>;

    async fn get_installed_packages_long(&self, flags: i64, user: UserId) -> Result<Vec<PackageInfo>>;

    async fn get_package_info(
        &self,
        package_name: &str,
        flags: i32,
        user: UserId,
    ) -> Result<Option<PackageInfo>> {
        self.get_package_info_long(package_name, widen_flags(flags), user).await
    }

    async fn get_installed_packages(&self, flags: i32, user: UserId) -> Result<Vec<PackageInfo>> {
        self.get_installed_packages_long(widen_flags(flags), user).await
    }
}
