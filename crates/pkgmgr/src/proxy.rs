//! Client-side typed proxy for `IPackageManager`.

use binder::Proxy;
use binder::RemoteHandle;
use binder::Result;
use contract::OperationDescriptor;
use contract::Parcelable;
use contract::Value;

use crate::interface::GET_INSTALLED_PACKAGES;
use crate::interface::GET_INSTALLED_PACKAGES_LONG;
use crate::interface::GET_PACKAGES_FOR_UID;
use crate::interface::GET_PACKAGE_INFO;
use crate::interface::GET_PACKAGE_INFO_LONG;
use crate::interface::PACKAGE_MANAGER;
use crate::types::PackageInfo;
use crate::types::UserId;

/// Typed calls to a remote package manager.
///
/// Operations that take a user run as `user()`, which is `UserId::SYSTEM`
/// unless changed with `for_user`.
#[derive(Debug, Clone)]
pub struct PackageManagerProxy {
    proxy: Proxy,
    user: UserId,
}

impl PackageManagerProxy {
    /// Builds a proxy over `handle`.
    ///
    /// # Errors
    /// `InvalidHandle` if the handle is unbound or dead.
    pub fn as_interface(handle: RemoteHandle) -> Result<Self> {
        Ok(Self { proxy: Proxy::new(&PACKAGE_MANAGER, handle)?, user: UserId::SYSTEM })
    }

    /// Like `as_interface`, but also checks the remote interface descriptor.
    pub async fn as_interface_checked(handle: RemoteHandle) -> Result<Self> {
        Ok(Self { proxy: Proxy::checked(&PACKAGE_MANAGER, handle).await?, user: UserId::SYSTEM })
    }

    /// Returns a proxy to the same object that queries as `user`.
    pub fn for_user(&self, user: UserId) -> Self {
        Self { proxy: self.proxy.clone(), user }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    async fn call<T: Parcelable>(&self, op: &'static OperationDescriptor, args: &[Value]) -> Result<T> {
        let value = self.proxy.invoke(op, args).await?;
        Ok(T::from_value(value)?)
    }

    pub async fn get_packages_for_uid(&self, uid: i32) -> Result<Vec<String>> {
        self.call(GET_PACKAGES_FOR_UID, &[uid.into_value()]).await
    }

    pub async fn get_package_info(&self, package_name: &str, flags: i32) -> Result<Option<PackageInfo>> {
        let args = [package_name.into(), flags.into_value(), self.user.0.into_value()];
        self.call(GET_PACKAGE_INFO, &args).await
    }

    pub async fn get_package_info_long(&self, package_name: &str, flags: i64) -> Result<Option<PackageInfo>> {
        let args = [package_name.into(), flags.into_value(), self.user.0.into_value()];
        self.call(GET_PACKAGE_INFO_LONG, &args).await
    }

    pub async fn get_installed_packages(&self, flags: i32) -> Result<Vec<PackageInfo>> {
        let args = [flags.into_value(), self.user.0.into_value()];
        self.call(GET_INSTALLED_PACKAGES, &args).await
    }

    pub async fn get_installed_packages_long(&self, flags: i64) -> Result<Vec<PackageInfo>> {
        let args = [flags.into_value(), self.user.0.into_value()];
        self.call(GET_INSTALLED_PACKAGES_LONG, &args).await
    }
}
