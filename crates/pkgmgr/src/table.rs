//! In-memory package manager.

use std::collections::BTreeMap;

use contract::Failure;
use contract::FailureKind;
use dashmap::DashMap;
use tracing::debug;

use crate::service;
use crate::service::PackageManager;
use crate::types::PackageInfo;
use crate::types::UserId;

/// Per-user package sets, keyed by package name.
///
/// Queries for a user that was never added fail with `IllegalArgument`.
#[derive(Default)]
pub struct PackageTable {
    users: DashMap<UserId, BTreeMap<String, PackageInfo>>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user` with no packages. Does nothing if it exists.
    pub fn add_user(&self, user: UserId) {
        self.users.entry(user).or_default();
    }

    /// Installs or replaces a package for the user owning its uid, adding
    /// the user if needed.
    pub fn install(&self, info: PackageInfo) {
        let user = UserId::of_uid(info.uid);
        debug!("install {} for {user}", info.package_name);
        self.users.entry(user).or_default().insert(info.package_name.clone(), info);
    }

    /// Builder form of `install`.
    pub fn with_package(self, info: PackageInfo) -> Self {
        self.install(info);
        self
    }

    pub fn uninstall(&self, user: UserId, package_name: &str) -> Option<PackageInfo> {
        self.users.get_mut(&user)?.remove(package_name)
    }

    fn query<T>(&self, user: UserId, f: impl FnOnce(&BTreeMap<String, PackageInfo>) -> T) -> service::Result<T> {
        match self.users.get(&user) {
            Some(packages) => Ok(f(packages.value())),
            None => Err(Failure::new(FailureKind::IllegalArgument, format!("unknown user {}", user.0))),
        }
    }
}

#[async_trait::async_trait]
impl PackageManager for PackageTable {
    async fn get_packages_for_uid(&self, uid: i32) -> service::Result<Vec<String>> {
        let names: Vec<String> = self
            .users
            .get(&UserId::of_uid(uid))
            .map(|packages| {
                packages.values().filter(|p| p.uid == uid).map(|p| p.package_name.clone()).collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    async fn get_package_info_long(
        &self,
        package_name: &str,
        flags: i64,
        user: UserId,
    ) -> service::Result<Option<PackageInfo>> {
        self.query(user, |packages| packages.get(package_name).filter(|p| p.matches(flags)).cloned())
    }

    async fn get_installed_packages_long(&self, flags: i64, user: UserId) -> service::Result<Vec<PackageInfo>> {
        self.query(user, |packages| packages.values().filter(|p| p.matches(flags)).cloned().collect())
    }
}
