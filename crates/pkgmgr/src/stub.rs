//! Server-side adapter from the dynamic `Handler` to a typed `PackageManager`.

use std::sync::Arc;
use std::vec;

use binder::Dispatcher;
use binder::Handler;
use contract::Failure;
use contract::FailureKind;
use contract::OperationDescriptor;
use contract::Parcelable;
use contract::Value;

use crate::interface::PACKAGE_MANAGER;
use crate::interface::transactions;
use crate::service::PackageManager;
use crate::types::UserId;

pub struct PackageManagerStub<T> {
    service: T,
}

impl<T: PackageManager> PackageManagerStub<T> {
    pub fn new(service: T) -> Self {
        Self { service }
    }

    /// Wraps the stub in a dispatcher for the package-manager contract.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(&PACKAGE_MANAGER, Arc::new(self))
    }
}

/// Pulls the next decoded argument.
///
/// The dispatcher has already checked the shapes, so a failure here is a
/// null where the typed interface wants a value.
fn arg<T: Parcelable>(args: &mut vec::IntoIter<Value>) -> Result<T, Failure> {
    let value = args.next().ok_or_else(|| Failure::new(FailureKind::BadParcelable, "missing argument"))?;
    T::from_value(value).map_err(|e| Failure::new(FailureKind::BadParcelable, e.to_string()))
}

#[async_trait::async_trait]
impl<T: PackageManager> Handler for PackageManagerStub<T> {
    async fn handle(&self, op: &'static OperationDescriptor, args: Vec<Value>) -> Result<Value, Failure> {
        let mut args = args.into_iter();
        let svc = &self.service;
        match op.code {
            transactions::GET_PACKAGES_FOR_UID => {
                let uid = arg(&mut args)?;
                Ok(svc.get_packages_for_uid(uid).await?.into_value())
            }
            transactions::GET_PACKAGE_INFO => {
                let name: String = arg(&mut args)?;
                let (flags, user) = (arg(&mut args)?, UserId(arg(&mut args)?));
                Ok(svc.get_package_info(&name, flags, user).await?.into_value())
            }
            transactions::GET_PACKAGE_INFO_LONG => {
                let name: String = arg(&mut args)?;
                let (flags, user) = (arg(&mut args)?, UserId(arg(&mut args)?));
                Ok(svc.get_package_info_long(&name, flags, user).await?.into_value())
            }
            transactions::GET_INSTALLED_PACKAGES => {
                let (flags, user) = (arg(&mut args)?, UserId(arg(&mut args)?));
                Ok(svc.get_installed_packages(flags, user).await?.into_value())
            }
            transactions::GET_INSTALLED_PACKAGES_LONG => {
                let (flags, user) = (arg(&mut args)?, UserId(arg(&mut args)?));
                Ok(svc.get_installed_packages_long(flags, user).await?.into_value())
            }
            _ => Err(Failure::bare(FailureKind::UnsupportedOperation)),
        }
    }
}
