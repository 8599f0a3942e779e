//! End-to-end tests: typed proxy, transport, dispatcher, stub and table.

use std::sync::Arc;
use std::time::Duration;

use binder::ServiceManager;
use binder::Transport;
use binder::TransportError;
use binder::channel;
use binder::channel::ChannelConfig;
use binder::{InvalidHandle, LocalBinder, RemoteHandle};
use contract::ErrorKind;
use contract::FailureKind;
use contract::TransactionCode;

use pkgmgr::*;

fn table() -> PackageTable {
    PackageTable::new()
        .with_package(PackageInfo::new("com.example.app", 1000).with_version("1.0", 1))
        .with_package(PackageInfo::new("com.android.phone", 1001).system())
        .with_package(PackageInfo::new("com.example.work", 1_010_050))
}

fn local() -> Arc<dyn Transport> {
    LocalBinder::new(PackageManagerStub::new(table()).into_dispatcher()).into_transport()
}

/// A transport whose remote side has gone away.
struct Broken;

#[async_trait::async_trait]
impl Transport for Broken {
    async fn transact(&self, _code: TransactionCode, _request: &[u8]) -> binder::transport::Result<Vec<u8>> {
        Err(TransportError::DeadObject)
    }
}

#[tokio::test]
async fn test_packages_for_uid() -> anyhow::Result<()> {
    let transport = local();
    let pm = PackageManagerProxy::as_interface(RemoteHandle::new(&transport))?;
    assert_eq!(pm.get_packages_for_uid(1000).await?, ["com.example.app"]);
    Ok(())
}

#[tokio::test]
async fn test_package_info_both_widths() -> anyhow::Result<()> {
    let transport = local();
    let pm = PackageManagerProxy::as_interface_checked(RemoteHandle::new(&transport)).await?;

    let info = pm.get_package_info("com.example.app", 0).await?.expect("installed");
    assert_eq!(info.version_name.as_deref(), Some("1.0"));
    assert_eq!(info.uid, 1000);
    assert_eq!(pm.get_package_info_long("com.example.app", 0).await?, Some(info));
    assert_eq!(pm.get_package_info("com.missing", 0).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_installed_packages_system_only() -> anyhow::Result<()> {
    let transport = local();
    let pm = PackageManagerProxy::as_interface(RemoteHandle::new(&transport))?;

    assert_eq!(pm.get_installed_packages(0).await?.len(), 2);
    let system = pm.get_installed_packages_long(MATCH_SYSTEM_ONLY).await?;
    assert_eq!(system.len(), 1);
    assert_eq!(system[0].package_name, "com.android.phone");
    Ok(())
}

#[tokio::test]
async fn test_user_scope() -> anyhow::Result<()> {
    let transport = local();
    let pm = PackageManagerProxy::as_interface(RemoteHandle::new(&transport))?;
    assert_eq!(pm.user(), UserId::SYSTEM);

    let work = pm.for_user(UserId(10));
    let names: Vec<_> = work.get_installed_packages(0).await?.into_iter().map(|p| p.package_name).collect();
    assert_eq!(names, ["com.example.work"]);

    let err = pm.for_user(UserId(7)).get_installed_packages(0).await.unwrap_err();
    assert_eq!(err.failure().map(|f| f.kind), Some(FailureKind::IllegalArgument));
    Ok(())
}

#[tokio::test]
async fn test_transport_failure() -> anyhow::Result<()> {
    let broken: Arc<dyn Transport> = Arc::new(Broken);
    let pm = PackageManagerProxy::as_interface(RemoteHandle::new(&broken))?;
    let err = pm.get_packages_for_uid(1000).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TransportUnavailable));
    Ok(())
}

#[tokio::test]
async fn test_unbound_handle() {
    let err = PackageManagerProxy::as_interface(RemoteHandle::unbound()).unwrap_err();
    assert_eq!(err, binder::Error::InvalidHandle(InvalidHandle::Unbound));
}

#[tokio::test]
async fn test_unknown_code_rejected() {
    let transport = local();
    let err = transport.transact(contract::FIRST_CALL_TRANSACTION + 99, &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperation);
}

#[tokio::test]
async fn test_service_manager_lookup() -> anyhow::Result<()> {
    let sm = ServiceManager::new();
    sm.add_service("package", local());

    let pm = PackageManagerProxy::as_interface(sm.get_service("package"))?;
    assert_eq!(pm.get_packages_for_uid(1001).await?, ["com.android.phone"]);

    sm.remove_service("package");
    let err = pm.get_packages_for_uid(1001).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TransportUnavailable));
    assert_eq!(
        PackageManagerProxy::as_interface(sm.get_service("package")).unwrap_err(),
        binder::Error::InvalidHandle(InvalidHandle::Unbound)
    );
    Ok(())
}

#[tokio::test]
async fn test_over_channel_from_many_tasks() -> anyhow::Result<()> {
    let config = ChannelConfig::default().with_timeout(Duration::from_secs(5));
    let (client, endpoint) = channel::pair(config);
    let server = tokio::spawn(endpoint.serve(PackageManagerStub::new(table()).into_dispatcher()));

    let transport: Arc<dyn Transport> = Arc::new(client);
    let pm = PackageManagerProxy::as_interface_checked(RemoteHandle::new(&transport)).await?;

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let pm = pm.clone();
            tokio::spawn(async move { pm.get_packages_for_uid(if i % 2 == 0 { 1000 } else { 1001 }).await })
        })
        .collect();
    for (i, task) in tasks.into_iter().enumerate() {
        let expected = if i % 2 == 0 { "com.example.app" } else { "com.android.phone" };
        assert_eq!(task.await??, [expected]);
    }

    drop(pm);
    drop(transport);
    server.await?;
    Ok(())
}
