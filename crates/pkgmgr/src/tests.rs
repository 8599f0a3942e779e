use contract::Parcelable;
use contract::Value;

use crate::interface::*;
use crate::*;

fn sample() -> PackageTable {
    PackageTable::new()
        .with_package(PackageInfo::new("com.example.app", 10_001).with_version("1.0", 7))
        .with_package(PackageInfo::new("com.android.settings", 1000).system())
        .with_package(PackageInfo::new("com.android.shell", 1000).system())
        .with_package(PackageInfo::new("com.example.app", 1_010_001))
}

#[test]
fn test_contract_is_valid() {
    assert!(PACKAGE_MANAGER.validate().is_ok());
    assert_eq!(PACKAGE_MANAGER.descriptor, "android.content.pm.IPackageManager");
    assert_eq!(GET_PACKAGES_FOR_UID.code, 1);
    assert_eq!(PACKAGE_MANAGER.lookup(transactions::GET_INSTALLED_PACKAGES_LONG), Some(GET_INSTALLED_PACKAGES_LONG));
}

#[test]
fn test_flag_width_overloads_are_distinct() {
    assert_ne!(GET_PACKAGE_INFO.code, GET_PACKAGE_INFO_LONG.code);
    assert_eq!(GET_PACKAGE_INFO.params[1].kind, contract::Kind::Int32);
    assert_eq!(GET_PACKAGE_INFO_LONG.params[1].kind, contract::Kind::Int64);
}

#[test]
fn test_widen_flags_does_not_sign_extend() {
    assert_eq!(widen_flags(MATCH_SYSTEM_ONLY as i32), MATCH_SYSTEM_ONLY);
    assert_eq!(widen_flags(i32::MIN), 0x8000_0000);
}

#[test]
fn test_user_of_uid() {
    assert_eq!(UserId::of_uid(1000), UserId::SYSTEM);
    assert_eq!(UserId::of_uid(1_010_001), UserId(10));
    assert_eq!(UserId(10).uid(10_001), Some(1_010_001));
    assert_eq!(UserId(i32::MAX).uid(10_001), None);
    assert_eq!(UserId(21_474).uid(i32::MAX), None);
}

#[test]
fn test_package_info_value() -> anyhow::Result<()> {
    let info = PackageInfo::new("com.example.app", 10_001).with_version("2.1", 21).system();
    let value = info.clone().into_value();
    let Value::Record(fields) = &value else { panic!("not a record") };
    assert_eq!(fields.len(), PACKAGE_INFO.fields.len());
    assert_eq!(PackageInfo::from_value(value)?, info);

    let unnamed = PackageInfo::new("x", 1);
    assert_eq!(PackageInfo::from_value(unnamed.clone().into_value())?.version_name, None);
    Ok(())
}

#[tokio::test]
async fn test_table_packages_for_uid() -> anyhow::Result<()> {
    let table = sample();
    assert_eq!(table.get_packages_for_uid(1000).await?, ["com.android.settings", "com.android.shell"]);
    assert_eq!(table.get_packages_for_uid(1_010_001).await?, ["com.example.app"]);
    assert!(table.get_packages_for_uid(4242).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_table_system_only_filter() -> anyhow::Result<()> {
    let table = sample();
    assert_eq!(table.get_installed_packages_long(0, UserId::SYSTEM).await?.len(), 3);
    assert_eq!(table.get_installed_packages_long(MATCH_SYSTEM_ONLY, UserId::SYSTEM).await?.len(), 2);
    assert_eq!(table.get_package_info("com.example.app", MATCH_SYSTEM_ONLY as i32, UserId::SYSTEM).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_table_files_package_under_uid_owner() -> anyhow::Result<()> {
    let table = PackageTable::new().with_package(PackageInfo::new("com.example.work", 1_010_050));
    assert_eq!(table.get_packages_for_uid(1_010_050).await?, ["com.example.work"]);
    assert_eq!(table.get_installed_packages_long(0, UserId(10)).await?.len(), 1);
    let err = table.get_installed_packages_long(0, UserId::SYSTEM).await.unwrap_err();
    assert_eq!(err.kind, contract::FailureKind::IllegalArgument);
    Ok(())
}

#[tokio::test]
async fn test_table_unknown_user() {
    let err = sample().get_installed_packages(0, UserId(99)).await.unwrap_err();
    assert_eq!(err.kind, contract::FailureKind::IllegalArgument);
}

#[tokio::test]
async fn test_table_uninstall() -> anyhow::Result<()> {
    let table = sample();
    assert!(table.uninstall(UserId::SYSTEM, "com.example.app").is_some());
    assert_eq!(table.get_package_info_long("com.example.app", 0, UserId::SYSTEM).await?, None);
    assert!(table.uninstall(UserId(5), "com.example.app").is_none());
    Ok(())
}
