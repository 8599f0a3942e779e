//! The `android.content.pm.IPackageManager` contract.
//!
//! Overloads that differ only by flag width are distinct operations with
//! distinct codes. Both widths are part of version 1 and stay.

use contract::Contract;
use contract::FailureKind;
use contract::Field;
use contract::Kind;
use contract::OperationDescriptor;
use contract::Param;
use contract::RecordSchema;
use parcel::DEFAULT_MAX_ITEMS;

pub const DESCRIPTOR: &str = "android.content.pm.IPackageManager";

pub mod transactions {
    use contract::TransactionCode;
    use contract::FIRST_CALL_TRANSACTION;

    pub const GET_PACKAGES_FOR_UID: TransactionCode = FIRST_CALL_TRANSACTION;
    pub const GET_PACKAGE_INFO: TransactionCode = FIRST_CALL_TRANSACTION + 1;
    pub const GET_PACKAGE_INFO_LONG: TransactionCode = FIRST_CALL_TRANSACTION + 2;
    pub const GET_INSTALLED_PACKAGES: TransactionCode = FIRST_CALL_TRANSACTION + 3;
    pub const GET_INSTALLED_PACKAGES_LONG: TransactionCode = FIRST_CALL_TRANSACTION + 4;
}

static STRING: Kind = Kind::String;

pub static PACKAGE_INFO: RecordSchema = RecordSchema::new("PackageInfo", &[
    Field::new("packageName", Kind::String),
    Field::new("versionName", Kind::String),
    Field::new("longVersionCode", Kind::Int64),
    Field::new("uid", Kind::Int32),
    Field::new("appFlags", Kind::Int32),
    Field::new("firstInstallTime", Kind::Int64),
    Field::new("lastUpdateTime", Kind::Int64),
]);

static PACKAGE_INFO_KIND: Kind = Kind::Record(&PACKAGE_INFO);

const QUERY_FAILURES: &[FailureKind] = &[FailureKind::Security, FailureKind::IllegalArgument];

pub static OPERATIONS: [OperationDescriptor; 5] = [
    OperationDescriptor {
        name: "getPackagesForUid",
        code: transactions::GET_PACKAGES_FOR_UID,
        params: &[Param::new("uid", Kind::Int32)],
        ret: Kind::Sequence { item: &STRING, max: DEFAULT_MAX_ITEMS },
        failures: &[FailureKind::Security],
    },
    OperationDescriptor {
        name: "getPackageInfo",
        code: transactions::GET_PACKAGE_INFO,
        params: &[
            Param::new("packageName", Kind::String),
            Param::new("flags", Kind::Int32),
            Param::new("userId", Kind::Int32),
        ],
        ret: Kind::Nullable(&PACKAGE_INFO_KIND),
        failures: QUERY_FAILURES,
    },
    OperationDescriptor {
        name: "getPackageInfoLong",
        code: transactions::GET_PACKAGE_INFO_LONG,
        params: &[
            Param::new("packageName", Kind::String),
            Param::new("flags", Kind::Int64),
            Param::new("userId", Kind::Int32),
        ],
        ret: Kind::Nullable(&PACKAGE_INFO_KIND),
        failures: QUERY_FAILURES,
    },
    OperationDescriptor {
        name: "getInstalledPackages",
        code: transactions::GET_INSTALLED_PACKAGES,
        params: &[Param::new("flags", Kind::Int32), Param::new("userId", Kind::Int32)],
        ret: Kind::Sequence { item: &PACKAGE_INFO_KIND, max: DEFAULT_MAX_ITEMS },
        failures: QUERY_FAILURES,
    },
    OperationDescriptor {
        name: "getInstalledPackagesLong",
        code: transactions::GET_INSTALLED_PACKAGES_LONG,
        params: &[Param::new("flags", Kind::Int64), Param::new("userId", Kind::Int32)],
        ret: Kind::Sequence { item: &PACKAGE_INFO_KIND, max: DEFAULT_MAX_ITEMS },
        failures: QUERY_FAILURES,
    },
];

pub static GET_PACKAGES_FOR_UID: &OperationDescriptor = &OPERATIONS[0];
pub static GET_PACKAGE_INFO: &OperationDescriptor = &OPERATIONS[1];
pub static GET_PACKAGE_INFO_LONG: &OperationDescriptor = &OPERATIONS[2];
pub static GET_INSTALLED_PACKAGES: &OperationDescriptor = &OPERATIONS[3];
pub static GET_INSTALLED_PACKAGES_LONG: &OperationDescriptor = &OPERATIONS[4];

pub static PACKAGE_MANAGER: Contract = Contract {
    descriptor: DESCRIPTOR,
    version: 1,
    operations: &OPERATIONS,
};

const _: () = assert!(PACKAGE_MANAGER.has_unique_codes() && PACKAGE_MANAGER.codes_in_range());
