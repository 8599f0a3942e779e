//! Package-manager data types and flag constants.

use std::fmt;

use contract::Parcelable;
use contract::RecordFields;
use contract::Value;

/// Restricts queries to packages flagged `FLAG_SYSTEM`.
pub const MATCH_SYSTEM_ONLY: i64 = 0x0010_0000;

/// `appFlags` bit for packages on the system image.
pub const FLAG_SYSTEM: i32 = 1;

/// UIDs allotted to each user.
pub const PER_USER_RANGE: i32 = 100_000;

/// Widens 32-bit query flags without sign extension.
///
/// ```
/// assert_eq!(pkgmgr::widen_flags(-1), 0xffff_ffff);
/// ```
pub fn widen_flags(flags: i32) -> i64 {
    flags as u32 as i64
}

/// The user a query runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i32);

impl UserId {
    pub const SYSTEM: UserId = UserId(0);

    /// The user owning `uid`.
    pub fn of_uid(uid: i32) -> Self {
        UserId(uid.div_euclid(PER_USER_RANGE))
    }

    /// The uid of `app_id` within this user, or `None` if it does not fit.
    pub fn uid(self, app_id: i32) -> Option<i32> {
        self.0.checked_mul(PER_USER_RANGE)?.checked_add(app_id)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::SYSTEM
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// Installed-package metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageInfo {
    pub package_name: String,
    pub version_name: Option<String>,
    pub long_version_code: i64,
    pub uid: i32,
    pub app_flags: i32,
    pub first_install_time: i64,
    pub last_update_time: i64,
}

impl PackageInfo {
    pub fn new(package_name: impl Into<String>, uid: i32) -> Self {
        Self { package_name: package_name.into(), uid, ..Self::default() }
    }

    pub fn with_version(mut self, name: impl Into<String>, code: i64) -> Self {
        self.version_name = Some(name.into());
        self.long_version_code = code;
        self
    }

    pub fn system(mut self) -> Self {
        self.app_flags |= FLAG_SYSTEM;
        self
    }

    pub fn is_system(&self) -> bool {
        self.app_flags & FLAG_SYSTEM != 0
    }

    /// Returns true if the package passes the query `flags`.
    pub fn matches(&self, flags: i64) -> bool {
        flags & MATCH_SYSTEM_ONLY == 0 || self.is_system()
    }
}

impl Parcelable for PackageInfo {
    fn into_value(self) -> Value {
        Value::Record(vec![
            self.package_name.into_value(),
            self.version_name.into_value(),
            self.long_version_code.into_value(),
            self.uid.into_value(),
            self.app_flags.into_value(),
            self.first_install_time.into_value(),
            self.last_update_time.into_value(),
        ])
    }

    fn from_value(value: Value) -> contract::Result<Self> {
        let mut fields = RecordFields::new(value, "PackageInfo", 7)?;
        Ok(Self {
            package_name: fields.next()?,
            version_name: fields.next()?,
            long_version_code: fields.next()?,
            uid: fields.next()?,
            app_flags: fields.next()?,
            first_install_time: fields.next()?,
            last_update_time: fields.next()?,
        })
    }
}
