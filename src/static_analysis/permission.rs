//! Dangerous permission table.

/// Permissions considered sensitive enough to raise the risk of a package.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum DangerousPermission {
    SendSms,
    ReadSms,
    ReceiveSms,
    CallPhone,
    RecordAudio,
    ReadContacts,
    WriteContacts,
    ReadCallLog,
    WriteCallLog,
    ReadExternalStorage,
    WriteExternalStorage,
    ManageExternalStorage,
    AccessFineLocation,
    AccessCoarseLocation,
    SystemAlertWindow,
    RequestInstallPackages,
    PackageUsageStats,
    Camera,
}

/// Capabilities the scorer looks for explicitly.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Capability {
    /// Drawing on top of other applications.
    DrawOverOtherApps,
    /// Asking the user to install other packages.
    RequestInstallPackages,
}

impl Capability {
    /// Substring of the permission identifier granting the capability.
    pub fn marker(self) -> &'static str {
        match self {
            Self::DrawOverOtherApps => "SYSTEM_ALERT_WINDOW",
            Self::RequestInstallPackages => "REQUEST_INSTALL_PACKAGES",
        }
    }
}

impl DangerousPermission {
    /// Every dangerous permission, in table order.
    pub const ALL: [Self; 18] = [
        Self::SendSms,
        Self::ReadSms,
        Self::ReceiveSms,
        Self::CallPhone,
        Self::RecordAudio,
        Self::ReadContacts,
        Self::WriteContacts,
        Self::ReadCallLog,
        Self::WriteCallLog,
        Self::ReadExternalStorage,
        Self::WriteExternalStorage,
        Self::ManageExternalStorage,
        Self::AccessFineLocation,
        Self::AccessCoarseLocation,
        Self::SystemAlertWindow,
        Self::RequestInstallPackages,
        Self::PackageUsageStats,
        Self::Camera,
    ];

    /// Gets the permission identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendSms => "android.permission.SEND_SMS",
            Self::ReadSms => "android.permission.READ_SMS",
            Self::ReceiveSms => "android.permission.RECEIVE_SMS",
            Self::CallPhone => "android.permission.CALL_PHONE",
            Self::RecordAudio => "android.permission.RECORD_AUDIO",
            Self::ReadContacts => "android.permission.READ_CONTACTS",
            Self::WriteContacts => "android.permission.WRITE_CONTACTS",
            Self::ReadCallLog => "android.permission.READ_CALL_LOG",
            Self::WriteCallLog => "android.permission.WRITE_CALL_LOG",
            Self::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Self::WriteExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
            Self::ManageExternalStorage => "android.permission.MANAGE_EXTERNAL_STORAGE",
            Self::AccessFineLocation => "android.permission.ACCESS_FINE_LOCATION",
            Self::AccessCoarseLocation => "android.permission.ACCESS_COARSE_LOCATION",
            Self::SystemAlertWindow => "android.permission.SYSTEM_ALERT_WINDOW",
            Self::RequestInstallPackages => "android.permission.REQUEST_INSTALL_PACKAGES",
            Self::PackageUsageStats => "android.permission.PACKAGE_USAGE_STATS",
            Self::Camera => "android.permission.CAMERA",
        }
    }

    /// Finds the table entry the given permission starts with.
    ///
    /// The match is a case sensitive prefix match, so suffixed variants of an identifier are
    /// still caught.
    pub fn matching(permission: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| permission.starts_with(p.as_str()))
    }
}

/// Checks if the permission is in the dangerous table.
pub fn is_dangerous(permission: &str) -> bool {
    DangerousPermission::matching(permission).is_some()
}
