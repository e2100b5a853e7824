/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

macro_rules! impl_getter {
    ($outer:ident, $inner:ty) => {
        impl $outer {
            pub fn inner(&self) -> $inner {
                self.0.clone()
            }
        }
    };
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct UserId(pub String);
impl_getter!(UserId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrganizationId(pub String);
impl_getter!(OrganizationId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DeviceToken(pub String);
impl_getter!(DeviceToken, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct AuthToken(pub String);
impl_getter!(AuthToken, String);

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DedupKey(pub String);
impl_getter!(DedupKey, String);

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Organization,
}

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Active,
    Inactive,
    PendingApproval,
    Deleted,
}

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Tenant,
}

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Android,
    Ios,
    Web,
    Headless,
}

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ComplaintUpdate,
    PaymentDue,
    HostelDeactivated,
    HostelReactivated,
    HostelApproved,
    Emergency,
    Test,
}

impl NotificationKind {
    /// Status notices carry side effects (refresh broadcast + delayed
    /// session reload) and use the wider dedup window.
    pub fn is_status_notice(&self) -> bool {
        matches!(
            self,
            NotificationKind::HostelDeactivated
                | NotificationKind::HostelReactivated
                | NotificationKind::HostelApproved
        )
    }
}

#[derive(Debug, Copy, Clone, Display, Eq, Hash, PartialEq)]
pub enum DeliveryChannel {
    NativeLocal,
    WebPush,
    BrowserNotification,
    SilentAlert,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// One status observation for a monitored entity. Immutable once captured;
/// only the previous and current snapshot per entity are retained.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct StatusSnapshot {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub status: EntityStatus,
    pub observed_at: DateTime<Utc>,
}

/// A notification request. Created by a caller, consumed immediately by the
/// router, then discarded - events are never queued or persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub subject_id: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, subject_id: &str) -> Self {
        NotificationEvent {
            kind,
            subject_id: subject_id.to_string(),
            detail: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_detail(kind: NotificationKind, subject_id: &str, detail: &str) -> Self {
        NotificationEvent {
            detail: Some(detail.to_string()),
            ..NotificationEvent::new(kind, subject_id)
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey(format!("{}:{}", self.kind, self.subject_id))
    }
}

/// The signed-in identity as the rest of the application sees it.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub organization_id: OrganizationId,
    pub status: EntityStatus,
}
