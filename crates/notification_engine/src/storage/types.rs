/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The locally persisted signed-in session.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct SessionRecord {
    pub user: SessionUser,
    pub auth_token: AuthToken,
}

/// Push token bound to the identity it is addressed to. Recreated, not
/// mutated, whenever the signed-in identity changes.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DeviceTokenRecord {
    pub token: DeviceToken,
    pub user_id: UserId,
    pub role: Role,
    pub organization_id: OrganizationId,
    pub platform: PlatformKind,
    pub registered_at: DateTime<Utc>,
}

/// Login credentials replayed by quick authentication.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Single-slot quick-auth vault entry. The PIN is stored only as a salted
/// digest; the credential blob is obfuscated, not confidential.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct VaultEntry {
    pub pin_digest: String,
    pub salt: String,
    pub credential_blob: Vec<u8>,
}
