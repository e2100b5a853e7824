/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::{EntityKind, EntityStatus};
use chrono::{DateTime, Utc};

pub fn abs_diff_utc_as_sec(old: DateTime<Utc>, new: DateTime<Utc>) -> u64 {
    new.signed_duration_since(old).num_seconds().abs_diff(0)
}

/// Fingerprint for an already-reacted-to status transition, used to suppress
/// re-firing when two polls land close together.
pub fn reaction_fingerprint(
    entity_kind: &EntityKind,
    entity_id: &str,
    new_status: &EntityStatus,
) -> String {
    format!("{entity_kind}:{entity_id}:{new_status}")
}

/// Key under which the last-known snapshot for an entity is tracked.
pub fn entity_fingerprint(entity_kind: &EntityKind, entity_id: &str) -> String {
    format!("{entity_kind}:{entity_id}")
}
