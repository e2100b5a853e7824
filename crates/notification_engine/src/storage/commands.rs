/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{keys::*, store::DeviceStorage, types::*};
use crate::common::types::EntityStatus;
use crate::tools::error::AppError;
use anyhow::Result;
use chrono::{DateTime, Utc};

fn encode<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)
        .map_err(|err| AppError::StorageWriteFailed(err.to_string()))?)
}

fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw).map_err(|err| AppError::StorageDecodeFailed(err.to_string()))?)
}

pub async fn set_session_record(storage: &DeviceStorage, record: &SessionRecord) -> Result<()> {
    storage
        .set_key(&session_record_key(), &encode(record)?)
        .await;
    Ok(())
}

pub async fn get_session_record(storage: &DeviceStorage) -> Result<Option<SessionRecord>> {
    match storage.get_key(&session_record_key()).await {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

/// Optimistic patch of the session status, so a reload picks up correct
/// permissions even if the network is briefly unavailable.
pub async fn patch_session_status(storage: &DeviceStorage, status: EntityStatus) -> Result<()> {
    if let Some(mut record) = get_session_record(storage).await? {
        record.user.status = status;
        set_session_record(storage, &record).await?;
    }
    Ok(())
}

pub async fn set_device_token_record(
    storage: &DeviceStorage,
    record: &DeviceTokenRecord,
) -> Result<()> {
    storage
        .set_key(&device_token_record_key(), &encode(record)?)
        .await;
    Ok(())
}

pub async fn get_device_token_record(
    storage: &DeviceStorage,
) -> Result<Option<DeviceTokenRecord>> {
    match storage.get_key(&device_token_record_key()).await {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_vault_entry(storage: &DeviceStorage, entry: &VaultEntry) -> Result<()> {
    storage.set_key(&vault_entry_key(), &encode(entry)?).await;
    Ok(())
}

pub async fn get_vault_entry(storage: &DeviceStorage) -> Result<Option<VaultEntry>> {
    match storage.get_key(&vault_entry_key()).await {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

pub async fn clear_vault_entry(storage: &DeviceStorage) {
    storage.delete_key(&vault_entry_key()).await;
}

/// Reaction cooldown markers expire implicitly through timestamp
/// comparison on read; there is no TTL mechanism in device storage.
pub async fn set_reaction_marker(
    storage: &DeviceStorage,
    fingerprint: &str,
    at: DateTime<Utc>,
) -> Result<()> {
    storage
        .set_key(&reaction_marker_key(fingerprint), &at.to_rfc3339())
        .await;
    Ok(())
}

pub async fn get_reaction_marker(
    storage: &DeviceStorage,
    fingerprint: &str,
) -> Result<Option<DateTime<Utc>>> {
    match storage.get_key(&reaction_marker_key(fingerprint)).await {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(&raw)
                .map_err(|err| AppError::StorageDecodeFailed(err.to_string()))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}
