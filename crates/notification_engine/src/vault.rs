/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::platform::runtime::PlatformRuntime;
use crate::storage::{
    commands::{clear_vault_entry, get_vault_entry, set_vault_entry},
    store::DeviceStorage,
    types::{LoginCredentials, VaultEntry},
};
use crate::tools::error::AppError;
use anyhow::Result;
use std::sync::Arc;
use tracing::*;
use uuid::Uuid;

/// Single-slot quick-authentication vault: PIN-digest-gated replay of the
/// stored login credentials. The blob encoding is obfuscation, not
/// cryptographic confidentiality; a key-derivation + AEAD scheme can be
/// substituted here without changing the public contract.
pub struct CredentialVault {
    storage: Arc<DeviceStorage>,
    platform: Arc<dyn PlatformRuntime>,
}

impl CredentialVault {
    pub fn new(storage: Arc<DeviceStorage>, platform: Arc<dyn PlatformRuntime>) -> Self {
        CredentialVault { storage, platform }
    }

    /// Stores a fresh entry, overwriting any prior one.
    pub async fn set_pin(&self, pin: &str, credentials: &LoginCredentials) -> Result<()> {
        let salt = Uuid::new_v4().to_string();
        let pin_digest = pin_digest(pin, &salt);
        let credential_blob = encode_blob(credentials, &pin_digest)?;
        set_vault_entry(
            &self.storage,
            &VaultEntry {
                pin_digest,
                salt,
                credential_blob,
            },
        )
        .await?;
        info!("[Quick Auth Configured]");
        Ok(())
    }

    /// Exact digest match releases the credentials; anything else - wrong
    /// PIN, missing entry, corrupt blob - is a negative result, never an
    /// error surfaced to the login flow.
    pub async fn verify_pin(&self, pin: &str) -> Result<Option<LoginCredentials>> {
        let Some(entry) = get_vault_entry(&self.storage).await? else {
            return Ok(None);
        };
        if pin_digest(pin, &entry.salt) != entry.pin_digest {
            return Ok(None);
        }
        Ok(decode_blob(&entry.credential_blob, &entry.pin_digest))
    }

    pub async fn is_set(&self) -> bool {
        matches!(get_vault_entry(&self.storage).await, Ok(Some(_)))
    }

    pub async fn clear(&self) {
        clear_vault_entry(&self.storage).await;
        info!("[Quick Auth Cleared]");
    }

    /// Biometric registration is an upgrade over the same vault: a
    /// successful ceremony authorizes release of the same stored blob, it
    /// does not create a second secret store.
    pub async fn release_with_biometric(&self) -> Result<Option<LoginCredentials>> {
        if !self.platform.supports_biometric() {
            return Ok(None);
        }
        match self.platform.biometric_ceremony().await {
            Ok(true) => {
                let Some(entry) = get_vault_entry(&self.storage).await? else {
                    return Ok(None);
                };
                Ok(decode_blob(&entry.credential_blob, &entry.pin_digest))
            }
            Ok(false) => Ok(None),
            Err(err) => {
                warn!("Biometric ceremony failed : {}", err);
                Ok(None)
            }
        }
    }
}

fn pin_digest(pin: &str, salt: &str) -> String {
    sha256::digest(format!("{salt}:{pin}"))
}

fn keystream(pin_digest: &str) -> Vec<u8> {
    sha256::digest(format!("blob:{pin_digest}")).into_bytes()
}

fn encode_blob(credentials: &LoginCredentials, pin_digest: &str) -> Result<Vec<u8>> {
    let plain = serde_json::to_vec(credentials)
        .map_err(|err| AppError::InternalError(err.to_string()))?;
    Ok(xor_with(plain, &keystream(pin_digest)))
}

fn decode_blob(blob: &[u8], pin_digest: &str) -> Option<LoginCredentials> {
    let plain = xor_with(blob.to_vec(), &keystream(pin_digest));
    match serde_json::from_slice(&plain) {
        Ok(credentials) => Some(credentials),
        Err(err) => {
            warn!("Corrupt credential blob : {}", err);
            None
        }
    }
}

fn xor_with(mut bytes: Vec<u8>, key: &[u8]) -> Vec<u8> {
    for (index, byte) in bytes.iter_mut().enumerate() {
        *byte ^= key[index % key.len()];
    }
    bytes
}
