/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::SessionUser;
use crate::platform::runtime::PlatformRuntime;
use crate::signals::{AppSignal, SignalBus};
use crate::storage::{
    commands::{get_device_token_record, set_device_token_record},
    store::DeviceStorage,
    types::DeviceTokenRecord,
};
use crate::tools::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::*;

/// Mirrors the device token to the external notification backend.
/// Fire-and-forget; the engine never waits on delivery guarantees.
#[async_trait]
pub trait TokenBackend: Send + Sync {
    async fn upload_token(&self, record: &DeviceTokenRecord) -> Result<(), AppError>;
}

/// Owns the device-token record. Push tokens are device-scoped, not
/// identity-scoped, so the record is recreated and re-uploaded whenever
/// the signed-in identity changes.
pub struct TokenLifecycleManager {
    platform: Arc<dyn PlatformRuntime>,
    storage: Arc<DeviceStorage>,
    backend: Arc<dyn TokenBackend>,
    signals: SignalBus,
}

impl TokenLifecycleManager {
    pub fn new(
        platform: Arc<dyn PlatformRuntime>,
        storage: Arc<DeviceStorage>,
        backend: Arc<dyn TokenBackend>,
        signals: SignalBus,
    ) -> Self {
        TokenLifecycleManager {
            platform,
            storage,
            backend,
            signals,
        }
    }

    /// Requests push permission and registers for a device token. Every
    /// failure is logged and swallowed; registration naturally retries on
    /// the next app launch.
    pub async fn register(&self, user: &SessionUser) {
        match self.platform.request_push_permission().await {
            Ok(true) => {}
            Ok(false) => {
                info!("Push permission not granted, skipping token registration");
                return;
            }
            Err(err) => {
                warn!("Push permission request failed : {}", err);
                return;
            }
        }

        match self.platform.register_push().await {
            Ok(token) => {
                let record = DeviceTokenRecord {
                    token,
                    user_id: user.user_id.clone(),
                    role: user.role,
                    organization_id: user.organization_id.clone(),
                    platform: self.platform.platform_kind(),
                    registered_at: Utc::now(),
                };
                self.persist_and_upload(record).await;
            }
            Err(err) => warn!("Push registration failed : {}", err),
        }
    }

    /// Rebinds the existing token to the current identity. Does not mint a
    /// new token; a stale identity binding would misroute notifications to
    /// the previous user of this device.
    pub async fn reassociate(&self, user: &SessionUser) {
        let stored = match get_device_token_record(&self.storage).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!("Error in get_device_token_record : {}", err);
                None
            }
        };

        match stored {
            Some(previous) => {
                let record = DeviceTokenRecord {
                    token: previous.token,
                    user_id: user.user_id.clone(),
                    role: user.role,
                    organization_id: user.organization_id.clone(),
                    platform: self.platform.platform_kind(),
                    registered_at: Utc::now(),
                };
                self.persist_and_upload(record).await;
            }
            None => self.register(user).await,
        }
        self.signals.broadcast(AppSignal::SessionIdentityChanged);
    }

    async fn persist_and_upload(&self, record: DeviceTokenRecord) {
        let _ = set_device_token_record(&self.storage, &record)
            .await
            .map_err(|err| error!("Error in set_device_token_record : {}", err));

        // The token stays valid locally even when the upload fails.
        let _ = self
            .backend
            .upload_token(&record)
            .await
            .map_err(|err| warn!("Token upload failed, retrying next launch : {}", err));

        info!(
            "[Token Registered] : user {} on {}",
            record.user_id.inner(),
            record.platform
        );
    }
}
