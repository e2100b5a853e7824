/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::runtime::{PlatformError, PlatformRuntime};
use crate::common::types::{DeviceToken, PermissionState, PlatformKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::*;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformConfig {
    pub native_shell: bool,
    pub push_registration: bool,
    pub biometric: bool,
    pub notification_permission_granted: bool,
}

/// Platform runtime for running the engine outside any app shell. Channel
/// operations log instead of raising OS surfaces; the blocking alert goes
/// to stdout so the user is informed even here.
pub struct HeadlessPlatform {
    platform_cfg: PlatformConfig,
}

impl HeadlessPlatform {
    pub fn new(platform_cfg: PlatformConfig) -> Self {
        HeadlessPlatform { platform_cfg }
    }
}

#[async_trait]
impl PlatformRuntime for HeadlessPlatform {
    fn platform_kind(&self) -> PlatformKind {
        PlatformKind::Headless
    }

    fn is_native_shell(&self) -> bool {
        self.platform_cfg.native_shell
    }

    fn supports_push(&self) -> bool {
        self.platform_cfg.push_registration
    }

    fn supports_biometric(&self) -> bool {
        self.platform_cfg.biometric
    }

    async fn notification_permission(&self) -> Result<PermissionState, PlatformError> {
        if self.platform_cfg.notification_permission_granted {
            Ok(PermissionState::Granted)
        } else {
            Ok(PermissionState::Denied)
        }
    }

    async fn request_local_notification_permission(&self) -> Result<bool, PlatformError> {
        Ok(self.platform_cfg.notification_permission_granted)
    }

    async fn request_push_permission(&self) -> Result<bool, PlatformError> {
        Ok(self.platform_cfg.push_registration)
    }

    async fn register_push(&self) -> Result<DeviceToken, PlatformError> {
        if !self.platform_cfg.push_registration {
            return Err(PlatformError::ChannelUnavailable(
                "No push registration available".to_string(),
            ));
        }
        // The token-issued callback arrives on its own schedule.
        sleep(Duration::from_millis(50)).await;
        Ok(DeviceToken(format!("headless-{}", Uuid::new_v4())))
    }

    async fn show_native_notification(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), PlatformError> {
        info!(tag = "[NATIVE NOTIFICATION]", title, body);
        Ok(())
    }

    async fn show_push_notification(&self, title: &str, body: &str) -> Result<(), PlatformError> {
        info!(tag = "[PUSH NOTIFICATION]", title, body);
        Ok(())
    }

    async fn show_browser_notification(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), PlatformError> {
        info!(tag = "[BROWSER NOTIFICATION]", title, body);
        Ok(())
    }

    fn show_blocking_alert(&self, title: &str, body: &str) {
        println!("!! {title} : {body}");
        warn!(tag = "[SILENT ALERT]", title, body);
    }

    async fn biometric_ceremony(&self) -> Result<bool, PlatformError> {
        if !self.platform_cfg.biometric {
            return Err(PlatformError::ChannelUnavailable(
                "No biometric hardware".to_string(),
            ));
        }
        Ok(true)
    }
}
