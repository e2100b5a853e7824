/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::{DeliveryChannel, PermissionState};
use crate::platform::runtime::PlatformRuntime;
use std::sync::Arc;
use tracing::*;

/// Picks the concrete delivery channel for one delivery attempt. Computed
/// fresh every time from platform capability and permission state; any
/// platform error means "this channel unavailable" and the chain falls
/// through, never propagating to the caller.
#[derive(Clone)]
pub struct ChannelSelector {
    platform: Arc<dyn PlatformRuntime>,
}

impl ChannelSelector {
    pub fn new(platform: Arc<dyn PlatformRuntime>) -> Self {
        ChannelSelector { platform }
    }

    pub async fn select_channel(&self) -> DeliveryChannel {
        if self.platform.is_native_shell() {
            match self
                .platform
                .request_local_notification_permission()
                .await
            {
                Ok(true) => return DeliveryChannel::NativeLocal,
                Ok(false) => {
                    debug!("Local notification permission denied, falling through")
                }
                Err(err) => warn!("Local notification permission request failed : {}", err),
            }
        }

        let permission = match self.platform.notification_permission().await {
            Ok(permission) => permission,
            Err(err) => {
                warn!("Notification permission query failed : {}", err);
                PermissionState::Denied
            }
        };

        if permission == PermissionState::Granted {
            if self.platform.supports_push() {
                return DeliveryChannel::WebPush;
            }
            return DeliveryChannel::BrowserNotification;
        }

        DeliveryChannel::SilentAlert
    }
}
