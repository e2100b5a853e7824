/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::FakePlatform;
use notification_engine::channel::ChannelSelector;
use notification_engine::common::types::{DeliveryChannel, PermissionState};
use std::sync::Arc;

async fn selected(platform: FakePlatform) -> DeliveryChannel {
    ChannelSelector::new(Arc::new(platform)).select_channel().await
}

#[tokio::test]
async fn native_shell_with_permission_selects_native_local() {
    let channel = selected(FakePlatform {
        native_shell: true,
        local_permission_granted: true,
        ..FakePlatform::default()
    })
    .await;
    assert_eq!(channel, DeliveryChannel::NativeLocal);
}

#[tokio::test]
async fn denied_native_permission_falls_through_to_web() {
    let channel = selected(FakePlatform {
        native_shell: true,
        local_permission_granted: false,
        push_registration: true,
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    })
    .await;
    assert_eq!(channel, DeliveryChannel::WebPush);
}

#[tokio::test]
async fn granted_permission_without_push_selects_browser_notification() {
    let channel = selected(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    })
    .await;
    assert_eq!(channel, DeliveryChannel::BrowserNotification);
}

#[tokio::test]
async fn throwing_permission_api_bottoms_out_in_silent_alert() {
    let channel = selected(FakePlatform {
        permission_query_fails: true,
        ..FakePlatform::default()
    })
    .await;
    assert_eq!(channel, DeliveryChannel::SilentAlert);
}

#[tokio::test]
async fn no_permission_anywhere_selects_silent_alert() {
    let channel = selected(FakePlatform::default()).await;
    assert_eq!(channel, DeliveryChannel::SilentAlert);
}

/// The selector never picks a channel whose required permission was not
/// granted; SilentAlert is the only always-selectable channel.
#[tokio::test]
async fn ungranted_permission_never_yields_a_rich_channel() {
    for native_shell in [true, false] {
        for push_registration in [true, false] {
            let channel = selected(FakePlatform {
                native_shell,
                push_registration,
                local_permission_granted: false,
                notification_permission: PermissionState::Denied,
                ..FakePlatform::default()
            })
            .await;
            assert_eq!(channel, DeliveryChannel::SilentAlert);
        }
    }
}
