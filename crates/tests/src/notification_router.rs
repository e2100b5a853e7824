/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::{harness, FakePlatform};
use notification_engine::common::types::*;
use notification_engine::signals::{AppSignal, SessionCommand};
use std::time::Duration;

#[tokio::test]
async fn identical_events_within_dedup_window_deliver_once() {
    let harness = harness(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    });

    for _ in 0..4 {
        harness
            .router
            .notify(NotificationEvent::new(
                NotificationKind::PaymentDue,
                "tenant-7",
            ))
            .await;
    }

    assert_eq!(harness.platform.deliveries().len(), 1);
}

#[tokio::test]
async fn different_subjects_are_not_deduplicated() {
    let harness = harness(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    });

    harness
        .router
        .notify(NotificationEvent::new(
            NotificationKind::PaymentDue,
            "tenant-7",
        ))
        .await;
    harness
        .router
        .notify(NotificationEvent::new(
            NotificationKind::PaymentDue,
            "tenant-8",
        ))
        .await;

    assert_eq!(harness.platform.deliveries().len(), 2);
}

/// Native platform with local permission denied and no browser
/// Notification API: the user still sees a blocking alert with the
/// rendered title and body.
#[tokio::test]
async fn zero_permissions_surface_a_silent_alert() {
    let harness = harness(FakePlatform {
        native_shell: true,
        local_permission_granted: false,
        permission_query_fails: true,
        ..FakePlatform::default()
    });

    harness
        .router
        .notify(NotificationEvent::new(
            NotificationKind::HostelDeactivated,
            "org-1",
        ))
        .await;

    let deliveries = harness.platform.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].channel, DeliveryChannel::SilentAlert);
    assert_eq!(deliveries[0].title, "Hostel Deactivated");
    assert!(deliveries[0].body.contains("deactivated"));
}

#[tokio::test(start_paused = true)]
async fn status_notice_broadcasts_refresh_and_schedules_one_reload() {
    let mut harness = harness(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    });
    let mut signal_rx = harness.signals.subscribe();

    harness
        .router
        .notify(NotificationEvent::new(
            NotificationKind::HostelDeactivated,
            "org-1",
        ))
        .await;

    assert_eq!(signal_rx.recv().await.unwrap(), AppSignal::DataChanged);
    assert_eq!(
        harness.session_rx.recv().await,
        Some(SessionCommand::Reload)
    );

    // No second reload behind the first one.
    let extra =
        tokio::time::timeout(Duration::from_secs(10), harness.session_rx.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn torn_down_session_swallows_the_scheduled_reload() {
    let mut harness = harness(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    });

    harness
        .router
        .notify(NotificationEvent::new(
            NotificationKind::HostelReactivated,
            "org-1",
        ))
        .await;
    harness
        .session_alive
        .store(false, std::sync::atomic::Ordering::Relaxed);

    let reload =
        tokio::time::timeout(Duration::from_secs(10), harness.session_rx.recv()).await;
    assert!(reload.is_err());
}

#[tokio::test]
async fn general_notices_do_not_touch_the_session() {
    let mut harness = harness(FakePlatform {
        notification_permission: PermissionState::Granted,
        ..FakePlatform::default()
    });
    let mut signal_rx = harness.signals.subscribe();

    harness
        .router
        .notify(NotificationEvent::with_detail(
            NotificationKind::ComplaintUpdate,
            "complaint-3",
            "Plumber scheduled for tomorrow.",
        ))
        .await;

    assert_eq!(harness.platform.deliveries().len(), 1);
    assert!(signal_rx.try_recv().is_err());
    assert!(harness.session_rx.try_recv().is_err());
}
