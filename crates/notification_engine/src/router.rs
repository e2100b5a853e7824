/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::channel::ChannelSelector;
use crate::common::types::*;
use crate::common::utils::abs_diff_utc_as_sec;
use crate::platform::runtime::PlatformRuntime;
use crate::signals::{AppSignal, LivenessFlag, SessionCommand, SignalBus};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{atomic::Ordering, Arc};
use std::time::Duration;
use tokio::time::sleep;
use tracing::*;

/// Dedup window for general notices.
pub const GENERAL_DEDUP_WINDOW_SEC: u64 = 5;
/// Dedup window for approval/status notices.
pub const STATUS_DEDUP_WINDOW_SEC: u64 = 10;

/// Delay before the session reload scheduled by a status notice, so the
/// user can read the notification before the screen changes under them.
pub fn reload_delay(kind: &NotificationKind) -> Option<Duration> {
    match kind {
        NotificationKind::HostelDeactivated | NotificationKind::HostelApproved => {
            Some(Duration::from_secs(3))
        }
        NotificationKind::HostelReactivated => Some(Duration::from_secs(2)),
        _ => None,
    }
}

/// Best-effort notification delivery with duplicate suppression. Owns its
/// recent-delivery registry; constructed at session start, dropped at
/// session end.
pub struct NotificationRouter {
    platform: Arc<dyn PlatformRuntime>,
    selector: ChannelSelector,
    signals: SignalBus,
    session_alive: LivenessFlag,
    recent_deliveries: DashMap<DedupKey, DateTime<Utc>>,
}

impl NotificationRouter {
    pub fn new(
        platform: Arc<dyn PlatformRuntime>,
        signals: SignalBus,
        session_alive: LivenessFlag,
    ) -> Self {
        NotificationRouter {
            selector: ChannelSelector::new(platform.clone()),
            platform,
            signals,
            session_alive,
            recent_deliveries: DashMap::new(),
        }
    }

    /// Fire-and-forget. Either delivers on exactly one channel or is a
    /// silent no-op inside the dedup window; nothing propagates upward.
    pub async fn notify(&self, event: NotificationEvent) {
        let dedup_key = event.dedup_key();
        let window = if event.kind.is_status_notice() {
            STATUS_DEDUP_WINDOW_SEC
        } else {
            GENERAL_DEDUP_WINDOW_SEC
        };

        let now = Utc::now();
        if let Some(delivered_at) = self.recent_deliveries.get(&dedup_key) {
            if abs_diff_utc_as_sec(*delivered_at, now) < window {
                debug!(
                    "Suppressing duplicate notification within dedup window : {}",
                    dedup_key.inner()
                );
                return;
            }
        }
        self.recent_deliveries.insert(dedup_key, now);
        self.recent_deliveries
            .retain(|_, delivered_at| abs_diff_utc_as_sec(*delivered_at, now) < window.max(60));

        let (title, body) = render_message(&event);
        let channel = self.selector.select_channel().await;
        self.deliver(&channel, &title, &body).await;

        if event.kind.is_status_notice() {
            self.signals.broadcast(AppSignal::DataChanged);
            if let Some(delay) = reload_delay(&event.kind) {
                self.schedule_reload(delay);
            }
        }
    }

    /// One attempt on the selected channel. SilentAlert is the deliberate
    /// last resort chosen by the selector, not a router-level catch-all;
    /// retrying on another channel would double-notify the user.
    async fn deliver(&self, channel: &DeliveryChannel, title: &str, body: &str) {
        let outcome = match channel {
            DeliveryChannel::NativeLocal => {
                self.platform.show_native_notification(title, body).await
            }
            DeliveryChannel::WebPush => self.platform.show_push_notification(title, body).await,
            DeliveryChannel::BrowserNotification => {
                self.platform.show_browser_notification(title, body).await
            }
            DeliveryChannel::SilentAlert => {
                self.platform.show_blocking_alert(title, body);
                Ok(())
            }
        };
        match outcome {
            Ok(()) => info!("[Notification Delivered] : {} via {}", title, channel),
            Err(err) => warn!("[Delivery Failed] : {} via {} : {}", title, channel, err),
        }
    }

    fn schedule_reload(&self, delay: Duration) {
        let signals = self.signals.clone();
        let session_alive = self.session_alive.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            if !session_alive.load(Ordering::Relaxed) {
                debug!("Session torn down before scheduled reload, dropping");
                return;
            }
            signals.request(SessionCommand::Reload).await;
        });
    }
}

/// Per-kind message templates.
pub fn render_message(event: &NotificationEvent) -> (String, String) {
    let detail = event.detail.clone();
    match event.kind {
        NotificationKind::ComplaintUpdate => (
            "Complaint Update".to_string(),
            detail.unwrap_or_else(|| "There is an update on your complaint.".to_string()),
        ),
        NotificationKind::PaymentDue => (
            "Rent Payment Due".to_string(),
            detail.unwrap_or_else(|| "Your rent payment is due. Please pay soon.".to_string()),
        ),
        NotificationKind::HostelDeactivated => (
            "Hostel Deactivated".to_string(),
            "Your hostel has been deactivated. Access is now restricted.".to_string(),
        ),
        NotificationKind::HostelReactivated => (
            "Hostel Reactivated".to_string(),
            "Your hostel is active again. Welcome back!".to_string(),
        ),
        NotificationKind::HostelApproved => (
            "Registration Approved".to_string(),
            "Your registration has been approved. Your dashboard will reload shortly.".to_string(),
        ),
        NotificationKind::Emergency => (
            "Emergency Alert".to_string(),
            detail.unwrap_or_else(|| "An emergency has been reported at your hostel.".to_string()),
        ),
        NotificationKind::Test => (
            "Test Notification".to_string(),
            "Notifications are working on this device.".to_string(),
        ),
    }
}
