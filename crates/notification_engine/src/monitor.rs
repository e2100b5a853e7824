/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::common::utils::{abs_diff_utc_as_sec, entity_fingerprint, reaction_fingerprint};
use crate::router::NotificationRouter;
use crate::signals::LivenessFlag;
use crate::storage::{
    commands::{get_reaction_marker, patch_session_status, set_reaction_marker},
    store::DeviceStorage,
};
use crate::tools::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::{atomic::Ordering, Arc, Mutex};
use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};
use tracing::*;

/// Authoritative status reads. Kept behind a trait so the polling loop can
/// later be swapped for a server-push subscription without touching the
/// transition and reaction logic.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn organization_status(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<EntityStatus>, AppError>;

    async fn user_status(&self, user_id: &UserId) -> Result<Option<EntityStatus>, AppError>;
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub organization_poll_interval_secs: u64,
    pub user_poll_interval_secs: u64,
    pub reaction_cooldown_secs: u64,
}

/// Reaction to a qualifying transition. Fired at most once per transition
/// observation thanks to the cooldown fingerprint.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reaction {
    OrganizationDeactivated,
    OrganizationReactivated,
    OrganizationApproved,
    UserApproved,
}

/// Compares a fresh snapshot against the last-known one. The very first
/// snapshot per entity seeds the baseline and never fires; a repeated
/// status never fires; only the qualifying transitions do.
pub fn evaluate_transition(
    previous: Option<&StatusSnapshot>,
    current: &StatusSnapshot,
) -> Option<Reaction> {
    let previous = previous?;
    if previous.status == current.status {
        return None;
    }
    match (current.entity_kind, previous.status, current.status) {
        (EntityKind::Organization, EntityStatus::Active, EntityStatus::Inactive) => {
            Some(Reaction::OrganizationDeactivated)
        }
        (EntityKind::Organization, EntityStatus::Inactive, EntityStatus::Active) => {
            Some(Reaction::OrganizationReactivated)
        }
        (EntityKind::Organization, EntityStatus::PendingApproval, EntityStatus::Active) => {
            Some(Reaction::OrganizationApproved)
        }
        (EntityKind::User, EntityStatus::PendingApproval, EntityStatus::Active) => {
            Some(Reaction::UserApproved)
        }
        // Transitions toward deleted/not-found belong to the route guard.
        _ => None,
    }
}

/// Polls user and organization status on independent timers and reacts
/// exactly once per qualifying transition. Owns its snapshot registry;
/// constructed at session start, torn down at session end.
pub struct StatusMonitor {
    source: Arc<dyn StatusSource>,
    router: Arc<NotificationRouter>,
    storage: Arc<DeviceStorage>,
    session_alive: LivenessFlag,
    snapshots: DashMap<String, StatusSnapshot>,
    monitor_cfg: MonitorConfig,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl StatusMonitor {
    pub fn new(
        source: Arc<dyn StatusSource>,
        router: Arc<NotificationRouter>,
        storage: Arc<DeviceStorage>,
        session_alive: LivenessFlag,
        monitor_cfg: MonitorConfig,
    ) -> Self {
        StatusMonitor {
            source,
            router,
            storage,
            session_alive,
            snapshots: DashMap::new(),
            monitor_cfg,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Cancels both timers synchronously. Any in-flight fetch that resolves
    /// afterwards is inert: every reaction site re-checks the liveness flag
    /// after its await points.
    pub fn stop_monitoring(&self) {
        self.session_alive.store(false, Ordering::Relaxed);
        let mut handles = self
            .handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in handles.drain(..) {
            handle.abort();
        }
        info!("[Status Monitoring Stopped]");
    }

    /// One organization poll tick: read remote status, compare to
    /// baseline, fire reaction - strictly in that order.
    pub async fn poll_organization(&self, organization_id: &OrganizationId) {
        let observed = self.source.organization_status(organization_id).await;
        self.observe(EntityKind::Organization, &organization_id.inner(), observed)
            .await;
    }

    /// One user poll tick.
    pub async fn poll_user(&self, user_id: &UserId) {
        let observed = self.source.user_status(user_id).await;
        self.observe(EntityKind::User, &user_id.inner(), observed)
            .await;
    }

    async fn observe(
        &self,
        entity_kind: EntityKind,
        entity_id: &str,
        observed: Result<Option<EntityStatus>, AppError>,
    ) {
        // A failed fetch is "no observation this tick": the last-known
        // snapshot stays untouched and no transition is inferred.
        let status = match observed {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!("Entity {} not found, leaving to route guard", entity_id);
                return;
            }
            Err(err) => {
                debug!("Status poll failed, retrying next cycle : {}", err);
                return;
            }
        };

        // An in-flight fetch may resolve after teardown.
        if !self.session_alive.load(Ordering::Relaxed) {
            debug!("Session torn down, discarding status observation");
            return;
        }

        let current = StatusSnapshot {
            entity_kind,
            entity_id: entity_id.to_string(),
            status,
            observed_at: Utc::now(),
        };

        let key = entity_fingerprint(&entity_kind, entity_id);
        let reaction = {
            let previous = self.snapshots.get(&key);
            evaluate_transition(previous.as_deref(), &current)
        };
        self.snapshots.insert(key, current);

        if let Some(reaction) = reaction {
            self.react(reaction, entity_kind, entity_id, &status).await;
        }
    }

    async fn react(
        &self,
        reaction: Reaction,
        entity_kind: EntityKind,
        entity_id: &str,
        new_status: &EntityStatus,
    ) {
        let fingerprint = reaction_fingerprint(&entity_kind, entity_id, new_status);
        if self.within_cooldown(&fingerprint).await {
            debug!("Reaction suppressed by cooldown : {}", fingerprint);
            return;
        }
        let _ = set_reaction_marker(&self.storage, &fingerprint, Utc::now())
            .await
            .map_err(|err| error!("Error in set_reaction_marker : {}", err));

        info!("[Qualifying Transition] : {:?} for {}", reaction, entity_id);

        match reaction {
            Reaction::OrganizationDeactivated => {
                self.router
                    .notify(NotificationEvent::new(
                        NotificationKind::HostelDeactivated,
                        entity_id,
                    ))
                    .await;
            }
            Reaction::OrganizationReactivated => {
                self.router
                    .notify(NotificationEvent::new(
                        NotificationKind::HostelReactivated,
                        entity_id,
                    ))
                    .await;
            }
            Reaction::OrganizationApproved => {
                self.router
                    .notify(NotificationEvent::new(
                        NotificationKind::HostelApproved,
                        entity_id,
                    ))
                    .await;
            }
            Reaction::UserApproved => {
                // Patch the local session before the reload fires, so a
                // reload picks up correct permissions even offline.
                let _ = patch_session_status(&self.storage, EntityStatus::Active)
                    .await
                    .map_err(|err| error!("Error in patch_session_status : {}", err));
                self.router
                    .notify(NotificationEvent::new(
                        NotificationKind::HostelApproved,
                        entity_id,
                    ))
                    .await;
            }
        }
    }

    async fn within_cooldown(&self, fingerprint: &str) -> bool {
        match get_reaction_marker(&self.storage, fingerprint).await {
            Ok(Some(reacted_at)) => {
                abs_diff_utc_as_sec(reacted_at, Utc::now())
                    < self.monitor_cfg.reaction_cooldown_secs
            }
            Ok(None) => false,
            Err(err) => {
                warn!("Error in get_reaction_marker : {}", err);
                false
            }
        }
    }
}

/// Starts both polling loops for the signed-in user. Timers re-arm from
/// within the completion handler, so slow responses never pile up
/// overlapping ticks for the same entity.
pub fn start_monitoring(monitor: Arc<StatusMonitor>, user: SessionUser) {
    monitor.session_alive.store(true, Ordering::Relaxed);

    let organization_handle = tokio::spawn(organization_status_looper(
        monitor.clone(),
        user.organization_id.clone(),
    ));
    let user_handle = tokio::spawn(user_status_looper(monitor.clone(), user.user_id.clone()));

    let mut handles = monitor
        .handles
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    handles.push(organization_handle);
    handles.push(user_handle);

    info!(
        "[Status Monitoring Started] : user {} of organization {}",
        user.user_id.inner(),
        user.organization_id.inner()
    );
}

async fn organization_status_looper(monitor: Arc<StatusMonitor>, organization_id: OrganizationId) {
    let delay = Duration::from_secs(monitor.monitor_cfg.organization_poll_interval_secs);
    loop {
        if !monitor.session_alive.load(Ordering::Relaxed) {
            break;
        }
        monitor.poll_organization(&organization_id).await;
        sleep(delay).await;
    }
}

async fn user_status_looper(monitor: Arc<StatusMonitor>, user_id: UserId) {
    let delay = Duration::from_secs(monitor.monitor_cfg.user_poll_interval_secs);
    loop {
        if !monitor.session_alive.load(Ordering::Relaxed) {
            break;
        }
        monitor.poll_user(&user_id).await;
        sleep(delay).await;
    }
}
