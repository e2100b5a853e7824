/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::{harness, session_user, FakePlatform, FakeTokenBackend};
use notification_engine::common::types::*;
use notification_engine::signals::AppSignal;
use notification_engine::storage::commands::get_device_token_record;
use notification_engine::token::TokenLifecycleManager;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn push_platform() -> FakePlatform {
    FakePlatform {
        push_registration: true,
        ..FakePlatform::default()
    }
}

#[tokio::test]
async fn register_persists_and_uploads_identity_bound_record() {
    let harness = harness(push_platform());
    let backend = Arc::new(FakeTokenBackend::default());
    let manager = TokenLifecycleManager::new(
        harness.platform.clone(),
        harness.storage.clone(),
        backend.clone(),
        harness.signals.clone(),
    );

    manager.register(&session_user()).await;

    let stored = get_device_token_record(&harness.storage)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.token, DeviceToken("fake-device-token".to_string()));
    assert_eq!(stored.user_id, UserId("user-1".to_string()));

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].organization_id, OrganizationId("org-1".to_string()));
}

#[tokio::test]
async fn reassociate_rebinds_the_existing_token_to_the_new_identity() {
    let harness = harness(push_platform());
    let backend = Arc::new(FakeTokenBackend::default());
    let manager = TokenLifecycleManager::new(
        harness.platform.clone(),
        harness.storage.clone(),
        backend.clone(),
        harness.signals.clone(),
    );

    manager.register(&session_user()).await;
    let next_user = SessionUser {
        user_id: UserId("user-2".to_string()),
        role: Role::Manager,
        ..session_user()
    };
    let mut signal_rx = harness.signals.subscribe();
    manager.reassociate(&next_user).await;

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 2);
    // Same device token, new identity binding.
    assert_eq!(uploads[1].token, uploads[0].token);
    assert_eq!(uploads[1].user_id, UserId("user-2".to_string()));
    assert_eq!(uploads[1].role, Role::Manager);
    assert_eq!(
        signal_rx.try_recv().unwrap(),
        AppSignal::SessionIdentityChanged
    );
}

#[tokio::test]
async fn reassociate_without_a_stored_token_registers_fresh() {
    let harness = harness(push_platform());
    let backend = Arc::new(FakeTokenBackend::default());
    let manager = TokenLifecycleManager::new(
        harness.platform.clone(),
        harness.storage.clone(),
        backend.clone(),
        harness.signals.clone(),
    );

    let mut signal_rx = harness.signals.subscribe();
    manager.reassociate(&session_user()).await;

    assert_eq!(backend.uploads().len(), 1);
    assert!(get_device_token_record(&harness.storage)
        .await
        .unwrap()
        .is_some());
    // The identity change is announced even when no prior token existed.
    assert_eq!(
        signal_rx.try_recv().unwrap(),
        AppSignal::SessionIdentityChanged
    );
}

#[tokio::test]
async fn upload_failure_is_swallowed_and_the_token_survives_locally() {
    let harness = harness(push_platform());
    let backend = Arc::new(FakeTokenBackend::default());
    backend.fail_uploads.store(true, Ordering::SeqCst);
    let manager = TokenLifecycleManager::new(
        harness.platform.clone(),
        harness.storage.clone(),
        backend.clone(),
        harness.signals.clone(),
    );

    manager.register(&session_user()).await;

    assert!(backend.uploads().is_empty());
    // Still valid for the next launch, when registration retries.
    assert!(get_device_token_record(&harness.storage)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn no_push_permission_means_no_registration() {
    let harness = harness(FakePlatform::default());
    let backend = Arc::new(FakeTokenBackend::default());
    let manager = TokenLifecycleManager::new(
        harness.platform.clone(),
        harness.storage.clone(),
        backend.clone(),
        harness.signals.clone(),
    );

    manager.register(&session_user()).await;

    assert!(backend.uploads().is_empty());
    assert!(get_device_token_record(&harness.storage)
        .await
        .unwrap()
        .is_none());
}
