/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::{harness, FakePlatform};
use notification_engine::storage::types::LoginCredentials;
use notification_engine::vault::CredentialVault;

fn credentials() -> LoginCredentials {
    LoginCredentials {
        email: "a@b.com".to_string(),
        password: "x".to_string(),
    }
}

fn vault_with(platform: FakePlatform) -> (CredentialVault, crate::fakes::Harness) {
    let harness = harness(platform);
    let vault = CredentialVault::new(harness.storage.clone(), harness.platform.clone());
    (vault, harness)
}

#[tokio::test]
async fn correct_pin_releases_the_stored_credentials() {
    let (vault, _harness) = vault_with(FakePlatform::default());

    vault.set_pin("1234", &credentials()).await.unwrap();

    assert_eq!(
        vault.verify_pin("1234").await.unwrap(),
        Some(credentials())
    );
}

#[tokio::test]
async fn wrong_pin_is_a_negative_result_not_an_error() {
    let (vault, _harness) = vault_with(FakePlatform::default());

    vault.set_pin("1234", &credentials()).await.unwrap();

    assert_eq!(vault.verify_pin("9999").await.unwrap(), None);
}

#[tokio::test]
async fn verify_against_an_empty_vault_returns_none() {
    let (vault, _harness) = vault_with(FakePlatform::default());

    assert_eq!(vault.verify_pin("1234").await.unwrap(), None);
    assert!(!vault.is_set().await);
}

#[tokio::test]
async fn setting_a_new_pin_overwrites_the_previous_entry() {
    let (vault, _harness) = vault_with(FakePlatform::default());
    let updated = LoginCredentials {
        email: "a@b.com".to_string(),
        password: "rotated".to_string(),
    };

    vault.set_pin("1234", &credentials()).await.unwrap();
    vault.set_pin("5678", &updated).await.unwrap();

    assert_eq!(vault.verify_pin("1234").await.unwrap(), None);
    assert_eq!(vault.verify_pin("5678").await.unwrap(), Some(updated));
}

#[tokio::test]
async fn clear_empties_the_vault() {
    let (vault, _harness) = vault_with(FakePlatform::default());

    vault.set_pin("1234", &credentials()).await.unwrap();
    assert!(vault.is_set().await);

    vault.clear().await;

    assert!(!vault.is_set().await);
    assert_eq!(vault.verify_pin("1234").await.unwrap(), None);
}

#[tokio::test]
async fn successful_biometric_ceremony_releases_the_same_blob() {
    let (vault, _harness) = vault_with(FakePlatform {
        biometric: true,
        ..FakePlatform::default()
    });

    vault.set_pin("1234", &credentials()).await.unwrap();

    assert_eq!(
        vault.release_with_biometric().await.unwrap(),
        Some(credentials())
    );
}

#[tokio::test]
async fn unsupported_biometric_hardware_releases_nothing() {
    let (vault, _harness) = vault_with(FakePlatform::default());

    vault.set_pin("1234", &credentials()).await.unwrap();

    assert_eq!(vault.release_with_biometric().await.unwrap(), None);
}
