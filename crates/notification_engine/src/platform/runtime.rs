/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::{DeviceToken, PermissionState, PlatformKind};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("ChannelUnavailable : {0}")]
    ChannelUnavailable(String),
    #[error("PermissionDenied : {0}")]
    PermissionDenied(String),
    #[error("BridgeFailure : {0}")]
    BridgeFailure(String),
}

/// Single capability-query surface shared by the channel selector, the
/// token lifecycle manager and the credential vault, so platform checks
/// cannot drift between components.
#[async_trait]
pub trait PlatformRuntime: Send + Sync {
    fn platform_kind(&self) -> PlatformKind;

    /// Running inside the native app shell (as opposed to a plain browser).
    fn is_native_shell(&self) -> bool;

    /// A service-worker-backed push registration exists.
    fn supports_push(&self) -> bool;

    fn supports_biometric(&self) -> bool;

    /// Current browser-notification permission. A throwing permission API
    /// surfaces here as an error, which callers treat as "unavailable".
    async fn notification_permission(&self) -> Result<PermissionState, PlatformError>;

    /// Lazily prompts for local-notification permission inside the native
    /// shell. The prompt is user-driven and may pause indefinitely.
    async fn request_local_notification_permission(&self) -> Result<bool, PlatformError>;

    async fn request_push_permission(&self) -> Result<bool, PlatformError>;

    /// Platform push registration. Resolves once the asynchronous
    /// token-issued callback fires; this is the one genuinely event-driven
    /// boundary in the engine.
    async fn register_push(&self) -> Result<DeviceToken, PlatformError>;

    async fn show_native_notification(&self, title: &str, body: &str)
        -> Result<(), PlatformError>;

    async fn show_push_notification(&self, title: &str, body: &str) -> Result<(), PlatformError>;

    async fn show_browser_notification(
        &self,
        title: &str,
        body: &str,
    ) -> Result<(), PlatformError>;

    /// The universal fallback. Blocking, permissionless, cannot fail.
    fn show_blocking_alert(&self, title: &str, body: &str);

    /// Platform biometric ceremony; `Ok(true)` authorizes release of the
    /// stored credential blob.
    async fn biometric_ceremony(&self) -> Result<bool, PlatformError>;
}
