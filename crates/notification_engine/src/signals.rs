/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use std::sync::{atomic::AtomicBool, Arc};
use tokio::sync::{broadcast, mpsc};
use tracing::*;

/// Session-wide liveness flag. Flipped synchronously on teardown so that
/// late-resolving async work cannot fire a reaction into a dead session.
pub type LivenessFlag = Arc<AtomicBool>;

/// Application-wide broadcast, consumable by any screen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppSignal {
    DataChanged,
    SessionIdentityChanged,
}

/// Commands toward the session host (the login/logout lifecycle owner).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionCommand {
    Reload,
}

#[derive(Clone)]
pub struct SignalBus {
    signal_tx: broadcast::Sender<AppSignal>,
    session_tx: mpsc::Sender<SessionCommand>,
}

impl SignalBus {
    pub fn new(session_tx: mpsc::Sender<SessionCommand>) -> Self {
        let (signal_tx, _) = broadcast::channel(32);
        SignalBus {
            signal_tx,
            session_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppSignal> {
        self.signal_tx.subscribe()
    }

    /// Best-effort broadcast; no subscribers is not an error.
    pub fn broadcast(&self, signal: AppSignal) {
        let _ = self
            .signal_tx
            .send(signal)
            .map_err(|err| debug!("No broadcast subscribers : {}", err));
    }

    pub async fn request(&self, command: SessionCommand) {
        let _ = self
            .session_tx
            .send(command)
            .await
            .map_err(|err| error!("Session command channel closed : {}", err));
    }
}
