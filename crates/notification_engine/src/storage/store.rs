/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::*;

/// Device-local key-value storage. Each component owns one key-space
/// (session / token / vault / markers) and never mutates another
/// component's keys; only the session record is cross-read.
pub struct DeviceStorage {
    path: Option<PathBuf>,
    entries: RwLock<FxHashMap<String, String>>,
}

impl DeviceStorage {
    pub fn in_memory() -> Self {
        DeviceStorage {
            path: None,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Opens file-backed storage, loading any previously persisted entries.
    /// A missing or unreadable file starts the store empty.
    pub async fn open(path: PathBuf) -> Self {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<FxHashMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("Discarding corrupt device storage file : {}", err);
                    FxHashMap::default()
                }
            },
            Err(_) => FxHashMap::default(),
        };

        DeviceStorage {
            path: Some(path),
            entries: RwLock::new(entries),
        }
    }

    pub async fn get_key(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set_key(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.persist().await;
    }

    pub async fn delete_key(&self, key: &str) {
        self.entries.write().await.remove(key);
        self.persist().await;
    }

    /// Best-effort write-through. A failed write keeps the in-memory state
    /// authoritative for the rest of the session.
    async fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let serialized = {
            let entries = self.entries.read().await;
            serde_json::to_string(&*entries)
        };
        match serialized {
            Ok(serialized) => {
                let _ = tokio::fs::write(path, serialized)
                    .await
                    .map_err(|err| error!("Error in persisting device storage : {}", err));
            }
            Err(err) => error!("Error in serializing device storage : {}", err),
        }
    }
}
