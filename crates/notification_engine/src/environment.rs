/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use crate::monitor::MonitorConfig;
use crate::platform::headless::{HeadlessPlatform, PlatformConfig};
use crate::platform::runtime::PlatformRuntime;
use crate::storage::store::DeviceStorage;
use crate::tools::logger::LoggerConfig;
use reqwest::Url;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_file: String,
    pub logger_cfg: LoggerConfig,
    pub platform_cfg: PlatformConfig,
    pub monitor_cfg: MonitorConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<DeviceStorage>,
    pub platform: Arc<dyn PlatformRuntime>,
    pub api_base_url: Url,
    pub monitor_cfg: MonitorConfig,
}

impl AppState {
    pub async fn new(app_config: AppConfig) -> AppState {
        let storage = Arc::new(DeviceStorage::open(PathBuf::from(&app_config.storage_file)).await);

        AppState {
            storage,
            platform: Arc::new(HeadlessPlatform::new(app_config.platform_cfg)),
            api_base_url: Url::parse(app_config.api_base_url.as_str())
                .expect("Failed to parse api_base_url."),
            monitor_cfg: app_config.monitor_cfg,
        }
    }
}
