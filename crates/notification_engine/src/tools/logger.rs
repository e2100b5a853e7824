/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    pub level: String,
    pub log_to_file: bool,
    pub log_directory: String,
    pub log_file_prefix: String,
}

/// Installs the global tracing subscriber. The returned guard must be held
/// for the lifetime of the process so the non-blocking appender flushes.
pub fn setup_tracing(logger_cfg: LoggerConfig) -> Option<WorkerGuard> {
    LogTracer::init().expect("Failed to set LogTracer");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logger_cfg.level));

    if logger_cfg.log_to_file {
        let file_appender = tracing_appender::rolling::daily(
            &logger_cfg.log_directory,
            &logger_cfg.log_file_prefix,
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let subscriber = Registry::default()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "notification-engine".to_string(),
                non_blocking,
            ));
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        Some(guard)
    } else {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "notification-engine".to_string(),
                std::io::stdout,
            ));
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        None
    }
}
