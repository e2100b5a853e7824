/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use anyhow::Result;
use notification_engine::{
    environment::{AppConfig, AppState},
    monitor::{start_monitoring, StatusMonitor},
    outbound::external::{RestStatusSource, RestTokenBackend},
    router::NotificationRouter,
    signals::{SessionCommand, SignalBus},
    storage::commands::get_session_record,
    token::TokenLifecycleManager,
    tools::logger::setup_tracing,
};
use std::{
    env::var,
    sync::{atomic::AtomicBool, Arc},
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::mpsc,
};
use tracing::*;

#[tokio::main]
async fn main() -> Result<()> {
    let dhall_config_path = var("DHALL_CONFIG")
        .unwrap_or_else(|_| "./dhall-configs/dev/notification_engine.dhall".to_string());
    let app_config = serde_dhall::from_file(dhall_config_path).parse::<AppConfig>()?;

    let _guard = setup_tracing(app_config.logger_cfg.clone());

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic Occured : {:?}", panic_info);
    }));

    let app_state = AppState::new(app_config).await;

    let (session_tx, mut session_rx) = mpsc::channel::<SessionCommand>(32);
    let signals = SignalBus::new(session_tx);
    let session_alive = Arc::new(AtomicBool::new(false));

    let router = Arc::new(NotificationRouter::new(
        app_state.platform.clone(),
        signals.clone(),
        session_alive.clone(),
    ));

    let Some(session) = get_session_record(&app_state.storage).await? else {
        info!("No signed-in session on this device, nothing to monitor");
        return Ok(());
    };

    let status_source = Arc::new(RestStatusSource::new(
        app_state.api_base_url.clone(),
        session.auth_token.clone(),
    ));
    let token_backend = Arc::new(RestTokenBackend::new(
        app_state.api_base_url.clone(),
        session.auth_token.clone(),
    ));

    let monitor = Arc::new(StatusMonitor::new(
        status_source,
        router.clone(),
        app_state.storage.clone(),
        session_alive.clone(),
        app_state.monitor_cfg.clone(),
    ));
    let token_manager = TokenLifecycleManager::new(
        app_state.platform.clone(),
        app_state.storage.clone(),
        token_backend,
        signals.clone(),
    );

    start_monitoring(monitor.clone(), session.user.clone());
    token_manager.reassociate(&session.user).await;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        tokio::select! {
            command = session_rx.recv() => match command {
                Some(SessionCommand::Reload) => {
                    info!("[Session Reload Requested]");
                    monitor.stop_monitoring();
                    match get_session_record(&app_state.storage).await? {
                        Some(session) => start_monitoring(monitor.clone(), session.user),
                        None => break,
                    }
                }
                None => break,
            },
            _ = sigterm.recv() => break,
            _ = sigint.recv() => break,
        }
    }

    monitor.stop_monitoring();

    Ok(())
}
