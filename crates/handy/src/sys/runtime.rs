use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the IPC server and the config watcher on their own thread. Both only
/// ever talk to the UI thread through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::Builder::new()
        .name("handy-services".into())
        .spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::sys::server::run_server(tx).await;
                    });
                }

                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::config::run_async_watcher(tx).await;
                    });
                }

                std::future::pending::<()>().await;
            });
        })
        .map(drop)
        .unwrap_or_else(|e| log::error!("Failed to start background services: {}", e));
}
