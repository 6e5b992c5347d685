use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the control socket and the config watcher on their own tokio runtime
/// so the GTK main loop never blocks on them.
pub fn start_background_services(tx: Sender<AppEvent>, socket: PathBuf) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            tokio::spawn(crate::sys::server::run_server(tx.clone(), socket));
            tokio::spawn(crate::config::run_async_watcher(tx));

            std::future::pending::<()>().await;
        });
    });
}
