use async_channel::Sender;
use clockwork::chimes::Chimes;
use clockwork::dial::Dial;
use dudley::config;
use dudley::events::AppEvent;
use dudley::gui::app::AppModel;
use dudley::sys::server;
use relm4::prelude::*;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the control socket and the config watcher on their own thread.
fn spawn_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Control socket and config watcher unavailable: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            tokio::join!(server::run_server(tx.clone()), config::run_async_watcher(tx));
        });
    });
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    // clips are attached once GTK is up
    let dial = Dial::new(
        config.diameter,
        config.face.clone().into(),
        Chimes::silent(),
        config.chimes.on_error,
    )?;

    let (tx, rx) = async_channel::bounded(32);
    spawn_services(tx);

    let app = RelmApp::new("org.sds.dudley");
    app.run::<AppModel>((dial, config.chimes, rx));
    Ok(())
}
