use crate::events::AppEvent;
use async_channel::Sender;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/dudley.sock";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Expected a diameter in pixels, got '{0}'")]
    Diameter(String),
}

/// Parses one line of the control protocol.
pub fn parse_command(line: &str) -> Result<AppEvent, CommandError> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("start"), None, _) => Ok(AppEvent::Start),
        (Some("stop"), None, _) => Ok(AppEvent::Stop),
        (Some("reload"), None, _) => Ok(AppEvent::ConfigReload),
        (Some("diameter"), Some(px), None) => px
            .parse()
            .map(AppEvent::SetDiameter)
            .map_err(|_| CommandError::Diameter(px.to_string())),
        (Some("diameter"), ..) => Err(CommandError::Diameter(
            line.trim().trim_start_matches("diameter").trim().to_string(),
        )),
        _ => Err(CommandError::Unknown(line.trim().to_string())),
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line) {
                            Ok(event) => {
                                log::debug!("Control command: {:?}", event);
                                let _ = tx.send(event).await;
                            }
                            Err(e) => log::warn!("{}", e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
