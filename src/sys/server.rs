use crate::dial::VALUE_MIN;
use crate::events::AppEvent;
use async_channel::Sender;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Parses one line of the control protocol.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let arg = parts.next();
    if parts.next().is_some() {
        return None;
    }

    match (command.to_ascii_lowercase().as_str(), arg) {
        ("set", Some(v)) => v
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(AppEvent::SetValue),
        ("reset", None) => Some(AppEvent::SetValue(VALUE_MIN)),
        _ => None,
    }
}

/// Removes a socket left behind by a previous run. Returns `false` when the
/// path holds something other than a socket, which is never touched.
fn clear_stale_socket(socket: &Path) -> io::Result<bool> {
    match fs_err::symlink_metadata(socket) {
        Ok(meta) if meta.file_type().is_socket() => {
            fs_err::remove_file(socket)?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e),
    }
}

pub async fn run_server(tx: Sender<AppEvent>, socket: PathBuf) {
    match clear_stale_socket(&socket) {
        Ok(true) => {}
        Ok(false) => {
            log::error!(
                "Refusing to replace {}: not a unix socket",
                socket.display()
            );
            return;
        }
        Err(e) => {
            log::error!("Failed to clear stale socket {}: {}", socket.display(), e);
            return;
        }
    }

    let listener = match UnixListener::bind(&socket) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_client(stream, tx.clone()));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(stream).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                log::debug!("Dropping control connection: {}", e);
                return;
            }
        };
        match parse_command(&line) {
            Some(event) => {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            None => log::debug!("Ignoring control command {:?}", line.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dial-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_parse_command() {
        let cases = vec![
            ("set 42", Some(AppEvent::SetValue(42.0))),
            ("  SET   -3.5 ", Some(AppEvent::SetValue(-3.5))),
            ("set 1e3", Some(AppEvent::SetValue(1000.0))),
            ("reset", Some(AppEvent::SetValue(0.0))),
            ("set", None),
            ("set abc", None),
            ("set NaN", None),
            ("set 1 2", None),
            ("reset now", None),
            ("", None),
            ("show", None),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_command(line), expected, "{line:?}");
        }
    }

    #[tokio::test]
    async fn test_client_lines_become_events() {
        let (tx, rx) = async_channel::unbounded();
        let (mut client, server) = UnixStream::pair().unwrap();

        let handler = tokio::spawn(handle_client(server, tx));
        client.write_all(b"set 10\nbogus\nreset\n").await.unwrap();
        client.shutdown().await.unwrap();
        drop(client);
        handler.await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::SetValue(10.0));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::SetValue(0.0));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_ends_connection() {
        let (tx, rx) = async_channel::unbounded();
        let (mut client, server) = UnixStream::pair().unwrap();

        let handler = tokio::spawn(handle_client(server, tx));
        client.write_all(b"set 5\n\xff\xfe\nset 7\n").await.unwrap();
        client.shutdown().await.unwrap();
        handler.await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::SetValue(5.0));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_server_leaves_regular_file_alone() {
        let path = scratch_path("notes.txt");
        fs_err::write(&path, "keep me").unwrap();

        let (tx, _rx) = async_channel::unbounded();
        tokio::time::timeout(Duration::from_secs(1), run_server(tx, path.clone()))
            .await
            .expect("server should give up on a non-socket path");

        assert_eq!(fs_err::read_to_string(&path).unwrap(), "keep me");
        fs_err::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stale_socket_is_cleared() {
        let path = scratch_path("stale.sock");
        let _ = fs_err::remove_file(&path);
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        assert!(clear_stale_socket(&path).unwrap());
        assert!(!path.exists());
        assert!(clear_stale_socket(&path).unwrap());
    }
}
