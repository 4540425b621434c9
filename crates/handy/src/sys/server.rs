use crate::events::AppEvent;
use crate::gui::menu::CapturedContext;
use async_channel::Sender;
use handyctl::ipc::SOCKET_PATH;
use handyctl::wm::Point;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

/// Parses one protocol line. Returns `None` for anything malformed.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = line
        .trim_start()
        .split_once(' ')
        .unwrap_or((line.trim_start(), ""));

    let point = || -> Option<Point> {
        let mut parts = rest.split_whitespace();
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        parts.next().is_none().then_some(Point::new(x, y))
    };
    let bare = || rest.trim().is_empty();

    match verb {
        "open" => point().map(AppEvent::Open),
        "toggle" => point().map(AppEvent::Toggle),
        "pointer" => point().map(AppEvent::Pointer),
        "press" => point().map(AppEvent::Press),
        "release" => point().map(AppEvent::Release),
        "close" => bare().then_some(AppEvent::Close),
        "activate" => bare().then_some(AppEvent::Activate),
        "context" => Some(AppEvent::Context(
            (!rest.is_empty()).then(|| CapturedContext::new(rest)),
        )),
        _ => None,
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
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let Some(event) = parse_command(&line) else {
                            log::warn!("Ignoring malformed command: {:?}", line);
                            continue;
                        };
                        if tx.send(event).await.is_err() {
                            return;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_commands() {
        assert_eq!(
            parse_command("open 100 250.5"),
            Some(AppEvent::Open(Point::new(100.0, 250.5)))
        );
        assert_eq!(
            parse_command("toggle 1 2\n"),
            Some(AppEvent::Toggle(Point::new(1.0, 2.0)))
        );
        assert_eq!(
            parse_command("pointer -5 7"),
            Some(AppEvent::Pointer(Point::new(-5.0, 7.0)))
        );
        assert_eq!(
            parse_command("release 3 4"),
            Some(AppEvent::Release(Point::new(3.0, 4.0)))
        );
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse_command("close"), Some(AppEvent::Close));
        assert_eq!(parse_command("activate\r\n"), Some(AppEvent::Activate));
        assert_eq!(parse_command("close now"), None);
    }

    #[test]
    fn context_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse_command("context  two  spaced words"),
            Some(AppEvent::Context(Some(CapturedContext::new(" two  spaced words"))))
        );
        assert_eq!(parse_command("context"), Some(AppEvent::Context(None)));
    }

    #[test]
    fn malformed_lines() {
        for line in ["", "open", "open 1", "open 1 2 3", "open x 2", "show", "OPEN 1 2"] {
            assert_eq!(parse_command(line), None, "{line:?}");
        }
    }
}
