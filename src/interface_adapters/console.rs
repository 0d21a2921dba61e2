// Line-oriented operator console: `p` toggles the embedded view, `resize <w> <h> [ratio]` resizes.

use crate::use_cases::SceneCommand;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{Notify, mpsc};
use tracing::{info, warn};
use url::Url;

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_console_line(line: &str) -> Result<Option<SceneCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    match verb {
        "p" => Ok(Some(SceneCommand::ToggleEmbeddedView)),
        "resize" => {
            let width = dimension(words.next(), "width")?;
            let height = dimension(words.next(), "height")?;
            let pixel_ratio = words
                .next()
                .map(|word| dimension(Some(word), "pixel ratio"))
                .transpose()?;
            Ok(Some(SceneCommand::Resize {
                width,
                height,
                pixel_ratio,
            }))
        }
        other => Err(format!("unknown command {other:?}")),
    }
}

fn dimension(word: Option<&str>, name: &str) -> Result<f64, String> {
    word.ok_or_else(|| format!("missing {name}"))?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| format!("invalid {name}"))
}

pub async fn console_task<R>(
    reader: R,
    command_tx: mpsc::Sender<SceneCommand>,
    embedded_view_url: Url,
    shutdown: Arc<Notify>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut embedded_visible = false;
    loop {
        let line = tokio::select! {
            _ = shutdown.notified() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "console read failed");
                break;
            }
        };

        let command = match parse_console_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(reason) => {
                warn!(%reason, "ignoring console input");
                continue;
            }
        };
        if matches!(command, SceneCommand::ToggleEmbeddedView) {
            embedded_visible = !embedded_visible;
            info!(url = %embedded_view_url, visible = embedded_visible, "embedded view toggled");
        }
        if command_tx.send(command).await.is_err() {
            break;
        }
    }
}
