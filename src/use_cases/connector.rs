// Keeps the scene fed: bulk snapshot, then live events, reconnecting forever.

use super::types::SceneCommand;
use crate::domain::events::ChannelMessage;
use crate::domain::ports::{SceneSource, SourceError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    /// Fixed wait before retrying a failed load or a closed channel.
    pub reconnect_delay: Duration,
}

enum SessionEnd {
    // Channel closed or failed; start over.
    Disconnected,
    // The scene task is gone; nothing left to feed.
    SceneGone,
}

pub async fn connector_task<S>(
    source: Arc<S>,
    command_tx: mpsc::Sender<SceneCommand>,
    settings: ConnectorSettings,
    shutdown: Arc<Notify>,
) where
    S: SceneSource + ?Sized,
{
    let mut session: u64 = 0;
    loop {
        session += 1;
        let span = info_span!("session", session);
        let outcome = tokio::select! {
            _ = shutdown.notified() => break,
            outcome = run_session(source.as_ref(), &command_tx).instrument(span) => outcome,
        };

        match outcome {
            Ok(SessionEnd::SceneGone) => {
                debug!(session, "scene task closed; connector stopping");
                break;
            }
            Ok(SessionEnd::Disconnected) => {
                info!(session, "channel closed; reconnecting");
            }
            Err(e) => {
                warn!(session, error = %e, delay_ms = settings.reconnect_delay.as_millis(), "load failed; retrying");
            }
        }

        tokio::select! {
            _ = shutdown.notified() => break,
            _ = tokio::time::sleep(settings.reconnect_delay) => {}
        }
    }
}

async fn run_session<S>(
    source: &S,
    command_tx: &mpsc::Sender<SceneCommand>,
) -> Result<SessionEnd, SourceError>
where
    S: SceneSource + ?Sized,
{
    let snapshot = source.fetch_snapshot().await?;
    debug!(
        suppliers = snapshot.suppliers.len(),
        retailers = snapshot.retailers.len(),
        carriers = snapshot.carriers.len(),
        "snapshot loaded"
    );
    if command_tx.send(SceneCommand::Reset(snapshot)).await.is_err() {
        return Ok(SessionEnd::SceneGone);
    }

    let mut channel = source.open_channel().await?;
    info!("channel open");

    let mut forwarded: u64 = 0;
    let mut malformed: u64 = 0;
    while let Some(next) = channel.next_message().await {
        let command = match next {
            Ok(ChannelMessage::Scene(event)) => SceneCommand::Apply(event),
            Ok(ChannelMessage::Record(record)) => SceneCommand::Record(record),
            Err(SourceError::Malformed(reason)) => {
                malformed += 1;
                warn!(%reason, malformed, "skipping malformed frame");
                continue;
            }
            Err(e) => {
                warn!(error = %e, forwarded, "channel failed");
                return Ok(SessionEnd::Disconnected);
            }
        };
        if command_tx.send(command).await.is_err() {
            return Ok(SessionEnd::SceneGone);
        }
        forwarded += 1;
    }

    debug!(forwarded, malformed, "channel drained");
    Ok(SessionEnd::Disconnected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LogoHandle;
    use crate::domain::events::{SceneEvent, Snapshot, SupplierSeed};
    use crate::domain::feed::EventRecord;
    use crate::domain::ports::EventChannel;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Frames = VecDeque<Result<ChannelMessage, SourceError>>;

    // Scripted source: each fetch and each channel open pops the next entry.
    struct ScriptedSource {
        snapshots: Mutex<VecDeque<Result<Snapshot, SourceError>>>,
        channels: Mutex<VecDeque<Frames>>,
        fetches: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(snapshots: Vec<Result<Snapshot, SourceError>>, channels: Vec<Frames>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                channels: Mutex::new(channels.into()),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    struct ScriptedChannel(Frames);

    #[async_trait]
    impl EventChannel for ScriptedChannel {
        async fn next_message(&mut self) -> Option<Result<ChannelMessage, SourceError>> {
            self.0.pop_front()
        }
    }

    #[async_trait]
    impl SceneSource for ScriptedSource {
        async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.snapshots
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::Transport("script exhausted".to_string())))
        }

        async fn open_channel(&self) -> Result<Box<dyn EventChannel>, SourceError> {
            let frames = self
                .channels
                .lock()
                .expect("lock")
                .pop_front()
                .ok_or_else(|| SourceError::Transport("script exhausted".to_string()))?;
            Ok(Box::new(ScriptedChannel(frames)))
        }
    }

    fn snapshot(suppliers: usize) -> Snapshot {
        Snapshot {
            suppliers: vec![
                SupplierSeed {
                    logo: LogoHandle::new("s.png")
                };
                suppliers
            ],
            ..Snapshot::default()
        }
    }

    fn settings() -> ConnectorSettings {
        ConnectorSettings {
            reconnect_delay: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_failed_loads_then_forwards_and_reloads_after_close() {
        let record = EventRecord::from_payload(json!({"source": "Carrier.a", "type": "Truck.Dispatched"}));
        let first_channel: Frames = VecDeque::from(vec![
            Ok(ChannelMessage::Scene(SceneEvent::CustomerJoin { retailer: 0 })),
            Err(SourceError::Malformed("not json".to_string())),
            Ok(ChannelMessage::Record(record.clone())),
        ]);
        let source = Arc::new(ScriptedSource::new(
            vec![
                Err(SourceError::Status(503)),
                Ok(snapshot(1)),
                Ok(snapshot(2)),
            ],
            vec![first_channel, VecDeque::new()],
        ));
        let (command_tx, mut command_rx) = mpsc::channel(16);
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(connector_task(
            source.clone(),
            command_tx,
            settings(),
            shutdown.clone(),
        ));

        let mut received = Vec::new();
        for _ in 0..4 {
            received.push(command_rx.recv().await.expect("command"));
        }
        assert_eq!(
            received,
            vec![
                SceneCommand::Reset(snapshot(1)),
                SceneCommand::Apply(SceneEvent::CustomerJoin { retailer: 0 }),
                SceneCommand::Record(record),
                SceneCommand::Reset(snapshot(2)),
            ]
        );
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);

        shutdown.notify_one();
        handle.await.expect("connector joins");
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_the_scene_task_is_gone() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(snapshot(1))], vec![]));
        let (command_tx, command_rx) = mpsc::channel(1);
        drop(command_rx);

        connector_task(source, command_tx, settings(), Arc::new(Notify::new())).await;
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_reconnect_delay_between_attempts() {
        let source = Arc::new(ScriptedSource::new(vec![], vec![]));
        let (command_tx, _command_rx) = mpsc::channel(1);
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(connector_task(
            source.clone(),
            command_tx,
            settings(),
            shutdown.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(1_250)).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);

        shutdown.notify_one();
        handle.await.expect("connector joins");
    }
}
