mod support;

use airport_view::domain::events::{ChannelMessage, SceneEvent};
use airport_view::domain::ports::{EventChannel, SceneSource, SourceError};
use airport_view::domain::viewport::Viewport;
use airport_view::interface_adapters::clients::ViewClient;
use airport_view::use_cases::FrameStats;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn snapshot() -> serde_json::Value {
    json!({
        "disabled": false,
        "suppliers": [{"name": "north", "logo": "/n.png"}, {"name": "south", "logo": "/s.png"}],
        "retailers": [{"name": "cafe", "logo": "/r.png", "customers": [{"state": 0}]}],
        "carriers": [{"name": "vans", "logo": "/c.png"}]
    })
}

fn frames() -> Vec<String> {
    vec![
        json!({"type": "customer", "r": 0}).to_string(),
        json!({"type": "customer-join", "r": 0}).to_string(),
        json!({"type": "event", "event": {
            "time": "2019-05-02T09:05:00Z",
            "source": "Retailer.cafe",
            "type": "Order.OrderStatus.OrderReleased"
        }})
        .to_string(),
        "not json".to_string(),
        json!({"type": "gocarrier", "c": 0, "s": 1, "r": 0, "o": "small"}).to_string(),
    ]
}

fn client(page: &str) -> ViewClient {
    ViewClient::new(page, Duration::from_secs(2)).expect("client")
}

async fn wait_for(
    stats_rx: &mut watch::Receiver<FrameStats>,
    predicate: impl Fn(&FrameStats) -> bool,
) -> FrameStats {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            stats_rx.changed().await.expect("scene task alive");
            let stats = *stats_rx.borrow();
            if predicate(&stats) {
                return stats;
            }
        }
    })
    .await
    .expect("condition reached in time")
}

#[tokio::test]
async fn client_loads_snapshot_and_decodes_channel_frames() {
    let (page, airport) = support::spawn_mock(snapshot(), frames()).await;
    let client = client(&page);

    let snapshot = client.fetch_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.suppliers.len(), 2);
    assert_eq!(snapshot.retailers[0].customers, 1);
    assert_eq!(airport.data_hits(), 1);

    let mut channel = client.open_channel().await.expect("channel");
    let first = channel.next_message().await.expect("frame").expect("decoded");
    assert_eq!(
        first,
        ChannelMessage::Scene(SceneEvent::CustomerJoin { retailer: 0 })
    );

    let mut records = 0;
    let mut malformed = 0;
    while let Some(next) = channel.next_message().await {
        match next {
            Ok(ChannelMessage::Record(_)) => records += 1,
            Err(SourceError::Malformed(_)) => malformed += 1,
            Ok(ChannelMessage::Scene(_)) => {}
            Err(e) => panic!("unexpected channel error: {e}"),
        }
    }
    assert_eq!(records, 1);
    assert_eq!(malformed, 1);
}

#[tokio::test]
async fn missing_server_is_a_transport_error() {
    let client = client("http://127.0.0.1:9/view");
    assert!(matches!(
        client.fetch_snapshot().await,
        Err(SourceError::Transport(_))
    ));
}

#[tokio::test]
async fn runtime_rebuilds_scene_after_channel_close_and_keeps_feed() {
    let (page, airport) = support::spawn_mock(snapshot(), frames()).await;
    let viewport = Viewport::new(640.0, 360.0, 1.0);
    let (runtime, _command_tx) =
        airport_view::start(Arc::new(client(&page)), viewport, Duration::from_millis(50));
    let mut stats_rx = runtime.stats_rx.clone();

    let stats = wait_for(&mut stats_rx, |s| s.queued_customers == 3 && s.trucks_in_transit == 1).await;
    assert!(stats.feed_rows >= 1);

    // The channel closes after its script; the client reloads and replays it.
    let stats = wait_for(&mut stats_rx, |s| s.feed_rows >= 2).await;
    assert!(stats.queued_customers <= 3);
    assert!(airport.data_hits() >= 2);
    assert!(airport.channel_hits() >= 2);

    runtime.shutdown().await;
}
