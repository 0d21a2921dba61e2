// Mock airport server for integration tests: serves `/data` and the `/ws_view` push channel.
use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// What the mock hands out, plus counters the tests assert on.
pub struct MockAirport {
    snapshot: Value,
    frames: Vec<String>,
    pub data_hits: AtomicUsize,
    pub channel_hits: AtomicUsize,
}

impl MockAirport {
    pub fn data_hits(&self) -> usize {
        self.data_hits.load(Ordering::SeqCst)
    }

    pub fn channel_hits(&self) -> usize {
        self.channel_hits.load(Ordering::SeqCst)
    }
}

// Start the mock on an ephemeral port and return the page url plus shared state.
pub async fn spawn_mock(snapshot: Value, frames: Vec<String>) -> (String, Arc<MockAirport>) {
    let airport = Arc::new(MockAirport {
        snapshot,
        frames,
        data_hits: AtomicUsize::new(0),
        channel_hits: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/data", get(data_handler))
        .route("/ws_view", get(channel_handler))
        .with_state(airport.clone());

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server failed");
    });

    (format!("http://{addr}/view"), airport)
}

async fn data_handler(State(airport): State<Arc<MockAirport>>) -> Json<Value> {
    airport.data_hits.fetch_add(1, Ordering::SeqCst);
    Json(airport.snapshot.clone())
}

async fn channel_handler(State(airport): State<Arc<MockAirport>>, ws: WebSocketUpgrade) -> Response {
    airport.channel_hits.fetch_add(1, Ordering::SeqCst);
    ws.on_upgrade(move |socket| play_frames(socket, airport))
}

// Send every scripted frame, then close so the client has to reconnect.
async fn play_frames(mut socket: WebSocket, airport: Arc<MockAirport>) {
    for frame in &airport.frames {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}
