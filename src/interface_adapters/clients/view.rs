use crate::domain::events::{ChannelMessage, Snapshot};
use crate::domain::ports::{EventChannel, SceneSource, SourceError};
use crate::interface_adapters::protocol::{SnapshotDto, decode_view_message};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::fmt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

#[derive(Debug)]
pub enum ViewClientError {
    InvalidUrl(String),
    Http(reqwest::Error),
}

impl fmt::Display for ViewClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewClientError::InvalidUrl(reason) => write!(f, "invalid view url: {reason}"),
            ViewClientError::Http(e) => write!(f, "failed to build http client: {e}"),
        }
    }
}

impl std::error::Error for ViewClientError {}

/// Bulk state location: `data` next to the page.
pub fn data_url(page: &Url) -> Result<Url, ViewClientError> {
    page.join("data")
        .map_err(|e| ViewClientError::InvalidUrl(e.to_string()))
}

/// Push channel location: `view` in the last path segment becomes `ws_view`, on ws/wss.
pub fn channel_url(page: &Url) -> Result<Url, ViewClientError> {
    let scheme = match page.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(ViewClientError::InvalidUrl(format!("unsupported scheme {other}"))),
    };
    let mut url = with_last_segment(page, |segment| segment.replacen("view", "ws_view", 1));
    url.set_scheme(scheme)
        .map_err(|()| ViewClientError::InvalidUrl(format!("cannot switch {page} to {scheme}")))?;
    Ok(url)
}

/// The auxiliary view the console toggle points at: `view` dropped from the last segment.
pub fn embedded_view_url(page: &Url) -> Url {
    with_last_segment(page, |segment| segment.replacen("view", "", 1))
}

fn with_last_segment(page: &Url, rewrite: impl FnOnce(&str) -> String) -> Url {
    let mut url = page.clone();
    url.set_query(None);
    url.set_fragment(None);
    let path = page.path();
    let (dir, last) = path.rsplit_once('/').unwrap_or(("", path));
    url.set_path(&format!("{dir}/{}", rewrite(last)));
    url
}

// Thin reqwest + websocket client for the view endpoints.
#[derive(Clone)]
pub struct ViewClient {
    http: reqwest::Client,
    data_url: Url,
    channel_url: Url,
}

impl ViewClient {
    pub fn new(page_url: &str, timeout: Duration) -> Result<Self, ViewClientError> {
        let page = Url::parse(page_url).map_err(|e| ViewClientError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ViewClientError::Http)?;
        Ok(Self {
            http,
            data_url: data_url(&page)?,
            channel_url: channel_url(&page)?,
        })
    }

    pub fn data_url(&self) -> &Url {
        &self.data_url
    }

    pub fn channel_url(&self) -> &Url {
        &self.channel_url
    }
}

#[async_trait]
impl SceneSource for ViewClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError> {
        let response = self
            .http
            .get(self.data_url.clone())
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let dto = response
            .json::<SnapshotDto>()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(dto.into())
    }

    async fn open_channel(&self) -> Result<Box<dyn EventChannel>, SourceError> {
        let (stream, response) = connect_async(self.channel_url.as_str())
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        debug!(url = %self.channel_url, status = response.status().as_u16(), "channel connected");
        Ok(Box::new(WsChannel { stream }))
    }
}

struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl EventChannel for WsChannel {
    async fn next_message(&mut self) -> Option<Result<ChannelMessage, SourceError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(decode_view_message(text.as_str())),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "channel closed by server");
                    return None;
                }
                // The view channel is text-only; pings are answered by the stream.
                Ok(other) => trace!(kind = ?other, "ignoring non-text frame"),
                Err(e) => return Some(Err(SourceError::Transport(e.to_string()))),
            }
        }
    }
}
