// Framework bootstrap for the view client runtime.

use crate::domain::ports::SceneSource;
use crate::domain::tuning::SceneTuning;
use crate::domain::viewport::Viewport;
use crate::frameworks::config;
use crate::interface_adapters::clients::view::{ViewClient, embedded_view_url};
use crate::interface_adapters::console::console_task;
use crate::interface_adapters::painter::DisplayList;
use crate::use_cases::{
    ConnectorSettings, FrameStats, Scene, SceneCommand, SceneSettings, connector_task, scene_task,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc, watch};
use url::Url;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Handles to a running view client.
pub struct ViewRuntime {
    pub stats_rx: watch::Receiver<FrameStats>,
    shutdown: Vec<Arc<Notify>>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl ViewRuntime {
    /// Stops every task and waits for them to finish.
    pub async fn shutdown(self) {
        for signal in &self.shutdown {
            signal.notify_one();
        }
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "task ended abnormally");
            }
        }
    }
}

/// Spawns the scene loop and the connector for `source`.
pub fn start<S>(
    source: Arc<S>,
    viewport: Viewport,
    reconnect_delay: Duration,
) -> (ViewRuntime, mpsc::Sender<SceneCommand>)
where
    S: SceneSource + ?Sized + 'static,
{
    let settings = SceneSettings {
        tick_interval: config::TICK_INTERVAL,
        command_channel_capacity: config::COMMAND_CHANNEL_CAPACITY,
    };
    // command_tx/rx: every scene mutation funnels into the single scene task.
    let (command_tx, command_rx) = mpsc::channel(settings.command_channel_capacity);
    let (stats_tx, stats_rx) = watch::channel(FrameStats::default());

    let scene = Scene::new(viewport, SceneTuning::default(), StdRng::from_entropy());
    let scene_shutdown = Arc::new(Notify::new());
    let connector_shutdown = Arc::new(Notify::new());

    let tasks = vec![
        tokio::spawn(scene_task(
            scene,
            DisplayList::new(),
            command_rx,
            stats_tx,
            settings.tick_interval,
            scene_shutdown.clone(),
        )),
        tokio::spawn(connector_task(
            source,
            command_tx.clone(),
            ConnectorSettings { reconnect_delay },
            connector_shutdown.clone(),
        )),
    ];

    (
        ViewRuntime {
            stats_rx,
            shutdown: vec![connector_shutdown, scene_shutdown],
            tasks,
        },
        command_tx,
    )
}

pub async fn run(page_url: &str) -> Result<()> {
    let page = Url::parse(page_url)
        .map_err(|e| std::io::Error::other(format!("invalid view url {page_url}: {e}")))?;
    let client = ViewClient::new(page_url, config::http_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to initialize view client: {e}")))?;
    tracing::info!(
        data_url = %client.data_url(),
        channel_url = %client.channel_url(),
        "view client configured"
    );

    let (css_width, css_height) = config::view_size();
    let viewport = Viewport::new(css_width, css_height, config::pixel_ratio());
    let (mut runtime, command_tx) = start(Arc::new(client), viewport, config::reconnect_delay());

    let console_shutdown = Arc::new(Notify::new());
    runtime.tasks.push(tokio::spawn(console_task(
        tokio::io::BufReader::new(tokio::io::stdin()),
        command_tx,
        embedded_view_url(&page),
        console_shutdown.clone(),
    )));
    runtime.shutdown.push(console_shutdown);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    runtime.shutdown().await;
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();
    run(&config::view_url()).await
}
