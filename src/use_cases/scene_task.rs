// The single scene loop: drains commands, animates, renders.

use super::render::render;
use super::scene::Scene;
use super::types::{FrameStats, SceneCommand};
use crate::domain::ports::Painter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

/// Owns the scene for its whole life. Nothing else mutates it.
pub async fn scene_task<P: Painter + Send>(
    mut scene: Scene,
    mut painter: P,
    mut command_rx: mpsc::Receiver<SceneCommand>,
    stats_tx: watch::Sender<FrameStats>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let started = Instant::now();
    let mut interval = tokio::time::interval(tick_interval);
    // Scene time comes from the clock, so ticks missed during a stall are not replayed.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = FrameStats::default();
    let mut last_reject_log: Option<Instant> = None;

    info!(
        width = scene.viewport().width(),
        height = scene.viewport().height(),
        tick_ms = tick_interval.as_millis(),
        "scene loop started"
    );

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {}
        }

        // Scene clock in seconds since the loop started.
        let now = started.elapsed().as_secs_f64();

        while let Ok(command) = command_rx.try_recv() {
            match command {
                SceneCommand::Reset(snapshot) => scene.apply_snapshot(snapshot, now),
                SceneCommand::Apply(event) => {
                    let tag = event.tag();
                    if let Err(e) = scene.apply_event(event, now) {
                        stats.rejected_events += 1;
                        if should_log(&mut last_reject_log) {
                            warn!(event = tag, error = %e, rejected = stats.rejected_events, "dropping event");
                        }
                    }
                }
                SceneCommand::Record(record) => scene.record_event(record),
                SceneCommand::Resize {
                    width,
                    height,
                    pixel_ratio,
                } => {
                    let ratio = pixel_ratio.unwrap_or(scene.viewport().pixel_ratio);
                    scene.resize(width, height, ratio);
                }
                SceneCommand::ToggleEmbeddedView => {
                    let visible = scene.toggle_embedded_view();
                    debug!(visible, "embedded view toggled");
                }
            }
        }

        scene.animate(now);
        let frame = render(&scene, &mut painter);

        stats.tick += 1;
        stats.queued_customers = scene.queued_customers();
        stats.dispersing_customers = scene.dispersing().len();
        stats.trucks_in_transit = scene.trucks_in_transit();
        stats.feed_rows = scene.feed().len();
        stats.render = frame;
        stats.embedded_view_visible = scene.viewport().embedded_view_visible;
        let _ = stats_tx.send(stats);
    }

    info!(ticks = stats.tick, "scene loop stopped");
}

fn should_log(last: &mut Option<Instant>) -> bool {
    match last {
        Some(at) if at.elapsed() < LOG_THROTTLE => false,
        _ => {
            *last = Some(Instant::now());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LogoHandle, Point};
    use crate::domain::events::{CarrierSeed, OfferOverlay, RetailerSeed, SceneEvent, Snapshot, SupplierSeed};
    use crate::domain::feed::EventRecord;
    use crate::domain::ports::{PaintResult, Rect, Sprite, SpriteFrame};
    use crate::domain::viewport::Viewport;
    use serde_json::json;

    struct NullPainter;

    impl Painter for NullPainter {
        fn fill_rect(&mut self, _: &'static str, _: Rect) -> PaintResult {
            Ok(())
        }
        fn stroke_line(&mut self, _: &'static str, _: f64, _: Point, _: Point) -> PaintResult {
            Ok(())
        }
        fn fill_ellipse(&mut self, _: &'static str, _: Point, _: f64, _: f64) -> PaintResult {
            Ok(())
        }
        fn fill_text(&mut self, _: &'static str, _: &str, _: Point, _: f64) -> PaintResult {
            Ok(())
        }
        fn draw_sprite(&mut self, _: Sprite, _: Point, _: f64, _: f64, _: f64) -> PaintResult {
            Ok(())
        }
        fn draw_sprite_frame(&mut self, _: Sprite, _: SpriteFrame, _: Rect) -> PaintResult {
            Ok(())
        }
        fn draw_logo(&mut self, _: &LogoHandle, _: Point, _: f64) -> PaintResult {
            Ok(())
        }
        fn draw_bubble(&mut self, _: Point, _: Rect, _: f64) -> PaintResult {
            Ok(())
        }
        fn push_clip(&mut self, _: Rect) -> PaintResult {
            Ok(())
        }
        fn pop_clip(&mut self) {}
    }

    fn snapshot() -> Snapshot {
        let logo = LogoHandle::new("logo.png");
        Snapshot {
            suppliers: vec![SupplierSeed { logo: logo.clone() }; 2],
            retailers: vec![RetailerSeed {
                logo: logo.clone(),
                customers: 0,
                overlay: OfferOverlay::default(),
            }],
            carriers: vec![CarrierSeed { logo }],
        }
    }

    async fn wait_for(
        stats_rx: &mut watch::Receiver<FrameStats>,
        predicate: impl Fn(&FrameStats) -> bool,
    ) -> FrameStats {
        loop {
            stats_rx.changed().await.expect("scene task alive");
            let stats = *stats_rx.borrow();
            if predicate(&stats) {
                return stats;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn commands_are_applied_between_ticks() {
        let scene = Scene::with_seed(Viewport::new(640.0, 360.0, 1.0), 1);
        let (command_tx, command_rx) = mpsc::channel(16);
        let (stats_tx, mut stats_rx) = watch::channel(FrameStats::default());
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(scene_task(
            scene,
            NullPainter,
            command_rx,
            stats_tx,
            Duration::from_millis(17),
            shutdown.clone(),
        ));

        command_tx.send(SceneCommand::Reset(snapshot())).await.expect("send");
        for _ in 0..3 {
            command_tx
                .send(SceneCommand::Apply(SceneEvent::CustomerJoin { retailer: 0 }))
                .await
                .expect("send");
        }
        command_tx
            .send(SceneCommand::Apply(SceneEvent::CustomerJoin { retailer: 7 }))
            .await
            .expect("send");
        command_tx
            .send(SceneCommand::Record(EventRecord::from_payload(json!({"source": "Retailer"}))))
            .await
            .expect("send");
        command_tx.send(SceneCommand::ToggleEmbeddedView).await.expect("send");

        let stats = wait_for(&mut stats_rx, |s| s.queued_customers == 3).await;
        assert_eq!(stats.rejected_events, 1);
        assert_eq!(stats.feed_rows, 1);
        assert!(stats.embedded_view_visible);
        assert!(stats.render.calls > 0);

        shutdown.notify_one();
        handle.await.expect("scene task joins");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_clock_yields_one_tick_not_a_burst() {
        let scene = Scene::with_seed(Viewport::new(640.0, 360.0, 1.0), 1);
        let (_command_tx, command_rx) = mpsc::channel(16);
        let (stats_tx, stats_rx) = watch::channel(FrameStats::default());
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(scene_task(
            scene,
            NullPainter,
            command_rx,
            stats_tx,
            Duration::from_millis(17),
            shutdown.clone(),
        ));

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let before = stats_rx.borrow().tick;
        assert!(before >= 1);

        tokio::time::advance(Duration::from_millis(170)).await;
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        let after = stats_rx.borrow().tick;
        assert!(after - before <= 2, "ticks after stall: {}", after - before);

        shutdown.notify_one();
        handle.await.expect("scene task joins");
    }
}
