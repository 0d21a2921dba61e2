// Use-case level inputs/outputs for the scene loop.

use crate::domain::events::{SceneEvent, Snapshot};
use crate::domain::feed::EventRecord;
use crate::use_cases::render::RenderStats;
use std::time::Duration;

/// Everything that may mutate the scene. Only the scene task applies these.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Fresh bulk state after (re)connecting.
    Reset(Snapshot),
    Apply(SceneEvent),
    Record(EventRecord),
    /// New CSS size; `pixel_ratio` replaces the current ratio when given.
    Resize {
        width: f64,
        height: f64,
        pixel_ratio: Option<f64>,
    },
    ToggleEmbeddedView,
}

/// Shared configuration for the scene loop.
#[derive(Debug, Clone)]
pub struct SceneSettings {
    /// Fixed animation tick.
    pub tick_interval: Duration,
    /// Capacity for inbound scene commands.
    pub command_channel_capacity: usize,
}

/// Per-tick summary published by the scene task.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub tick: u64,
    pub queued_customers: usize,
    pub dispersing_customers: usize,
    pub trucks_in_transit: usize,
    pub feed_rows: usize,
    pub render: RenderStats,
    /// Events dropped for addressing entities that do not exist.
    pub rejected_events: u64,
    pub embedded_view_visible: bool,
}
