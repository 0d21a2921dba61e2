/// Kinematic tuning for queued customers.
#[derive(Debug, Clone, Copy)]
pub struct CustomerTuning {
    /// Initial horizontal speed factor.
    pub base_speed: f64,

    /// Seconds a newly joined customer takes to walk from the spawn point to its slot.
    pub approach_seconds: f64,

    /// Below this fraction of canvas height the customer shuffles toward the slot.
    pub flow_threshold_fraction: f64,

    /// Distance in pixels at which the customer counts as arrived.
    pub arrival_distance: f64,

    /// Divides the remaining distance when shuffling.
    pub flow_divisor: f64,

    /// Canvas height the shuffle speed was tuned for.
    pub reference_height: f64,

    /// Width of the random horizontal jitter applied to the shuffle direction.
    pub jitter: f64,

    /// Upward hop velocity as a fraction of canvas height.
    pub jump_impulse_fraction: f64,

    /// Hop velocity lost per tick.
    pub gravity: f64,

    /// Walk-cycle accumulator increment per tick.
    pub time_step: f64,

    /// Sprite edge as a fraction of canvas height.
    pub size_fraction: f64,

    /// Pixels below the canvas bottom where customers spawn.
    pub spawn_margin: f64,

    /// Number of frames in the walk cycle (frame 0 is standing).
    pub walk_frames: u32,

    /// Queue spacing as a fraction of customer size.
    pub queue_spacing_fraction: f64,
}

impl Default for CustomerTuning {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            approach_seconds: 2.0,
            flow_threshold_fraction: 0.03,
            arrival_distance: 1.0,
            flow_divisor: 25.0,
            reference_height: 1080.0,
            jitter: 10.0,
            jump_impulse_fraction: 0.0075,
            gravity: 1.0,
            time_step: 0.3,
            size_fraction: 0.05,
            spawn_margin: 25.0,
            walk_frames: 8,
            queue_spacing_fraction: 0.5,
        }
    }
}

/// Tuning for customers walking off-scene after leaving a queue.
#[derive(Debug, Clone, Copy)]
pub struct DispersalTuning {
    /// Per-second decay of the horizontal speed multiplier.
    pub speed_decay: f64,

    /// Horizontal speed multiplier at t = 0.
    pub speed_base: f64,

    /// Scale of the logarithmic downward drift.
    pub drift_scale: f64,

    /// Served customers keep their speed scaled by `min..min + range` with a random sign.
    pub served_spread_min: f64,
    pub served_spread_range: f64,

    /// Evicted customers get a fresh speed in `min..min + range`.
    pub evicted_speed_min: f64,
    pub evicted_speed_range: f64,
}

impl Default for DispersalTuning {
    fn default() -> Self {
        Self {
            speed_decay: 0.05,
            speed_base: 0.35,
            drift_scale: 0.5,
            served_spread_min: 0.75,
            served_spread_range: 0.5,
            evicted_speed_min: -0.5,
            evicted_speed_range: 1.0,
        }
    }
}
