/// Kinematic tuning for truck trips.
///
/// Keep this separate from runtime configuration (tick rates, URLs, etc.).
#[derive(Debug, Clone, Copy)]
pub struct TruckTuning {
    /// Seconds spent on each of the three trip legs.
    pub leg_seconds: f64,

    /// Exponent of the vertical ease from the dock up to the supplier.
    pub pickup_ease_power: i32,

    /// Exponent of the sinusoidal vertical ease on wide supplier-to-retailer sweeps.
    pub sweep_ease_power: i32,

    /// Exponent of the vertical ease from the retailer back to the dock.
    pub return_ease_power: i32,

    /// Sweeps narrower than this fraction of canvas width use the plain sine ease.
    pub narrow_sweep_fraction: f64,

    /// Truck sprite edge as a fraction of canvas width.
    pub size_fraction: f64,

    /// Logo offset along the heading as a fraction of truck width.
    pub logo_offset_fraction: f64,
}

impl Default for TruckTuning {
    fn default() -> Self {
        Self {
            leg_seconds: 2.0,
            pickup_ease_power: 9,
            sweep_ease_power: 5,
            return_ease_power: 5,
            narrow_sweep_fraction: 1.0 / 8.0,
            size_fraction: 0.06,
            logo_offset_fraction: 0.1,
        }
    }
}
