// Closed-form truck trip kinematics: dock -> supplier -> retailer -> dock.

use crate::domain::entities::{Geometry, Point};
use crate::domain::tuning::TruckTuning;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripPhase {
    ToPickup,
    ToDropoff,
    Returning,
    // Trip finished; the truck is parked and its references are cleared.
    Docked,
}

impl TripPhase {
    /// Resolves the phase and the 0..1 progress inside it from trip age.
    pub fn at(elapsed: f64, leg_seconds: f64) -> (TripPhase, f64) {
        let elapsed = elapsed.max(0.0);
        if elapsed < leg_seconds {
            (TripPhase::ToPickup, elapsed / leg_seconds)
        } else if elapsed < 2.0 * leg_seconds {
            (TripPhase::ToDropoff, (elapsed - leg_seconds) / leg_seconds)
        } else if elapsed < 3.0 * leg_seconds {
            (TripPhase::Returning, (elapsed - 2.0 * leg_seconds) / leg_seconds)
        } else {
            (TripPhase::Docked, 1.0)
        }
    }

    /// Outbound legs point the sprite back along the displacement; the return leg flips it.
    pub fn is_outbound(self) -> bool {
        matches!(self, TripPhase::ToPickup | TripPhase::ToDropoff)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TripEndpoints {
    pub dock: Point,
    pub supplier: Geometry,
    pub retailer: Geometry,
    pub truck_size: f64,
    pub canvas_width: f64,
}

impl TripEndpoints {
    /// Loading point under the supplier's midline.
    pub fn pickup(&self) -> Point {
        Point::new(
            self.supplier.x,
            self.supplier.y + self.supplier.height / 2.0 - self.truck_size / 2.0,
        )
    }

    pub fn dropoff(&self) -> Point {
        Point::new(self.retailer.x, self.retailer.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripSample {
    pub phase: TripPhase,
    pub position: Point,
}

// sin(pi*u - pi/2) mapped from -1..1 onto 0..1.
fn sine_ease(u: f64) -> f64 {
    (PI * u - PI / 2.0).sin() / 2.0 + 0.5
}

fn sine_ease_pow(u: f64, power: i32) -> f64 {
    (PI * u - PI / 2.0).sin().powi(power) / 2.0 + 0.5
}

/// Position of a truck `elapsed` seconds into its trip.
pub fn sample(elapsed: f64, ends: &TripEndpoints, tuning: &TruckTuning) -> TripSample {
    let (phase, u) = TripPhase::at(elapsed, tuning.leg_seconds);
    let dock = ends.dock;
    let pickup = ends.pickup();
    let dropoff = ends.dropoff();

    let position = match phase {
        TripPhase::ToPickup => Point::new(
            pickup.x + (1.0 - u) * (dock.x - pickup.x),
            dock.y + u.powi(tuning.pickup_ease_power) * (pickup.y - dock.y),
        ),
        TripPhase::ToDropoff => {
            let dx = dropoff.x - pickup.x;
            let vertical = if dx.abs() < ends.canvas_width * tuning.narrow_sweep_fraction {
                // Near-vertical sweeps stay on the plain ease; the steep curve
                // would stall the truck mid-leg and spin its heading.
                sine_ease(u)
            } else {
                sine_ease_pow(u, tuning.sweep_ease_power)
            };
            Point::new(
                pickup.x + sine_ease(u) * dx,
                pickup.y + vertical * (dropoff.y - pickup.y),
            )
        }
        TripPhase::Returning => {
            let v = 1.0 - u;
            Point::new(
                dropoff.x + (1.0 - v) * (dock.x - dropoff.x),
                dock.y + v.powi(tuning.return_ease_power) * (dropoff.y - dock.y),
            )
        }
        TripPhase::Docked => dock,
    };

    TripSample { phase, position }
}

/// Sprite angle and signed logo offset for a frame-to-frame move.
pub fn heading(previous: Point, current: Point, phase: TripPhase) -> (f64, f64) {
    let backward = (previous.y - current.y).atan2(previous.x - current.x);
    if phase == TripPhase::Docked {
        (0.0, 0.0)
    } else if phase.is_outbound() {
        (backward, 1.0)
    } else {
        ((current.y - previous.y).atan2(current.x - previous.x), -1.0)
    }
}

/// Where the logo sits: offset along the backward displacement direction.
pub fn logo_anchor(previous: Point, current: Point, offset: f64) -> Point {
    let a = (previous.y - current.y).atan2(previous.x - current.x);
    Point::new(current.x + offset * a.cos(), current.y + offset * a.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn endpoints(supplier_x: f64, retailer_x: f64) -> TripEndpoints {
        TripEndpoints {
            dock: Point::new(1900.0, 300.0),
            supplier: Geometry {
                x: supplier_x,
                y: 0.0,
                width: 205.2,
                height: 108.0,
            },
            retailer: Geometry {
                x: retailer_x,
                y: 617.0,
                width: 108.0,
                height: 108.0,
            },
            truck_size: 115.2,
            canvas_width: 1920.0,
        }
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn phase_boundaries_follow_two_second_legs() {
        assert_eq!(TripPhase::at(0.0, 2.0).0, TripPhase::ToPickup);
        assert_eq!(TripPhase::at(1.999, 2.0).0, TripPhase::ToPickup);
        assert_eq!(TripPhase::at(2.0, 2.0).0, TripPhase::ToDropoff);
        assert_eq!(TripPhase::at(4.0, 2.0).0, TripPhase::Returning);
        assert_eq!(TripPhase::at(6.0, 2.0).0, TripPhase::Docked);
        assert_eq!(TripPhase::at(-3.0, 2.0), (TripPhase::ToPickup, 0.0));
    }

    #[test]
    fn trip_starts_at_dock_and_passes_supplier_then_retailer() {
        let ends = endpoints(640.0, 1280.0);
        let tuning = TruckTuning::default();

        assert!(close(sample(0.0, &ends, &tuning).position, ends.dock));
        assert!(close(sample(2.0, &ends, &tuning).position, ends.pickup()));
        assert!(close(sample(4.0, &ends, &tuning).position, ends.dropoff()));

        let end = sample(6.0, &ends, &tuning);
        assert_eq!(end.phase, TripPhase::Docked);
        assert!(close(end.position, ends.dock));
    }

    #[test]
    fn path_is_continuous_across_leg_boundaries() {
        let tuning = TruckTuning::default();
        for ends in [endpoints(640.0, 1280.0), endpoints(640.0, 700.0)] {
            for boundary in [2.0, 4.0, 6.0] {
                let before = sample(boundary - EPS, &ends, &tuning).position;
                let after = sample(boundary, &ends, &tuning).position;
                assert!(
                    before.distance_to(after) < 1e-2,
                    "jump of {} at t={boundary}",
                    before.distance_to(after)
                );
            }
        }
    }

    #[test]
    fn sample_is_pure_in_elapsed_time() {
        let ends = endpoints(640.0, 1280.0);
        let tuning = TruckTuning::default();
        assert_eq!(sample(3.3, &ends, &tuning), sample(3.3, &ends, &tuning));
    }

    #[test]
    fn narrow_sweep_uses_plain_sine_for_vertical_motion() {
        let tuning = TruckTuning::default();
        let narrow = endpoints(640.0, 700.0);
        let wide = endpoints(640.0, 1280.0);

        let narrow_mid = sample(2.5, &narrow, &tuning).position;
        let wide_mid = sample(2.5, &wide, &tuning).position;
        let narrow_frac = (narrow_mid.y - narrow.pickup().y) / (narrow.dropoff().y - narrow.pickup().y);
        let wide_frac = (wide_mid.y - wide.pickup().y) / (wide.dropoff().y - wide.pickup().y);
        assert!((narrow_frac - sine_ease(0.25)).abs() < 1e-9);
        assert!((wide_frac - sine_ease_pow(0.25, 5)).abs() < 1e-9);
    }

    #[test]
    fn return_leg_flips_heading_and_logo_side() {
        let prev = Point::new(10.0, 10.0);
        let cur = Point::new(20.0, 10.0);
        let (out_angle, out_sign) = heading(prev, cur, TripPhase::ToDropoff);
        let (back_angle, back_sign) = heading(prev, cur, TripPhase::Returning);
        assert!((out_angle - PI).abs() < 1e-9);
        assert!(back_angle.abs() < 1e-9);
        assert_eq!(out_sign, 1.0);
        assert_eq!(back_sign, -1.0);
    }
}
