use crate::domain::entities::{Customer, Geometry, Point};
use crate::domain::tuning::{CustomerTuning, DispersalTuning};
use rand::Rng;

pub const STANDING_FRAME: u8 = 0;

/// Walk-cycle frame for an accumulator value; frames start at 1.
pub fn walk_frame(time: f64, frames: u32) -> u8 {
    let frames = i64::from(frames.max(1));
    (1 + (time.floor() as i64).rem_euclid(frames)) as u8
}

/// Where the customer at `position` in a retailer's queue stands.
pub fn queue_slot(retailer: &Geometry, position: usize, customer_size: f64, tuning: &CustomerTuning) -> Point {
    Point::new(
        retailer.x,
        retailer.y + retailer.height + position as f64 * customer_size * tuning.queue_spacing_fraction,
    )
}

/// Starts a hop if the customer is standing on the ground. Returns whether it hopped.
pub fn jump(customer: &mut Customer, canvas_height: f64, tuning: &CustomerTuning) -> bool {
    if customer.z != 0.0 {
        return false;
    }
    customer.vz = canvas_height * tuning.jump_impulse_fraction;
    true
}

/// Integrates the hop by one tick. Returns true while still airborne.
pub fn advance_hop(customer: &mut Customer, tuning: &CustomerTuning) -> bool {
    customer.z += customer.vz;
    customer.vz -= tuning.gravity;
    if customer.z <= 0.0 {
        customer.z = 0.0;
        customer.vz = 0.0;
        false
    } else {
        true
    }
}

/// One tick of approach-and-queue motion toward `target`.
pub fn advance_queued<R: Rng>(
    customer: &mut Customer,
    target: Point,
    now: f64,
    canvas_height: f64,
    tuning: &CustomerTuning,
    rng: &mut R,
) {
    customer.time += tuning.time_step;
    customer.size = canvas_height * tuning.size_fraction;

    let dx = target.x - customer.x;
    let dy = target.y - customer.y;
    let distance = dx.hypot(dy);
    let mut frame = walk_frame(customer.time, tuning.walk_frames);

    if distance > tuning.arrival_distance {
        if distance < canvas_height * tuning.flow_threshold_fraction {
            // Close to the slot: shuffle in proportionally with a little sideways jitter.
            frame = STANDING_FRAME;
            let step = customer.speed
                * (canvas_height / tuning.reference_height)
                * (distance / tuning.flow_divisor);
            let jitter = -tuning.jitter + tuning.jitter * rng.r#gen::<f64>();
            let angle = dy.atan2(dx + jitter);
            customer.x += angle.cos() * step;
            customer.y += angle.sin() * step;
        } else {
            let t = now - customer.started_at;
            if t >= tuning.approach_seconds {
                customer.x = target.x;
                customer.y = target.y;
            } else {
                let u = (t / tuning.approach_seconds).max(0.0);
                customer.x = (target.x - customer.spawn_x) * u + customer.spawn_x;
                customer.y = (target.y - customer.spawn_y) * u + customer.spawn_y;
            }
        }
    } else {
        frame = STANDING_FRAME;
    }

    if advance_hop(customer, tuning) {
        frame = STANDING_FRAME;
    }
    customer.frame = frame;
}

/// Hands a served customer over to the dispersing crowd.
pub fn start_served_dispersal<R: Rng>(
    customer: &mut Customer,
    now: f64,
    tuning: &DispersalTuning,
    rng: &mut R,
) {
    let sign = if rng.r#gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
    customer.speed *= sign * (tuning.served_spread_min + rng.r#gen::<f64>() * tuning.served_spread_range);
    customer.started_at = now;
}

/// Hands a customer whose retailer closed over to the dispersing crowd.
pub fn start_evicted_dispersal<R: Rng>(
    customer: &mut Customer,
    now: f64,
    tuning: &DispersalTuning,
    rng: &mut R,
) {
    customer.speed = tuning.evicted_speed_min + rng.r#gen::<f64>() * tuning.evicted_speed_range;
    customer.started_at = now;
}

/// One tick of walking away: decaying sideways speed, logarithmic downward drift.
pub fn advance_dispersing(
    customer: &mut Customer,
    now: f64,
    canvas_height: f64,
    customer_tuning: &CustomerTuning,
    tuning: &DispersalTuning,
) {
    customer.time += customer_tuning.time_step;
    customer.size = canvas_height * customer_tuning.size_fraction;

    let t = now - customer.started_at;
    customer.x += customer.speed * (-tuning.speed_decay * t + tuning.speed_base);
    customer.y += tuning.drift_scale * (t * t + 1.0).ln();

    customer.frame = if advance_hop(customer, customer_tuning) {
        STANDING_FRAME
    } else {
        walk_frame(customer.time, customer_tuning.walk_frames)
    };
}

pub fn has_left_view(customer: &Customer, canvas_height: f64) -> bool {
    customer.y - customer.size / 2.0 >= canvas_height
}
