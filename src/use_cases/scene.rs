// Live scene state and the per-tick motion pass.

use crate::domain::entities::{
    Carrier, CarrierId, Customer, CustomerId, Point, Retailer, RetailerId, Supplier, SupplierId,
};
use crate::domain::feed::EventFeed;
use crate::domain::layout::{self, LayoutCounts, SceneLayout};
use crate::domain::systems::{customers, trip};
use crate::domain::tuning::SceneTuning;
use crate::domain::viewport::Viewport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

pub struct Scene {
    pub(crate) suppliers: Vec<Supplier>,
    pub(crate) carriers: Vec<Carrier>,
    pub(crate) retailers: Vec<Retailer>,
    // Customers walking away after leaving a queue.
    pub(crate) dispersing: Vec<Customer>,
    pub(crate) feed: EventFeed,
    pub(crate) viewport: Viewport,
    pub(crate) tuning: SceneTuning,
    pub(crate) layout: SceneLayout,
    pub(crate) rng: StdRng,
    next_id: u64,
}

impl Scene {
    pub fn new(viewport: Viewport, tuning: SceneTuning, rng: StdRng) -> Self {
        let layout = layout::compute(LayoutCounts::default(), viewport.width(), viewport.height());
        Self {
            suppliers: Vec::new(),
            carriers: Vec::new(),
            retailers: Vec::new(),
            dispersing: Vec::new(),
            feed: EventFeed::default(),
            viewport,
            tuning,
            layout,
            rng,
            next_id: 1,
        }
    }

    /// Deterministic scene for tests and replays.
    pub fn with_seed(viewport: Viewport, seed: u64) -> Self {
        Self::new(viewport, SceneTuning::default(), StdRng::seed_from_u64(seed))
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn carriers(&self) -> &[Carrier] {
        &self.carriers
    }

    pub fn retailers(&self) -> &[Retailer] {
        &self.retailers
    }

    pub fn dispersing(&self) -> &[Customer] {
        &self.dispersing
    }

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    pub fn queued_customers(&self) -> usize {
        self.retailers.iter().map(|r| r.customers.len()).sum()
    }

    pub fn trucks_in_transit(&self) -> usize {
        self.carriers.iter().map(|c| c.trucks.len()).sum()
    }

    pub(crate) fn next_supplier_id(&mut self) -> SupplierId {
        SupplierId(self.bump_id())
    }

    pub(crate) fn next_retailer_id(&mut self) -> RetailerId {
        RetailerId(self.bump_id())
    }

    pub(crate) fn next_carrier_id(&mut self) -> CarrierId {
        CarrierId(self.bump_id())
    }

    pub(crate) fn next_customer_id(&mut self) -> CustomerId {
        CustomerId(self.bump_id())
    }

    fn bump_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn counts(&self) -> LayoutCounts {
        LayoutCounts {
            suppliers: self.suppliers.len(),
            retailers: self.retailers.len(),
            carriers: self.carriers.len(),
        }
    }

    /// Recomputes layout and writes the placements back onto the entities.
    pub fn relayout(&mut self) {
        self.layout = layout::compute(self.counts(), self.viewport.width(), self.viewport.height());
        for (supplier, geometry) in self.suppliers.iter_mut().zip(&self.layout.suppliers) {
            supplier.geometry = *geometry;
        }
        for (retailer, geometry) in self.retailers.iter_mut().zip(&self.layout.retailers) {
            retailer.geometry = *geometry;
        }
        for (carrier, geometry) in self.carriers.iter_mut().zip(&self.layout.docks) {
            carrier.geometry = *geometry;
        }
    }

    /// Advances every trajectory to scene time `now` (seconds).
    pub fn animate(&mut self, now: f64) {
        self.relayout();
        self.advance_trucks(now);
        self.advance_queues(now);
        self.advance_dispersing(now);
    }

    fn advance_trucks(&mut self, now: f64) {
        let Scene {
            suppliers,
            retailers,
            carriers,
            tuning,
            viewport,
            ..
        } = self;
        let truck_tuning = &tuning.truck;
        let canvas_width = viewport.width();
        let truck_size = canvas_width * truck_tuning.size_fraction;

        for carrier in carriers.iter_mut() {
            let dock = Point::new(carrier.geometry.x, carrier.geometry.y);
            let logo_offset = truck_size * truck_tuning.logo_offset_fraction;
            let before = carrier.trucks.len();

            carrier.trucks.retain_mut(|truck| {
                // Refresh endpoints while they exist; otherwise finish against the last known spot.
                if let Some(id) = truck.supplier
                    && let Some(s) = suppliers.iter().find(|s| s.id == id)
                {
                    truck.supplier_anchor = Some(s.geometry);
                }
                if let Some(id) = truck.retailer
                    && let Some(r) = retailers.iter().find(|r| r.id == id)
                {
                    truck.retailer_anchor = Some(r.geometry);
                }
                let (Some(supplier), Some(retailer)) = (truck.supplier_anchor, truck.retailer_anchor)
                else {
                    return false;
                };

                let ends = trip::TripEndpoints {
                    dock,
                    supplier,
                    retailer,
                    truck_size,
                    canvas_width,
                };
                let previous = truck.position();
                let sample = trip::sample(now - truck.started_at, &ends, truck_tuning);
                let (angle, logo_sign) = trip::heading(previous, sample.position, sample.phase);

                truck.x = sample.position.x;
                truck.y = sample.position.y;
                truck.angle = angle;
                truck.logo_anchor = trip::logo_anchor(previous, sample.position, logo_sign * logo_offset);

                if sample.phase == trip::TripPhase::Docked {
                    truck.supplier = None;
                    truck.retailer = None;
                }
                truck.in_transit()
            });

            let finished = before - carrier.trucks.len();
            if finished > 0 {
                debug!(carrier_id = carrier.id.0, finished, "trucks returned to dock");
            }
        }
    }

    fn advance_queues(&mut self, now: f64) {
        let Scene {
            retailers,
            tuning,
            viewport,
            rng,
            ..
        } = self;
        let canvas_height = viewport.height();
        let customer_tuning = &tuning.customer;

        for retailer in retailers.iter_mut() {
            let geometry = retailer.geometry;
            for (position, customer) in retailer.customers.iter_mut().enumerate() {
                let size = canvas_height * customer_tuning.size_fraction;
                let target = customers::queue_slot(&geometry, position, size, customer_tuning);
                customers::advance_queued(customer, target, now, canvas_height, customer_tuning, rng);
            }
        }
    }

    fn advance_dispersing(&mut self, now: f64) {
        let canvas_height = self.viewport.height();
        let customer_tuning = self.tuning.customer;
        let dispersal = self.tuning.dispersal;

        self.dispersing.retain_mut(|customer| {
            customers::advance_dispersing(customer, now, canvas_height, &customer_tuning, &dispersal);
            !customers::has_left_view(customer, canvas_height)
        });
    }

    /// Resizes the canvas and rescales every live coordinate proportionally.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        let rescale = self.viewport.resize(css_width, css_height, pixel_ratio);
        if rescale.is_identity() {
            return;
        }

        let queued = self.retailers.iter_mut().flat_map(|r| r.customers.iter_mut());
        for customer in queued.chain(self.dispersing.iter_mut()) {
            let p = rescale.apply(customer.position());
            customer.x = p.x;
            customer.y = p.y;
            let spawn = rescale.apply(Point::new(customer.spawn_x, customer.spawn_y));
            customer.spawn_x = spawn.x;
            customer.spawn_y = spawn.y;
        }
        for truck in self.carriers.iter_mut().flat_map(|c| c.trucks.iter_mut()) {
            let p = rescale.apply(truck.position());
            truck.x = p.x;
            truck.y = p.y;
            truck.logo_anchor = rescale.apply(truck.logo_anchor);
        }

        self.relayout();
        debug!(
            width = self.viewport.width(),
            height = self.viewport.height(),
            "viewport resized"
        );
    }

    pub fn toggle_embedded_view(&mut self) -> bool {
        self.viewport.toggle_embedded_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LogoHandle;
    use crate::domain::events::SceneEvent;

    fn scene_with_traffic() -> Scene {
        let mut scene = Scene::with_seed(Viewport::new(960.0, 540.0, 2.0), 42);
        let logo = || LogoHandle::new("logo.png");
        for event in [
            SceneEvent::SupplierAdd { logo: logo() },
            SceneEvent::RetailerAdd { logo: logo() },
            SceneEvent::CarrierAdd { logo: logo() },
        ] {
            scene.apply_event(event, 0.0).expect("event applies");
        }
        scene.animate(0.0);
        scene
    }

    #[test]
    fn finished_trips_are_discarded() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(
                SceneEvent::DispatchTruck {
                    carrier: 0,
                    supplier: 0,
                    retailer: 0,
                    offer: None,
                },
                1.0,
            )
            .expect("dispatch applies");

        for step in 0..=10 {
            scene.animate(1.0 + step as f64 * 0.5);
        }
        assert_eq!(scene.trucks_in_transit(), 1);

        scene.animate(7.0);
        assert_eq!(scene.trucks_in_transit(), 0);
    }

    #[test]
    fn truck_follows_the_trip_curve() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(
                SceneEvent::DispatchTruck {
                    carrier: 0,
                    supplier: 0,
                    retailer: 0,
                    offer: None,
                },
                0.0,
            )
            .expect("dispatch applies");

        scene.animate(2.0);
        let truck = &scene.carriers()[0].trucks[0];
        let supplier = scene.suppliers()[0].geometry;
        assert!((truck.x - supplier.x).abs() < 1e-6);
    }

    #[test]
    fn noop_resize_leaves_positions_alone() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(SceneEvent::CustomerJoin { retailer: 0 }, 0.0)
            .expect("join applies");
        scene.animate(0.5);
        let before = scene.retailers()[0].customers[0].position();

        scene.resize(960.0, 540.0, 2.0);
        assert_eq!(scene.retailers()[0].customers[0].position(), before);
    }

    #[test]
    fn resize_scales_positions_linearly() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(SceneEvent::CustomerJoin { retailer: 0 }, 0.0)
            .expect("join applies");
        scene.animate(0.5);
        let before = scene.retailers()[0].customers[0].position();

        scene.resize(1920.0, 540.0, 2.0);
        let after = scene.retailers()[0].customers[0].position();
        assert!((after.x - before.x * 2.0).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
        assert_eq!(scene.viewport().width(), 3840.0);
    }

    #[test]
    fn pixel_ratio_change_rescales_device_positions() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(SceneEvent::CustomerJoin { retailer: 0 }, 0.0)
            .expect("join applies");
        scene.animate(0.5);
        let before = scene.retailers()[0].customers[0].position();

        scene.resize(960.0, 540.0, 1.0);
        let after = scene.retailers()[0].customers[0].position();
        assert!((after.x - before.x / 2.0).abs() < 1e-9);
        assert!((after.y - before.y / 2.0).abs() < 1e-9);
        assert_eq!(scene.viewport().height(), 540.0);
    }

    #[test]
    fn dispersing_customers_leave_the_scene() {
        let mut scene = scene_with_traffic();
        scene
            .apply_event(SceneEvent::CustomerJoin { retailer: 0 }, 0.0)
            .expect("join applies");
        scene
            .apply_event(
                SceneEvent::Satisfied {
                    retailer: 0,
                    customer: 0,
                },
                0.0,
            )
            .expect("satisfied applies");
        assert_eq!(scene.dispersing().len(), 1);

        let mut now = 0.0;
        while !scene.dispersing().is_empty() {
            now += 0.017;
            scene.animate(now);
            assert!(now < 60.0, "customer never left");
        }
    }
}
