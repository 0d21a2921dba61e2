// Applies the bulk snapshot and incremental events to the live scene.

use crate::domain::entities::{Carrier, Customer, Point, Retailer, Supplier, Truck};
use crate::domain::events::{SceneEvent, Snapshot};
use crate::domain::feed::EventRecord;
use crate::domain::systems::customers;
use crate::use_cases::scene::Scene;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    OutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::OutOfRange {
                collection,
                index,
                len,
            } => write!(f, "{collection} index {index} out of range (len {len})"),
        }
    }
}

impl std::error::Error for SyncError {}

fn check(collection: &'static str, index: usize, len: usize) -> Result<usize, SyncError> {
    if index < len {
        Ok(index)
    } else {
        Err(SyncError::OutOfRange {
            collection,
            index,
            len,
        })
    }
}

impl Scene {
    /// Replaces the whole model. The event feed is kept.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot, now: f64) {
        self.suppliers.clear();
        self.retailers.clear();
        self.carriers.clear();
        self.dispersing.clear();

        for seed in snapshot.suppliers {
            let id = self.next_supplier_id();
            self.suppliers.push(Supplier::new(id, seed.logo));
        }
        for seed in snapshot.retailers {
            let id = self.next_retailer_id();
            let mut retailer = Retailer::new(id, seed.logo);
            seed.overlay.apply(&mut retailer.demand, &mut retailer.offers);
            for _ in 0..seed.customers {
                let customer = self.spawn_customer(retailer.geometry.x, now);
                retailer.customers.push(customer);
            }
            self.retailers.push(retailer);
        }
        for seed in snapshot.carriers {
            let id = self.next_carrier_id();
            self.carriers.push(Carrier::new(id, seed.logo));
        }

        info!(
            suppliers = self.suppliers.len(),
            retailers = self.retailers.len(),
            carriers = self.carriers.len(),
            customers = self.queued_customers(),
            "snapshot applied"
        );
    }

    // New customers enter from below the canvas, under their retailer.
    fn spawn_customer(&mut self, retailer_x: f64, now: f64) -> Customer {
        let x = if retailer_x != 0.0 {
            retailer_x
        } else {
            self.viewport.width() / 2.0
        };
        let at = Point::new(x, self.viewport.height() + self.tuning.customer.spawn_margin);
        let id = self.next_customer_id();
        Customer::spawn(id, at, now, self.tuning.customer.base_speed)
    }

    /// Applies one incremental event. Out-of-range indices leave the model untouched.
    pub fn apply_event(&mut self, event: SceneEvent, now: f64) -> Result<(), SyncError> {
        let tag = event.tag();
        match event {
            SceneEvent::CustomerJoin { retailer } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                let x = self.retailers[r].geometry.x;
                let customer = self.spawn_customer(x, now);
                self.retailers[r].customers.push(customer);
            }
            SceneEvent::Jump { retailer, customer } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                let c = check("customer", customer, self.retailers[r].customers.len())?;
                let height = self.viewport.height();
                let hopped =
                    customers::jump(&mut self.retailers[r].customers[c], height, &self.tuning.customer);
                if !hopped {
                    debug!(retailer, customer, "jump ignored while airborne");
                }
            }
            SceneEvent::Satisfied { retailer, customer } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                let c = check("customer", customer, self.retailers[r].customers.len())?;
                let mut served = self.retailers[r].customers.remove(c);
                customers::start_served_dispersal(&mut served, now, &self.tuning.dispersal, &mut self.rng);
                self.dispersing.push(served);
            }
            SceneEvent::RetailerAdd { logo } => {
                let id = self.next_retailer_id();
                self.retailers.push(Retailer::new(id, logo));
            }
            SceneEvent::SupplierAdd { logo } => {
                let id = self.next_supplier_id();
                self.suppliers.push(Supplier::new(id, logo));
            }
            SceneEvent::CarrierAdd { logo } => {
                let id = self.next_carrier_id();
                self.carriers.push(Carrier::new(id, logo));
            }
            SceneEvent::RetailerRemove { retailer } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                let removed = self.retailers.remove(r);
                let evicted = removed.customers.len();
                for mut customer in removed.customers {
                    customers::start_evicted_dispersal(&mut customer, now, &self.tuning.dispersal, &mut self.rng);
                    self.dispersing.push(customer);
                }
                debug!(retailer_id = removed.id.0, evicted, "retailer closed");
            }
            SceneEvent::SupplierRemove { supplier } => {
                let s = check("supplier", supplier, self.suppliers.len())?;
                let removed = self.suppliers.remove(s);
                let mut cancelled = 0;
                for carrier in &mut self.carriers {
                    let before = carrier.trucks.len();
                    carrier.trucks.retain(|truck| truck.supplier != Some(removed.id));
                    cancelled += before - carrier.trucks.len();
                }
                debug!(supplier_id = removed.id.0, cancelled, "supplier closed");
            }
            SceneEvent::CarrierRemove { carrier } => {
                let c = check("carrier", carrier, self.carriers.len())?;
                self.carriers.remove(c);
            }
            SceneEvent::DispatchTruck {
                carrier,
                supplier,
                retailer,
                offer,
            } => {
                let c = check("carrier", carrier, self.carriers.len())?;
                let s = check("supplier", supplier, self.suppliers.len())?;
                let r = check("retailer", retailer, self.retailers.len())?;

                let supplier = &self.suppliers[s];
                let retailer = &mut self.retailers[r];
                let carrier = &mut self.carriers[c];
                let dock = Point::new(carrier.geometry.x, carrier.geometry.y);
                let mut truck = Truck::dispatched(now, dock, supplier.id, retailer.id);
                truck.supplier_anchor = Some(supplier.geometry);
                truck.retailer_anchor = Some(retailer.geometry);
                carrier.trucks.push(truck);

                if let Some(offer) = offer {
                    retailer.offers.set(offer, true);
                }
            }
            SceneEvent::EndOffer { retailer, offer } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                self.retailers[r].offers.set(offer, false);
            }
            SceneEvent::SetDemandCounter {
                retailer,
                offer,
                value,
            } => {
                let r = check("retailer", retailer, self.retailers.len())?;
                self.retailers[r].demand.set(offer, value);
            }
        }
        debug!(event = tag, "event applied");
        Ok(())
    }

    pub fn record_event(&mut self, record: EventRecord) {
        self.feed.push(record);
    }
}
