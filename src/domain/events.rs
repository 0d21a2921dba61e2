// Domain-level inputs: the bulk snapshot and the incremental scene events.

use crate::domain::entities::{DemandCounters, LogoHandle, Offer, OfferFlags};
use crate::domain::feed::EventRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub suppliers: Vec<SupplierSeed>,
    pub retailers: Vec<RetailerSeed>,
    pub carriers: Vec<CarrierSeed>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierSeed {
    pub logo: LogoHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarrierSeed {
    pub logo: LogoHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetailerSeed {
    pub logo: LogoHandle,
    // Customers already queued when the snapshot was taken.
    pub customers: usize,
    pub overlay: OfferOverlay,
}

/// Sparse overrides for a retailer's demand counters and offer flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferOverlay {
    pub small: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
    pub small_active: Option<bool>,
    pub medium_active: Option<bool>,
    pub large_active: Option<bool>,
}

impl OfferOverlay {
    pub fn apply(&self, demand: &mut DemandCounters, offers: &mut OfferFlags) {
        let counters = [
            (Offer::Small, self.small),
            (Offer::Medium, self.medium),
            (Offer::Large, self.large),
        ];
        for (offer, value) in counters {
            if let Some(value) = value {
                demand.set(offer, value);
            }
        }

        let flags = [
            (Offer::Small, self.small_active),
            (Offer::Medium, self.medium_active),
            (Offer::Large, self.large_active),
        ];
        for (offer, active) in flags {
            if let Some(active) = active {
                offers.set(offer, active);
            }
        }
    }
}

/// Incremental mutations. Indices address the current ordered sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    CustomerJoin {
        retailer: usize,
    },
    Jump {
        retailer: usize,
        customer: usize,
    },
    Satisfied {
        retailer: usize,
        customer: usize,
    },
    RetailerAdd {
        logo: LogoHandle,
    },
    SupplierAdd {
        logo: LogoHandle,
    },
    CarrierAdd {
        logo: LogoHandle,
    },
    RetailerRemove {
        retailer: usize,
    },
    SupplierRemove {
        supplier: usize,
    },
    CarrierRemove {
        carrier: usize,
    },
    DispatchTruck {
        carrier: usize,
        supplier: usize,
        retailer: usize,
        offer: Option<Offer>,
    },
    EndOffer {
        retailer: usize,
        offer: Offer,
    },
    SetDemandCounter {
        retailer: usize,
        offer: Offer,
        value: u32,
    },
}

impl SceneEvent {
    /// Short name used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            SceneEvent::CustomerJoin { .. } => "customer-join",
            SceneEvent::Jump { .. } => "jump",
            SceneEvent::Satisfied { .. } => "satisfied",
            SceneEvent::RetailerAdd { .. } => "retailer-add",
            SceneEvent::SupplierAdd { .. } => "supplier-add",
            SceneEvent::CarrierAdd { .. } => "carrier-add",
            SceneEvent::RetailerRemove { .. } => "retailer-remove",
            SceneEvent::SupplierRemove { .. } => "supplier-remove",
            SceneEvent::CarrierRemove { .. } => "carrier-remove",
            SceneEvent::DispatchTruck { .. } => "dispatch-truck",
            SceneEvent::EndOffer { .. } => "end-offer",
            SceneEvent::SetDemandCounter { .. } => "set-demand-counter",
        }
    }
}

/// Everything the live channel can deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    Scene(SceneEvent),
    Record(EventRecord),
}
