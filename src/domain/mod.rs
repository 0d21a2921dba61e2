// Domain layer: scene entities, motion laws and layout.

pub mod entities;
pub mod events;
pub mod feed;
pub mod layout;
pub mod ports;
pub mod systems;
pub mod tuning;
pub mod viewport;

pub use entities::{
    Carrier, CarrierId, Customer, CustomerId, DemandCounters, Geometry, LogoHandle, Offer,
    OfferFlags, Point, Retailer, RetailerId, Supplier, SupplierId, Truck,
};
pub use events::{ChannelMessage, OfferOverlay, RetailerSeed, SceneEvent, Snapshot};
pub use feed::{EventFeed, EventRecord, FeedRow};
pub use viewport::Viewport;
