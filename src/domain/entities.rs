// Entity model: plain records mirrored from the remote airport state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SupplierId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RetailerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarrierId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Layout-computed placement. `x` is the horizontal centre, `y` the top edge
/// for suppliers/retailers and the centre for carrier docks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Image reference for a participant logo (URL as sent by the server).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogoHandle(pub String);

impl LogoHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The three product sizes a retailer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offer {
    Small,
    Medium,
    Large,
}

impl Offer {
    pub const ALL: [Offer; 3] = [Offer::Small, Offer::Medium, Offer::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            Offer::Small => "small",
            Offer::Medium => "medium",
            Offer::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandCounters {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

impl DemandCounters {
    pub fn get(&self, offer: Offer) -> u32 {
        match offer {
            Offer::Small => self.small,
            Offer::Medium => self.medium,
            Offer::Large => self.large,
        }
    }

    pub fn set(&mut self, offer: Offer, value: u32) {
        match offer {
            Offer::Small => self.small = value,
            Offer::Medium => self.medium = value,
            Offer::Large => self.large = value,
        }
    }
}

impl Default for DemandCounters {
    fn default() -> Self {
        Self {
            small: 10,
            medium: 10,
            large: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferFlags {
    pub small: bool,
    pub medium: bool,
    pub large: bool,
}

impl OfferFlags {
    pub fn is_active(&self, offer: Offer) -> bool {
        match offer {
            Offer::Small => self.small,
            Offer::Medium => self.medium,
            Offer::Large => self.large,
        }
    }

    pub fn set(&mut self, offer: Offer, active: bool) {
        match offer {
            Offer::Small => self.small = active,
            Offer::Medium => self.medium = active,
            Offer::Large => self.large = active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Supplier {
    pub id: SupplierId,
    pub logo: LogoHandle,
    pub geometry: Geometry,
}

impl Supplier {
    pub fn new(id: SupplierId, logo: LogoHandle) -> Self {
        Self {
            id,
            logo,
            geometry: Geometry::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Carrier {
    pub id: CarrierId,
    pub logo: LogoHandle,
    // Dock slot; `x`/`y` is the parked truck centre.
    pub geometry: Geometry,
    pub trucks: Vec<Truck>,
}

impl Carrier {
    pub fn new(id: CarrierId, logo: LogoHandle) -> Self {
        Self {
            id,
            logo,
            geometry: Geometry::default(),
            trucks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Truck {
    // Scene-clock seconds when the trip was dispatched.
    pub started_at: f64,
    pub x: f64,
    pub y: f64,
    // Sprite rotation in radians.
    pub angle: f64,
    // Where the carrier logo is stamped on the truck this frame.
    pub logo_anchor: Point,
    pub supplier: Option<SupplierId>,
    pub retailer: Option<RetailerId>,
    // Last resolved endpoint placement; lets a trip finish if an endpoint vanished.
    pub supplier_anchor: Option<Geometry>,
    pub retailer_anchor: Option<Geometry>,
}

impl Truck {
    pub fn dispatched(
        started_at: f64,
        dock: Point,
        supplier: SupplierId,
        retailer: RetailerId,
    ) -> Self {
        Self {
            started_at,
            x: dock.x,
            y: dock.y,
            angle: 0.0,
            logo_anchor: dock,
            supplier: Some(supplier),
            retailer: Some(retailer),
            supplier_anchor: None,
            retailer_anchor: None,
        }
    }

    pub fn in_transit(&self) -> bool {
        self.supplier.is_some() && self.retailer.is_some()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct Retailer {
    pub id: RetailerId,
    pub logo: LogoHandle,
    pub geometry: Geometry,
    pub demand: DemandCounters,
    pub offers: OfferFlags,
    // Queue order: index 0 is being served.
    pub customers: Vec<Customer>,
}

impl Retailer {
    pub fn new(id: RetailerId, logo: LogoHandle) -> Self {
        Self {
            id,
            logo,
            geometry: Geometry::default(),
            demand: DemandCounters::default(),
            offers: OfferFlags::default(),
            customers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    // Queue join time, restamped when the customer starts dispersing.
    pub started_at: f64,
    pub x: f64,
    pub y: f64,
    pub spawn_x: f64,
    pub spawn_y: f64,
    pub speed: f64,
    // Hop height above the ground and its per-tick velocity.
    pub z: f64,
    pub vz: f64,
    // Walk-cycle accumulator.
    pub time: f64,
    pub size: f64,
    pub frame: u8,
}

impl Customer {
    pub fn spawn(id: CustomerId, at: Point, started_at: f64, speed: f64) -> Self {
        Self {
            id,
            started_at,
            x: at.x,
            y: at.y,
            spawn_x: at.x,
            spawn_y: at.y,
            speed,
            z: 0.0,
            vz: 0.0,
            time: 0.0,
            size: 0.0,
            frame: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_airborne(&self) -> bool {
        self.z > 0.0
    }
}
