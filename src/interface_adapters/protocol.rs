// Wire protocol DTOs and conversions for the view endpoints.
// `GET .../data` returns a `SnapshotDto`; the push channel sends `ViewMessage` frames.

use crate::domain::entities::{LogoHandle, Offer};
use crate::domain::events::{
    CarrierSeed, ChannelMessage, OfferOverlay, RetailerSeed, SceneEvent, Snapshot, SupplierSeed,
};
use crate::domain::feed::EventRecord;
use crate::domain::ports::SourceError;
use serde::Deserialize;
use serde_json::Value;

/// Bulk state document. Missing or `null` lists count as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotDto {
    #[serde(default)]
    pub suppliers: Option<Vec<ParticipantDto>>,
    #[serde(default)]
    pub retailers: Option<Vec<RetailerDto>>,
    #[serde(default)]
    pub carriers: Option<Vec<ParticipantDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDto {
    #[serde(default)]
    pub logo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetailerDto {
    #[serde(default)]
    pub logo: String,
    // Only the count matters; entries are opaque.
    #[serde(default)]
    pub customers: Option<Vec<Value>>,
    #[serde(default)]
    pub offers: Option<OfferOverlayDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferOverlayDto {
    pub small: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
    pub small_active: Option<bool>,
    pub medium_active: Option<bool>,
    pub large_active: Option<bool>,
}

impl From<OfferOverlayDto> for OfferOverlay {
    fn from(dto: OfferOverlayDto) -> Self {
        Self {
            small: dto.small,
            medium: dto.medium,
            large: dto.large,
            small_active: dto.small_active,
            medium_active: dto.medium_active,
            large_active: dto.large_active,
        }
    }
}

impl From<RetailerDto> for RetailerSeed {
    fn from(dto: RetailerDto) -> Self {
        Self {
            logo: LogoHandle::new(dto.logo),
            customers: dto.customers.map_or(0, |c| c.len()),
            overlay: dto.offers.map(OfferOverlay::from).unwrap_or_default(),
        }
    }
}

impl From<SnapshotDto> for Snapshot {
    fn from(dto: SnapshotDto) -> Self {
        Self {
            suppliers: dto
                .suppliers
                .unwrap_or_default()
                .into_iter()
                .map(|s| SupplierSeed {
                    logo: LogoHandle::new(s.logo),
                })
                .collect(),
            retailers: dto
                .retailers
                .unwrap_or_default()
                .into_iter()
                .map(RetailerSeed::from)
                .collect(),
            carriers: dto
                .carriers
                .unwrap_or_default()
                .into_iter()
                .map(|c| CarrierSeed {
                    logo: LogoHandle::new(c.logo),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferDto {
    Small,
    Medium,
    Large,
}

impl From<OfferDto> for Offer {
    fn from(dto: OfferDto) -> Self {
        match dto {
            OfferDto::Small => Offer::Small,
            OfferDto::Medium => Offer::Medium,
            OfferDto::Large => Offer::Large,
        }
    }
}

/// Frames pushed by the server. Short legacy tags and descriptive tags both decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ViewMessage {
    #[serde(rename = "customer", alias = "customer-join")]
    CustomerJoin { r: usize },
    #[serde(rename = "jump")]
    Jump { r: usize, c: usize },
    #[serde(rename = "satisfied", alias = "leave")]
    Satisfied { r: usize, c: usize },
    #[serde(rename = "retailer", alias = "retailer-add")]
    RetailerAdd {
        #[serde(default)]
        logo: String,
    },
    #[serde(rename = "supplier", alias = "supplier-add")]
    SupplierAdd {
        #[serde(default)]
        logo: String,
    },
    #[serde(rename = "carrier", alias = "carrier-add")]
    CarrierAdd {
        #[serde(default)]
        logo: String,
    },
    #[serde(rename = "rmretailer", alias = "retailer-remove")]
    RetailerRemove { r: usize },
    // Reset broadcasts address the supplier as `r`.
    #[serde(rename = "rmsupplier", alias = "supplier-remove")]
    SupplierRemove {
        #[serde(alias = "r")]
        s: usize,
    },
    #[serde(rename = "rmcarrier", alias = "carrier-remove")]
    CarrierRemove { c: usize },
    #[serde(rename = "gocarrier", alias = "dispatch-truck")]
    DispatchTruck {
        c: usize,
        s: usize,
        r: usize,
        #[serde(default)]
        o: Option<OfferDto>,
    },
    #[serde(rename = "end-offer")]
    EndOffer { r: usize, o: OfferDto },
    #[serde(rename = "set-demand-counter")]
    SetDemandCounter { r: usize, o: OfferDto, c: u32 },
    #[serde(rename = "small")]
    Small { r: usize, c: u32 },
    #[serde(rename = "medium")]
    Medium { r: usize, c: u32 },
    #[serde(rename = "large")]
    Large { r: usize, c: u32 },
    #[serde(rename = "event")]
    Event { event: Value },
}

impl From<ViewMessage> for ChannelMessage {
    fn from(message: ViewMessage) -> Self {
        let event = match message {
            ViewMessage::Event { event } => {
                return ChannelMessage::Record(EventRecord::from_payload(event));
            }
            ViewMessage::CustomerJoin { r } => SceneEvent::CustomerJoin { retailer: r },
            ViewMessage::Jump { r, c } => SceneEvent::Jump {
                retailer: r,
                customer: c,
            },
            ViewMessage::Satisfied { r, c } => SceneEvent::Satisfied {
                retailer: r,
                customer: c,
            },
            ViewMessage::RetailerAdd { logo } => SceneEvent::RetailerAdd {
                logo: LogoHandle::new(logo),
            },
            ViewMessage::SupplierAdd { logo } => SceneEvent::SupplierAdd {
                logo: LogoHandle::new(logo),
            },
            ViewMessage::CarrierAdd { logo } => SceneEvent::CarrierAdd {
                logo: LogoHandle::new(logo),
            },
            ViewMessage::RetailerRemove { r } => SceneEvent::RetailerRemove { retailer: r },
            ViewMessage::SupplierRemove { s } => SceneEvent::SupplierRemove { supplier: s },
            ViewMessage::CarrierRemove { c } => SceneEvent::CarrierRemove { carrier: c },
            ViewMessage::DispatchTruck { c, s, r, o } => SceneEvent::DispatchTruck {
                carrier: c,
                supplier: s,
                retailer: r,
                offer: o.map(Offer::from),
            },
            ViewMessage::EndOffer { r, o } => SceneEvent::EndOffer {
                retailer: r,
                offer: o.into(),
            },
            ViewMessage::SetDemandCounter { r, o, c } => SceneEvent::SetDemandCounter {
                retailer: r,
                offer: o.into(),
                value: c,
            },
            ViewMessage::Small { r, c } => counter(r, Offer::Small, c),
            ViewMessage::Medium { r, c } => counter(r, Offer::Medium, c),
            ViewMessage::Large { r, c } => counter(r, Offer::Large, c),
        };
        ChannelMessage::Scene(event)
    }
}

fn counter(retailer: usize, offer: Offer, value: u32) -> SceneEvent {
    SceneEvent::SetDemandCounter {
        retailer,
        offer,
        value,
    }
}

/// Decodes one text frame from the push channel.
pub fn decode_view_message(text: &str) -> Result<ChannelMessage, SourceError> {
    serde_json::from_str::<ViewMessage>(text)
        .map(ChannelMessage::from)
        .map_err(|e| SourceError::Malformed(e.to_string()))
}
