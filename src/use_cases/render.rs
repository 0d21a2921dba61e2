// Paints one frame of the scene through the Painter port.

use crate::domain::entities::{Carrier, Customer, Geometry, Offer, Point, Retailer, Supplier, Truck};
use crate::domain::layout::SceneLayout;
use crate::domain::ports::{PaintError, PaintResult, Painter, Rect, Sprite, SpriteFrame};
use crate::use_cases::scene::Scene;
use tracing::trace;

const BACKGROUND: &str = "lightgreen";
const DOCK: &str = "#3a3a39";
const LANE: &str = "white";
const ISLAND: &str = "#FEFE00";
const LABEL: &str = "black";
const APRON: &str = "gray";
const DEMAND_BAR: &str = "white";

const ISLAND_LABEL: &str = "HEATHROW";
// Height over width of the control tower artwork.
const TOWER_ASPECT: f64 = 2.0;

const PERSON_COLUMNS: u8 = 9;
const PERSON_ROWS: u8 = 4;
const QUEUED_ROW: u8 = 0;
const DISPERSING_ROW: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub calls: u32,
    // Paint calls that failed and were dropped for this frame.
    pub skipped: u32,
}

impl RenderStats {
    fn track(&mut self, result: PaintResult) {
        self.calls += 1;
        if let Err(err) = result {
            self.skipped += 1;
            match err {
                PaintError::AssetNotReady(asset) => trace!(asset = %asset, "asset not ready, skipped"),
                PaintError::Surface(message) => trace!(error = %message, "paint call failed, skipped"),
            }
        }
    }
}

/// Paints the whole scene, back to front. Failed calls are skipped, never fatal.
pub fn render(scene: &Scene, painter: &mut dyn Painter) -> RenderStats {
    let layout = scene.layout();
    let mut stats = RenderStats::default();
    let mut frame = Frame {
        painter,
        stats: &mut stats,
    };

    frame.painter.begin_frame(layout.width, layout.height);
    frame.paint(|p| {
        p.fill_rect(
            BACKGROUND,
            Rect {
                x: 0.0,
                y: 0.0,
                width: layout.width,
                height: layout.height,
            },
        )
    });

    let truck_size = layout.width * scene.tuning().truck.size_fraction;
    for carrier in scene.carriers() {
        frame.dock(carrier, layout);
        frame.trucks(carrier, truck_size, layout);
    }
    for supplier in scene.suppliers() {
        frame.supplier(supplier);
    }
    frame.tower(layout);
    frame.island(layout);
    frame.paint(|p| {
        p.fill_rect(
            APRON,
            Rect {
                x: 0.0,
                y: layout.apron_y,
                width: layout.width,
                height: layout.height - layout.apron_y,
            },
        )
    });
    for retailer in scene.retailers() {
        frame.retailer(retailer, layout.height);
    }
    for customer in scene.dispersing() {
        frame.customer(customer, DISPERSING_ROW, layout.height);
    }
    frame.painter.end_frame();

    stats
}

struct Frame<'a> {
    painter: &'a mut dyn Painter,
    stats: &'a mut RenderStats,
}

impl Frame<'_> {
    fn paint(&mut self, call: impl FnOnce(&mut dyn Painter) -> PaintResult) {
        let result = call(&mut *self.painter);
        self.stats.track(result);
    }

    fn dock(&mut self, carrier: &Carrier, layout: &SceneLayout) {
        let dock = carrier.geometry;
        let left = dock.x - dock.width / 1.5;
        let top = dock.y - dock.height / 2.0;
        let bottom = dock.y + dock.height / 2.0;
        let lane_width = layout.width * 0.005;

        self.paint(|p| {
            p.fill_rect(
                DOCK,
                Rect {
                    x: left,
                    y: top,
                    width: dock.width * 2.0,
                    height: dock.height,
                },
            )
        });
        for y in [top, bottom] {
            self.paint(|p| p.stroke_line(LANE, lane_width, Point::new(left, y), Point::new(layout.width, y)));
        }
    }

    fn trucks(&mut self, carrier: &Carrier, size: f64, layout: &SceneLayout) {
        let moving: Vec<&Truck> = carrier.trucks.iter().filter(|t| t.in_transit()).collect();
        if moving.is_empty() {
            // Parked truck waiting at the dock.
            let at = Point::new(carrier.geometry.x, carrier.geometry.y);
            self.paint(|p| p.draw_sprite(Sprite::Truck, at, size, size, 0.0));
            let logo_at = Point::new(at.x + size / 10.0, at.y);
            self.paint(|p| p.draw_logo(&carrier.logo, logo_at, size * 0.2));
            return;
        }

        for truck in moving {
            // Trucks slide out from under the supplier row.
            let clip_top = truck
                .supplier_anchor
                .map(|s| s.y + s.height)
                .unwrap_or_default();
            let clip = self.painter.push_clip(Rect {
                x: 0.0,
                y: clip_top,
                width: layout.width,
                height: layout.height,
            });
            let clipped = clip.is_ok();
            self.stats.track(clip);
            self.paint(|p| p.draw_sprite(Sprite::Truck, truck.position(), size, size, truck.angle));
            self.paint(|p| p.draw_logo(&carrier.logo, truck.logo_anchor, size * 0.2));
            if clipped {
                self.painter.pop_clip();
            }
        }
    }

    fn supplier(&mut self, supplier: &Supplier) {
        let g = supplier.geometry;
        let center = Point::new(g.x, g.y + g.height / 2.0);
        self.paint(|p| p.draw_sprite(Sprite::Warehouse, center, g.width, g.height, 0.0));
        let logo_at = Point::new(g.x, g.y + g.height / 1.7);
        self.paint(|p| p.draw_logo(&supplier.logo, logo_at, g.height * 0.3));
    }

    fn tower(&mut self, layout: &SceneLayout) {
        let width = layout.tower.width;
        let height = width * TOWER_ASPECT;
        let anchor = layout.tower.anchor;
        let center = Point::new(anchor.x, anchor.y - height / 1.25 + height / 2.0);
        self.paint(|p| p.draw_sprite(Sprite::Tower, center, width, height, 0.0));
    }

    fn island(&mut self, layout: &SceneLayout) {
        let island = layout.island;
        self.paint(|p| p.fill_ellipse(ISLAND, island.center, island.radius_x, island.radius_y));
        self.paint(|p| p.fill_text(LABEL, ISLAND_LABEL, island.label_at, island.font_size));
    }

    fn retailer(&mut self, retailer: &Retailer, canvas_height: f64) {
        let g = retailer.geometry;
        // The live feed announces an offer by zeroing its counter.
        for offer in Offer::ALL {
            if retailer.offers.is_active(offer) || retailer.demand.get(offer) == 0 {
                self.offer_bubble(offer, g);
            }
        }
        self.demand_bars(retailer);

        let center = Point::new(g.x, g.y + g.height / 2.0);
        self.paint(|p| p.draw_sprite(Sprite::Shop, center, g.width, g.height, 0.0));
        self.paint(|p| p.draw_logo(&retailer.logo, Point::new(g.x, g.y), g.height * 0.2));

        for customer in &retailer.customers {
            self.customer(customer, QUEUED_ROW, canvas_height);
        }
    }

    // Small sits left of the shop, medium above it, large to the right.
    fn offer_bubble(&mut self, offer: Offer, g: Geometry) {
        let s = g.width * 0.5;
        let radius = s * 0.25;
        let (tail, bubble, cup) = match offer {
            Offer::Small => {
                let left = g.x - g.width;
                let cup = s * 0.5;
                (
                    Point::new(g.x - g.width / 2.0, g.y + g.height / 4.0),
                    Rect {
                        x: left,
                        y: g.y,
                        width: s,
                        height: s,
                    },
                    Rect {
                        x: left + cup / 2.0,
                        y: g.y - s * 0.8,
                        width: cup,
                        height: cup,
                    },
                )
            }
            Offer::Medium => {
                let left = g.x - s / 2.0;
                let cup = s * 0.75;
                (
                    Point::new(g.x, g.y),
                    Rect {
                        x: left,
                        y: g.y - s / 2.0,
                        width: s,
                        height: s,
                    },
                    Rect {
                        x: left + s * 0.15,
                        y: g.y - s - cup / 1.5,
                        width: cup,
                        height: cup,
                    },
                )
            }
            Offer::Large => {
                let left = g.x + g.width / 2.0;
                (
                    Point::new(g.x + g.width / 2.0, g.y + g.height / 4.0),
                    Rect {
                        x: left,
                        y: g.y,
                        width: s,
                        height: s,
                    },
                    Rect {
                        x: left,
                        y: g.y - s * 1.1,
                        width: s,
                        height: s,
                    },
                )
            }
        };

        self.paint(|p| p.draw_bubble(tail, bubble, radius));
        let cup_center = Point::new(cup.x + cup.width / 2.0, cup.y + cup.height / 2.0);
        self.paint(|p| p.draw_sprite(Sprite::Cup, cup_center, cup.width, cup.height, 0.0));
    }

    // One bar per offer along the shop's right edge; full height at the default stock of 10.
    fn demand_bars(&mut self, retailer: &Retailer) {
        let g = retailer.geometry;
        let bar_width = g.width * 0.08;
        let full = g.height * 0.8;
        let bottom = g.y + g.height;
        for (slot, offer) in Offer::ALL.into_iter().enumerate() {
            let level = f64::from(retailer.demand.get(offer).min(10)) / 10.0;
            if level == 0.0 {
                continue;
            }
            let rect = Rect {
                x: g.x + g.width / 2.0 + bar_width * (slot as f64 * 1.5 + 0.5),
                y: bottom - full * level,
                width: bar_width,
                height: full * level,
            };
            self.paint(|p| p.fill_rect(DEMAND_BAR, rect));
        }
    }

    fn customer(&mut self, customer: &Customer, row: u8, canvas_height: f64) {
        let size = customer.size;
        if customer.y - size / 2.0 >= canvas_height {
            return;
        }
        let frame = SpriteFrame {
            column: customer.frame,
            columns: PERSON_COLUMNS,
            row,
            rows: PERSON_ROWS,
        };
        let rect = Rect {
            x: customer.x - size / 2.0,
            y: customer.y - customer.z - size / 2.0,
            width: size,
            height: size,
        };
        self.paint(|p| p.draw_sprite_frame(Sprite::Person, frame, rect));
    }
}
