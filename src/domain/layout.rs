// Deterministic scene placement, recomputed from counts and canvas size every tick.

use crate::domain::entities::{Geometry, Point};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutCounts {
    pub suppliers: usize,
    pub retailers: usize,
    pub carriers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tower {
    pub anchor: Point,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchIsland {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub label_at: Point,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub width: f64,
    pub height: f64,
    // Top edge of the terminal apron where retailers stand.
    pub apron_y: f64,
    pub suppliers: Vec<Geometry>,
    pub retailers: Vec<Geometry>,
    pub docks: Vec<Geometry>,
    pub tower: Tower,
    pub island: DispatchIsland,
}

/// Centres of `n` items spread evenly across `width`, `width / (n + 1)` apart.
pub fn even_spacing(n: usize, width: f64) -> impl Iterator<Item = f64> {
    let step = width / (n as f64 + 1.0);
    (1..=n).map(move |k| k as f64 * step)
}

pub fn compute(counts: LayoutCounts, width: f64, height: f64) -> SceneLayout {
    let apron_y = 4.0 / 7.0 * height;

    let supplier_height = 0.10 * height;
    let suppliers = even_spacing(counts.suppliers, width)
        .map(|x| Geometry {
            x,
            y: 0.0,
            width: 1.9 * supplier_height,
            height: supplier_height,
        })
        .collect();

    let retailer_size = 0.10 * height;
    let retailers = even_spacing(counts.retailers, width)
        .map(|x| Geometry {
            x,
            y: apron_y,
            width: retailer_size,
            height: retailer_size,
        })
        .collect();

    let dock_size = 0.06 * width;
    let carriers = counts.carriers as f64;
    let docks = (0..counts.carriers)
        .map(|i| Geometry {
            x: width - dock_size / 1.5,
            y: height / 3.0 + i as f64 * dock_size - carriers * dock_size / 2.0,
            width: dock_size,
            height: dock_size,
        })
        .collect();

    SceneLayout {
        width,
        height,
        apron_y,
        suppliers,
        retailers,
        docks,
        tower: Tower {
            anchor: Point::new(0.05 * width, height / 2.0),
            width: 0.25 * height,
        },
        island: DispatchIsland {
            center: Point::new(width / 2.0, apron_y),
            radius_x: 0.55 * width,
            radius_y: 0.075 * height,
            label_at: Point::new(width / 2.0, apron_y - 0.01875 * height),
            font_size: 0.05 * height,
        },
    }
}
