use async_trait::async_trait;
use std::fmt;

use crate::domain::entities::{LogoHandle, Point};
use crate::domain::events::{ChannelMessage, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Truck,
    Person,
    Shop,
    Cup,
    Warehouse,
    Tower,
}

impl Sprite {
    pub fn name(self) -> &'static str {
        match self {
            Sprite::Truck => "truck",
            Sprite::Person => "person",
            Sprite::Shop => "shop",
            Sprite::Cup => "cup",
            Sprite::Warehouse => "warehouse",
            Sprite::Tower => "tower",
        }
    }
}

/// Cell of a sprite sheet laid out as `columns` x `rows` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub column: u8,
    pub columns: u8,
    pub row: u8,
    pub rows: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    // Image still loading; the next frame will retry.
    AssetNotReady(String),
    Surface(String),
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::AssetNotReady(asset) => write!(f, "asset not ready: {asset}"),
            PaintError::Surface(message) => write!(f, "drawing surface error: {message}"),
        }
    }
}

impl std::error::Error for PaintError {}

pub type PaintResult = Result<(), PaintError>;

// Port for the immediate-mode drawing surface the renderer paints on.
pub trait Painter {
    fn begin_frame(&mut self, _width: f64, _height: f64) {}
    fn end_frame(&mut self) {}

    fn fill_rect(&mut self, color: &'static str, rect: Rect) -> PaintResult;
    fn stroke_line(&mut self, color: &'static str, line_width: f64, from: Point, to: Point) -> PaintResult;
    fn fill_ellipse(&mut self, color: &'static str, center: Point, radius_x: f64, radius_y: f64) -> PaintResult;
    fn fill_text(&mut self, color: &'static str, text: &str, at: Point, font_size: f64) -> PaintResult;
    // Centred at `center`, rotated by `angle` radians.
    fn draw_sprite(&mut self, sprite: Sprite, center: Point, width: f64, height: f64, angle: f64) -> PaintResult;
    // Top-left anchored cell of a sprite sheet.
    fn draw_sprite_frame(&mut self, sprite: Sprite, frame: SpriteFrame, rect: Rect) -> PaintResult;
    // Logo clipped to a white disc.
    fn draw_logo(&mut self, logo: &LogoHandle, center: Point, radius: f64) -> PaintResult;
    // Speech bubble with its tail pointing at `tail`; `rect.y` is the bubble bottom.
    fn draw_bubble(&mut self, tail: Point, rect: Rect, corner_radius: f64) -> PaintResult;
    fn push_clip(&mut self, rect: Rect) -> PaintResult;
    fn pop_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Transport(String),
    Status(u16),
    Malformed(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(message) => write!(f, "transport error: {message}"),
            SourceError::Status(status) => write!(f, "snapshot request failed with status {status}"),
            SourceError::Malformed(message) => write!(f, "malformed message: {message}"),
        }
    }
}

impl std::error::Error for SourceError {}

// Port for the remote airport state: bulk snapshot plus live push channel.
#[async_trait]
pub trait SceneSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError>;
    async fn open_channel(&self) -> Result<Box<dyn EventChannel>, SourceError>;
}

// One live connection. `None` means the channel closed.
#[async_trait]
pub trait EventChannel: Send {
    async fn next_message(&mut self) -> Option<Result<ChannelMessage, SourceError>>;
}
