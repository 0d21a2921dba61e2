// Headless painter: records each frame as a display list.

use crate::domain::entities::{LogoHandle, Point};
use crate::domain::ports::{PaintError, PaintResult, Painter, Rect, Sprite, SpriteFrame};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        color: &'static str,
        rect: Rect,
    },
    Line {
        color: &'static str,
        width: f64,
        from: Point,
        to: Point,
    },
    Ellipse {
        color: &'static str,
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Text {
        color: &'static str,
        text: String,
        at: Point,
        font_size: f64,
    },
    Sprite {
        sprite: Sprite,
        center: Point,
        width: f64,
        height: f64,
        angle: f64,
    },
    SpriteFrame {
        sprite: Sprite,
        frame: SpriteFrame,
        rect: Rect,
    },
    Logo {
        logo: LogoHandle,
        center: Point,
        radius: f64,
    },
    Bubble {
        tail: Point,
        rect: Rect,
        corner_radius: f64,
    },
    PushClip(Rect),
    PopClip,
}

#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    // Assets (sprite names or logo urls) that are still loading.
    pending: HashSet<String>,
    size: (f64, f64),
    frames: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&mut self, asset: impl Into<String>) {
        self.pending.insert(asset.into());
    }

    pub fn mark_loaded(&mut self, asset: &str) {
        self.pending.remove(asset);
    }

    /// Commands of the most recent frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    fn ready(&self, asset: &str) -> PaintResult {
        if self.pending.contains(asset) {
            Err(PaintError::AssetNotReady(asset.to_string()))
        } else {
            Ok(())
        }
    }

    fn push(&mut self, command: DrawCommand) -> PaintResult {
        self.commands.push(command);
        Ok(())
    }
}

impl Painter for DisplayList {
    fn begin_frame(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.size = (width, height);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn fill_rect(&mut self, color: &'static str, rect: Rect) -> PaintResult {
        self.push(DrawCommand::Rect { color, rect })
    }

    fn stroke_line(&mut self, color: &'static str, line_width: f64, from: Point, to: Point) -> PaintResult {
        self.push(DrawCommand::Line {
            color,
            width: line_width,
            from,
            to,
        })
    }

    fn fill_ellipse(&mut self, color: &'static str, center: Point, radius_x: f64, radius_y: f64) -> PaintResult {
        self.push(DrawCommand::Ellipse {
            color,
            center,
            radius_x,
            radius_y,
        })
    }

    fn fill_text(&mut self, color: &'static str, text: &str, at: Point, font_size: f64) -> PaintResult {
        self.push(DrawCommand::Text {
            color,
            text: text.to_string(),
            at,
            font_size,
        })
    }

    fn draw_sprite(&mut self, sprite: Sprite, center: Point, width: f64, height: f64, angle: f64) -> PaintResult {
        self.ready(sprite.name())?;
        self.push(DrawCommand::Sprite {
            sprite,
            center,
            width,
            height,
            angle,
        })
    }

    fn draw_sprite_frame(&mut self, sprite: Sprite, frame: SpriteFrame, rect: Rect) -> PaintResult {
        self.ready(sprite.name())?;
        self.push(DrawCommand::SpriteFrame { sprite, frame, rect })
    }

    fn draw_logo(&mut self, logo: &LogoHandle, center: Point, radius: f64) -> PaintResult {
        self.ready(logo.as_str())?;
        self.push(DrawCommand::Logo {
            logo: logo.clone(),
            center,
            radius,
        })
    }

    fn draw_bubble(&mut self, tail: Point, rect: Rect, corner_radius: f64) -> PaintResult {
        self.push(DrawCommand::Bubble {
            tail,
            rect,
            corner_radius,
        })
    }

    fn push_clip(&mut self, rect: Rect) -> PaintResult {
        self.push(DrawCommand::PushClip(rect))
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}
