//! The subset of a 2D canvas the animators draw with.
//!
//! Animators only ever talk to [`Surface`]; the browser build implements it
//! on top of `CanvasRenderingContext2d`, and [`RecordingSurface`] captures
//! draw calls for headless runs.

use std::fmt;

use glam::DVec2;

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Interior overlap; rectangles that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// CSS-style colour; formats as `rgba(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// 2D drawing target. Transform and alpha state follow canvas semantics:
/// `save`/`restore` bracket `translate`, `scale` and `set_alpha`.
pub trait Surface {
    fn size(&self) -> (f64, f64);
    /// Erase the whole surface.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64);
    /// Draw `text` centred (horizontally and vertically) on `(x, y)`.
    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, font: &str, color: Rgba);
}

/// One captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    Alpha(f64),
    FillRect(Rect, Rgba),
    StrokeRect(Rect, Rgba, f64),
    Text(String, f64, f64),
}

/// Headless surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Rgba)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillRect(r, c) => Some((r, c)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t, ..) => Some(t.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale(sx, sy));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect(rect, color, line_width));
    }

    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, _font: &str, _color: Rgba) {
        self.ops.push(DrawOp::Text(text.to_owned(), x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_formats_as_css() {
        assert_eq!(Rgba::WHITE.with_alpha(0.25).to_string(), "rgba(255, 255, 255, 0.25)");
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn center_round_trips() {
        let r = Rect::from_center(DVec2::new(50.0, 40.0), DVec2::new(20.0, 10.0));
        assert_eq!(r, Rect::new(40.0, 35.0, 20.0, 10.0));
        assert_eq!(r.center(), DVec2::new(50.0, 40.0));
    }
}
