//! Glyph placement along a circular arc.
//!
//! Each glyph's measured advance (scaled, plus kerning) is an arc length on
//! the baseline circle; dividing by the baseline radius gives the angle the
//! glyph occupies. A pre-pass sums those angles so the frame can be rotated
//! back by half the span, which centers the string on the requested angle.

use crate::canvas::{Canvas, Font, Paint, TextStyle};
use crate::surface::Surface;
use palette::named;
use std::f64::consts::PI;
use thiserror::Error;

/// Direction glyphs advance in, relative to a positive rotation.
pub const CLOCKWISE: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Glyph tops point away from the center.
    #[default]
    Inward,
    /// Glyph tops point toward the center; the frame is turned half a circle.
    Outward,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LayoutError {
    #[error("Baseline fraction {0} does not give a positive finite radius")]
    DegenerateRadius(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcText {
    font: Font,
    baseline: f64,
    kerning: f64,
    width_scale: f64,
    facing: Facing,
    reverse: bool,
    style: TextStyle,
    paint: Paint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: char,
    /// Frame rotation the glyph is drawn at.
    pub angle: f64,
    /// Drawn advance in pixels after width scaling.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcLayout {
    /// Base angle after the facing adjustment.
    pub base: f64,
    /// Rotation of the frame before the first glyph.
    pub start: f64,
    pub radius: f64,
    /// Vertical offset glyphs are drawn at inside the rotated frame.
    pub baseline_y: f64,
    pub glyphs: Vec<PlacedGlyph>,
}

impl ArcLayout {
    /// Signed angular extent of the string, kerning included.
    pub fn span(&self) -> f64 {
        2.0 * (self.base - self.start) * CLOCKWISE
    }

    pub fn leading_edge(&self) -> f64 {
        self.start
    }

    pub fn trailing_edge(&self) -> f64 {
        self.glyphs
            .last()
            .map(|g| g.angle + g.width / 2.0 / self.radius * -CLOCKWISE)
            .unwrap_or(self.start)
    }
}

impl ArcText {
    /// Text on the circle at `baseline` times the dial radius. Font size and
    /// kerning are given at the reference diameter.
    pub fn new(font: Font, baseline: f64) -> Result<Self, LayoutError> {
        if !(baseline.is_finite() && baseline > 0.0) {
            return Err(LayoutError::DegenerateRadius(baseline));
        }
        Ok(Self {
            font,
            baseline,
            kerning: 0.0,
            width_scale: 1.0,
            facing: Facing::Inward,
            reverse: false,
            style: TextStyle::default(),
            paint: Paint::solid(named::BLACK),
        })
    }

    pub fn kerning(mut self, kerning: f64) -> Self {
        self.kerning = kerning;
        self
    }

    pub fn width_scale(mut self, width_scale: f64) -> Self {
        self.width_scale = width_scale;
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    fn glyphs(&self, text: &str) -> Vec<char> {
        if self.reverse {
            text.chars().rev().collect()
        } else {
            text.chars().collect()
        }
    }

    /// Places already measured glyphs around `angle`.
    pub fn layout(&self, measured: &[(char, f64)], surface: &Surface, angle: f64) -> ArcLayout {
        let radius = surface.at(self.baseline);
        let kerning = surface.scale(self.kerning);
        let base = match self.facing {
            Facing::Inward => angle,
            Facing::Outward => angle + PI,
        };

        let last = measured.len().saturating_sub(1);
        let start = measured
            .iter()
            .enumerate()
            .map(|(i, &(_, width))| {
                let kern = if i == last { 0.0 } else { kerning };
                (width * self.width_scale + kern) / radius / (2.0 * CLOCKWISE)
            })
            .fold(base, |acc, half| acc + half);

        let mut rotation = start;
        let glyphs = measured
            .iter()
            .map(|&(glyph, width)| {
                let width = width * self.width_scale;
                rotation += width / 2.0 / radius * -CLOCKWISE;
                let angle = rotation;
                rotation += (width / 2.0 + kerning) / radius * -CLOCKWISE;
                PlacedGlyph {
                    glyph,
                    angle,
                    width,
                }
            })
            .collect();

        let baseline_y = match self.facing {
            Facing::Inward => -radius,
            Facing::Outward => radius,
        };

        ArcLayout {
            base,
            start,
            radius,
            baseline_y,
            glyphs,
        }
    }

    /// Measures and draws `text` centered on `angle` (radians clockwise from
    /// twelve o'clock). The canvas transform is identity again on return.
    pub fn draw<C: Canvas>(
        &self,
        canvas: &C,
        surface: &Surface,
        text: &str,
        angle: f64,
    ) -> Result<(), C::Error> {
        canvas.set_font(&Font::new(&self.font.family, surface.scale(self.font.size)));

        let mut measured = Vec::new();
        let mut buf = [0u8; 4];
        for glyph in self.glyphs(text) {
            measured.push((glyph, canvas.measure_text(glyph.encode_utf8(&mut buf))?));
        }
        let layout = self.layout(&measured, surface, angle);
        let kerning = surface.scale(self.kerning);

        let origin = surface.origin();
        let frame = canvas.frame();
        frame.translate(origin.x, origin.y);
        frame.rotate(layout.start);
        for placed in &layout.glyphs {
            frame.rotate(placed.width / 2.0 / layout.radius * -CLOCKWISE);
            frame.fill_text(
                placed.glyph.encode_utf8(&mut buf),
                0.0,
                layout.baseline_y,
                self.style,
                Some(placed.width),
                &self.paint,
            )?;
            frame.rotate((placed.width / 2.0 + kerning) / layout.radius * -CLOCKWISE);
        }
        Ok(())
    }
}
