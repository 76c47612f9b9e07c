//! The 2D drawing capability the renderers are written against.
//!
//! The host owns the actual pixels. Everything in this crate draws through
//! [`Canvas`], which mirrors the small subset of an immediate-mode 2D context
//! the dial needs: transforms, paths, solid and gradient paints, and text.

use derive_more::{AsRef, Deref, Display, From, Into};
use palette::{Srgb, Srgba, WithAlpha};
use std::f64::consts::PI;

mod cairo_backend;
#[cfg(test)]
pub(crate) mod recording;

pub use cairo_backend::CairoCanvas;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct FontFamily(String);

crate::impl_string_newtype!(FontFamily);

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub size: f64,
}

impl Font {
    pub fn new(family: &FontFamily, size: f64) -> Self {
        Self {
            family: family.clone(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub const fn new(align: TextAlign, baseline: TextBaseline) -> Self {
        Self { align, baseline }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Radial {
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub fn radial(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self {
            shape: GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            },
            stops: Vec::new(),
        }
    }

    /// Appends a color stop. Stops are kept in insertion order.
    pub fn stop(mut self, offset: f64, color: Srgb<u8>) -> Self {
        self.stops.push(ColorStop {
            offset,
            color: opaque(color),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Srgba<f64>),
    Gradient(Gradient),
}

impl Paint {
    pub fn solid(color: Srgb<u8>) -> Self {
        Self::Solid(opaque(color))
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Self::Gradient(gradient)
    }
}

fn opaque(color: Srgb<u8>) -> Srgba<f64> {
    color.into_format::<f64>().with_alpha(1.0)
}

pub trait Canvas {
    type Error: std::error::Error;

    /// Erases every pixel of the layer to transparent.
    fn clear(&self) -> Result<(), Self::Error>;

    fn translate(&self, x: f64, y: f64);
    fn rotate(&self, angle: f64);
    fn reset_transform(&self);

    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn quad_to(&self, cx: f64, cy: f64, x: f64, y: f64);
    fn curve_to(&self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    fn arc(&self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    fn close_path(&self);

    fn set_line_width(&self, width: f64);
    fn fill(&self, paint: &Paint) -> Result<(), Self::Error>;
    fn stroke(&self, paint: &Paint) -> Result<(), Self::Error>;

    fn set_font(&self, font: &Font);
    /// Advance width of `text` in the current font.
    fn measure_text(&self, text: &str) -> Result<f64, Self::Error>;
    /// Draws `text` anchored at `(x, y)`. Text wider than `max_width` is
    /// condensed horizontally to fit; a non-positive `max_width` draws nothing.
    fn fill_text(
        &self,
        text: &str,
        x: f64,
        y: f64,
        style: TextStyle,
        max_width: Option<f64>,
        paint: &Paint,
    ) -> Result<(), Self::Error>;

    /// Starts a new path holding one full circle.
    fn circle(&self, cx: f64, cy: f64, radius: f64) {
        self.begin_path();
        self.arc(cx, cy, radius, 0.0, 2.0 * PI, true);
    }

    /// Opens a transform scope that is reset to identity when dropped.
    fn frame(&self) -> Frame<'_, Self>
    where
        Self: Sized,
    {
        Frame { canvas: self }
    }
}

/// A borrowed canvas whose transform is reset on drop, whichever way the
/// scope is left.
pub struct Frame<'a, C: Canvas> {
    canvas: &'a C,
}

impl<C: Canvas> std::ops::Deref for Frame<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas> Drop for Frame<'_, C> {
    fn drop(&mut self) {
        self.canvas.reset_transform();
    }
}
