//! A [`Canvas`] that records every call and tracks the current transform.

use super::{Canvas, Font, Paint, TextStyle};
use std::cell::{Cell, RefCell};
use std::convert::Infallible;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Translate(f64, f64),
    Rotate(f64),
    ResetTransform,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    ClosePath,
    LineWidth(f64),
    Fill(Paint),
    Stroke(Paint),
    SetFont(Font),
    Text(DrawnText),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextStyle,
    pub max_width: Option<f64>,
    /// Rotation of the frame the text was drawn in.
    pub rotation: f64,
    /// Frame translation at the time of drawing.
    pub origin: (f64, f64),
}

/// Row-major 2x3 affine matrix: `[a c e; b d f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(self, x: f64, y: f64) -> Self {
        Self {
            e: self.a * x + self.c * y + self.e,
            f: self.b * x + self.d * y + self.f,
            ..self
        }
    }

    fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }
}

pub struct Recorder {
    ops: RefCell<Vec<Op>>,
    matrix: Cell<Affine>,
    font_size: Cell<f64>,
    rotation: Cell<f64>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            ops: RefCell::new(Vec::new()),
            matrix: Cell::new(Affine::IDENTITY),
            font_size: Cell::new(10.0),
            rotation: Cell::new(0.0),
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn texts(&self) -> Vec<DrawnText> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.borrow().iter().filter(|op| pred(op)).count()
    }

    pub fn is_identity(&self) -> bool {
        self.matrix.get() == Affine::IDENTITY
    }

    /// Advance width used by [`Canvas::measure_text`]: narrow glyphs are a
    /// quarter of the font size, everything else half.
    pub fn glyph_width(ch: char, size: f64) -> f64 {
        match ch {
            'I' | '.' | ' ' | '1' => size * 0.25,
            _ => size * 0.5,
        }
    }

    fn push(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }
}

impl Canvas for Recorder {
    type Error = Infallible;

    fn clear(&self) -> Result<(), Infallible> {
        self.push(Op::Clear);
        Ok(())
    }

    fn translate(&self, x: f64, y: f64) {
        self.matrix.set(self.matrix.get().translate(x, y));
        self.push(Op::Translate(x, y));
    }

    fn rotate(&self, angle: f64) {
        self.matrix.set(self.matrix.get().rotate(angle));
        self.rotation.set(self.rotation.get() + angle);
        self.push(Op::Rotate(angle));
    }

    fn reset_transform(&self) {
        self.matrix.set(Affine::IDENTITY);
        self.rotation.set(0.0);
        self.push(Op::ResetTransform);
    }

    fn begin_path(&self) {
        self.push(Op::BeginPath);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.push(Op::MoveTo(x, y));
    }

    fn line_to(&self, x: f64, y: f64) {
        self.push(Op::LineTo(x, y));
    }

    fn quad_to(&self, cx: f64, cy: f64, x: f64, y: f64) {
        self.push(Op::QuadTo(cx, cy, x, y));
    }

    fn curve_to(&self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.push(Op::CurveTo(c1x, c1y, c2x, c2y, x, y));
    }

    fn arc(&self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.push(Op::Arc {
            cx,
            cy,
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn close_path(&self) {
        self.push(Op::ClosePath);
    }

    fn set_line_width(&self, width: f64) {
        self.push(Op::LineWidth(width));
    }

    fn fill(&self, paint: &Paint) -> Result<(), Infallible> {
        self.push(Op::Fill(paint.clone()));
        Ok(())
    }

    fn stroke(&self, paint: &Paint) -> Result<(), Infallible> {
        self.push(Op::Stroke(paint.clone()));
        Ok(())
    }

    fn set_font(&self, font: &Font) {
        self.font_size.set(font.size);
        self.push(Op::SetFont(font.clone()));
    }

    fn measure_text(&self, text: &str) -> Result<f64, Infallible> {
        let size = self.font_size.get();
        Ok(text.chars().map(|ch| Self::glyph_width(ch, size)).sum())
    }

    fn fill_text(
        &self,
        text: &str,
        x: f64,
        y: f64,
        style: TextStyle,
        max_width: Option<f64>,
        _paint: &Paint,
    ) -> Result<(), Infallible> {
        let m = self.matrix.get();
        self.push(Op::Text(DrawnText {
            text: text.to_string(),
            x,
            y,
            style,
            max_width,
            rotation: self.rotation.get(),
            origin: (m.e, m.f),
        }));
        Ok(())
    }
}
