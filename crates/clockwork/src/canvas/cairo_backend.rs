use super::{Canvas, ColorStop, Font, GradientShape, Paint, TextAlign, TextBaseline, TextStyle};
use cairo::{Context, FontSlant, FontWeight, Matrix, Operator};

/// [`Canvas`] over a cairo context.
///
/// The context's matrix at construction is taken as the layer's identity, so
/// `reset_transform` returns to the widget origin rather than the device
/// origin.
pub struct CairoCanvas<'a> {
    cr: &'a Context,
    base: Matrix,
}

impl<'a> CairoCanvas<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self {
            cr,
            base: cr.matrix(),
        }
    }

    fn set_paint(&self, paint: &Paint) -> Result<(), cairo::Error> {
        match paint {
            Paint::Solid(color) => {
                let (r, g, b, a) = color.into_components();
                self.cr.set_source_rgba(r, g, b, a);
                Ok(())
            }
            Paint::Gradient(gradient) => match gradient.shape {
                GradientShape::Linear { x0, y0, x1, y1 } => {
                    let pattern = cairo::LinearGradient::new(x0, y0, x1, y1);
                    add_stops(&pattern, &gradient.stops);
                    self.cr.set_source(&pattern)
                }
                GradientShape::Radial {
                    x0,
                    y0,
                    r0,
                    x1,
                    y1,
                    r1,
                } => {
                    let pattern = cairo::RadialGradient::new(x0, y0, r0, x1, y1, r1);
                    add_stops(&pattern, &gradient.stops);
                    self.cr.set_source(&pattern)
                }
            },
        }
    }
}

fn add_stops(pattern: &cairo::Gradient, stops: &[ColorStop]) {
    for stop in stops {
        let (r, g, b, a) = stop.color.into_components();
        pattern.add_color_stop_rgba(stop.offset, r, g, b, a);
    }
}

impl Canvas for CairoCanvas<'_> {
    type Error = cairo::Error;

    fn clear(&self) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.set_operator(Operator::Clear);
        self.cr.paint()?;
        self.cr.restore()
    }

    fn translate(&self, x: f64, y: f64) {
        self.cr.translate(x, y);
    }

    fn rotate(&self, angle: f64) {
        self.cr.rotate(angle);
    }

    fn reset_transform(&self) {
        self.cr.set_matrix(self.base);
    }

    fn begin_path(&self) {
        self.cr.new_path();
    }

    fn move_to(&self, x: f64, y: f64) {
        self.cr.move_to(x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        self.cr.line_to(x, y);
    }

    fn quad_to(&self, cx: f64, cy: f64, x: f64, y: f64) {
        // cairo only has cubics; raise the degree around the current point
        let (x0, y0) = match self.cr.has_current_point() {
            Ok(true) => self.cr.current_point().unwrap_or((cx, cy)),
            _ => (cx, cy),
        };
        self.cr.curve_to(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        );
    }

    fn curve_to(&self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.cr.curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn arc(&self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        if anticlockwise {
            self.cr.arc_negative(cx, cy, radius, start, end);
        } else {
            self.cr.arc(cx, cy, radius, start, end);
        }
    }

    fn close_path(&self) {
        self.cr.close_path();
    }

    fn set_line_width(&self, width: f64) {
        self.cr.set_line_width(width);
    }

    fn fill(&self, paint: &Paint) -> Result<(), cairo::Error> {
        self.set_paint(paint)?;
        self.cr.fill()
    }

    fn stroke(&self, paint: &Paint) -> Result<(), cairo::Error> {
        self.set_paint(paint)?;
        self.cr.stroke()
    }

    fn set_font(&self, font: &Font) {
        self.cr
            .select_font_face(font.family.as_str(), FontSlant::Normal, FontWeight::Normal);
        self.cr.set_font_size(font.size);
    }

    fn measure_text(&self, text: &str) -> Result<f64, cairo::Error> {
        Ok(self.cr.text_extents(text)?.x_advance())
    }

    fn fill_text(
        &self,
        text: &str,
        x: f64,
        y: f64,
        style: TextStyle,
        max_width: Option<f64>,
        paint: &Paint,
    ) -> Result<(), cairo::Error> {
        if max_width.is_some_and(|max| max <= 0.0) {
            return Ok(());
        }
        let width = self.measure_text(text)?;
        let squeeze = match max_width {
            Some(max) if width > max => max / width,
            _ => 1.0,
        };
        let drawn = width * squeeze;

        let dx = match style.align {
            TextAlign::Start => 0.0,
            TextAlign::Center => -drawn / 2.0,
            TextAlign::End => -drawn,
        };
        let extents = self.cr.font_extents()?;
        let dy = match style.baseline {
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Top => extents.ascent(),
            TextBaseline::Middle => (extents.ascent() - extents.descent()) / 2.0,
            TextBaseline::Bottom => -extents.descent(),
        };

        self.set_paint(paint)?;
        self.cr.save()?;
        self.cr.translate(x + dx, y + dy);
        self.cr.scale(squeeze, 1.0);
        self.cr.move_to(0.0, 0.0);
        let shown = self.cr.show_text(text);
        self.cr.restore()?;
        shown
    }
}
