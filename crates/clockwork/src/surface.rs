use thiserror::Error;

/// Diameter the dial's absolute geometry was designed at.
pub const REFERENCE_DIAMETER: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SurfaceError {
    #[error("Invalid diameter {0}: must be a finite number greater than zero")]
    InvalidDimension(f64),
}

/// Geometry of one square drawing layer.
///
/// Every absolute offset a renderer uses is expressed at
/// [`REFERENCE_DIAMETER`] and passed through [`Surface::scale`], so the dial
/// keeps its proportions at any size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
    origin: Point,
    radius: f64,
    ratio: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: REFERENCE_DIAMETER,
            height: REFERENCE_DIAMETER,
            origin: Point::new(REFERENCE_DIAMETER / 2.0, REFERENCE_DIAMETER / 2.0),
            radius: REFERENCE_DIAMETER / 2.0,
            ratio: 1.0,
        }
    }
}

impl Surface {
    pub fn new(diameter: f64) -> Result<Self, SurfaceError> {
        let mut surface = Self::default();
        surface.resize(diameter)?;
        Ok(surface)
    }

    pub fn validate(diameter: f64) -> Result<f64, SurfaceError> {
        if diameter.is_finite() && diameter > 0.0 {
            Ok(diameter)
        } else {
            Err(SurfaceError::InvalidDimension(diameter))
        }
    }

    /// Makes the layer `diameter` pixels square and recomputes the derived
    /// geometry. On error the surface is left as it was.
    pub fn resize(&mut self, diameter: f64) -> Result<(), SurfaceError> {
        let diameter = Self::validate(diameter)?;
        self.width = diameter;
        self.height = diameter;
        self.origin = Point::new(self.width / 2.0, self.height / 2.0);
        self.radius = self.width.min(self.height) / 2.0;
        self.ratio = self.width / REFERENCE_DIAMETER;
        log::debug!("Surface resized to {diameter}px (ratio {})", self.ratio);
        Ok(())
    }

    pub fn scale(&self, value: f64) -> f64 {
        value * self.ratio
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Distance from the center for a fraction of the radius.
    pub fn at(&self, fraction: f64) -> f64 {
        self.radius * fraction
    }
}
