use crate::canvas::{
    Canvas, Font, FontFamily, Gradient, Paint, TextAlign, TextBaseline, TextStyle,
};
use crate::surface::Surface;
use crate::text::{ArcText, Facing, LayoutError};
use palette::named;
use std::f64::consts::PI;

/// Concentric bands of the dial as fractions of its radius, center outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRadii {
    pub legend: f64,
    pub keyhole: f64,
    pub makers_name: f64,
    pub makers_location: f64,
    pub hours_inner: f64,
    pub hour_numerals: f64,
    pub hours_outer: f64,
    pub minutes_inner: f64,
    pub diamond_middle: f64,
    pub minutes_outer: f64,
    pub minute_numbers: f64,
    pub surround_inner: f64,
    pub surround_outer: f64,
}

pub const RADII: FaceRadii = FaceRadii {
    legend: 0.1,
    keyhole: 0.15,
    makers_name: 0.29,
    makers_location: 0.39,
    hours_inner: 0.45,
    hour_numerals: 0.52,
    hours_outer: 0.64,
    minutes_inner: 0.72,
    diamond_middle: 0.75,
    minutes_outer: 0.78,
    minute_numbers: 0.81,
    surround_inner: 0.86,
    surround_outer: 0.99,
};

impl FaceRadii {
    pub fn bands(&self) -> [(&'static str, f64); 13] {
        [
            ("legend", self.legend),
            ("keyhole", self.keyhole),
            ("makers_name", self.makers_name),
            ("makers_location", self.makers_location),
            ("hours_inner", self.hours_inner),
            ("hour_numerals", self.hour_numerals),
            ("hours_outer", self.hours_outer),
            ("minutes_inner", self.minutes_inner),
            ("diamond_middle", self.diamond_middle),
            ("minutes_outer", self.minutes_outer),
            ("minute_numbers", self.minute_numbers),
            ("surround_inner", self.surround_inner),
            ("surround_outer", self.surround_outer),
        ]
    }
}

pub const MINUTE_NUMBERS: [&str; 12] = [
    "60", "5", "10", "15", "20", "25", "30", "35", "40", "45", "50", "55",
];
pub const HOUR_NUMERALS: [&str; 12] = [
    "XII", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI",
];

const GRADUATIONS: u32 = 60;
const GRADUATION_STEP: f64 = 6.0 * PI / 180.0;
const NUMBER_STEP: f64 = 30.0 * PI / 180.0;

/// The printed words on the dial.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceText {
    pub font: FontFamily,
    pub maker: String,
    pub location: String,
    pub legend: String,
}

impl Default for FaceText {
    fn default() -> Self {
        Self {
            font: FontFamily::new("Century Schoolbook L"),
            maker: "P . H . DUDLEY".into(),
            location: "N . Y .".into(),
            legend: "ELECTRONICALLY CONTROLLED".into(),
        }
    }
}

/// Draws the static layer: surround, plate, legend, keyhole, maker's
/// details, band circles, graduations, minute numbers and hour numerals.
#[derive(Debug, Clone)]
pub struct FaceRenderer {
    text: FaceText,
    maker: ArcText,
    location: ArcText,
    minutes: ArcText,
    hours: ArcText,
}

impl FaceRenderer {
    pub fn new(text: FaceText) -> Result<Self, LayoutError> {
        let makers = |baseline| {
            ArcText::new(Font::new(&text.font, 16.0), baseline).map(|arc| {
                arc.facing(Facing::Outward)
                    .reversed()
                    .style(TextStyle::new(TextAlign::Center, TextBaseline::Bottom))
            })
        };
        let numbers = TextStyle::new(TextAlign::Center, TextBaseline::Middle);

        Ok(Self {
            maker: makers(RADII.makers_name)?,
            location: makers(RADII.makers_location)?,
            minutes: ArcText::new(Font::new(&text.font, 20.0), RADII.minute_numbers)?
                .kerning(-1.0)
                .style(numbers),
            hours: ArcText::new(Font::new(&text.font, 65.0), RADII.hour_numerals)?
                .kerning(-3.0)
                .width_scale(0.25)
                .style(numbers),
            text,
        })
    }

    pub fn text(&self) -> &FaceText {
        &self.text
    }

    /// Paints every static layer back to front.
    pub fn draw<C: Canvas>(&self, canvas: &C, surface: &Surface) -> Result<(), C::Error> {
        self.draw_surround(canvas, surface)?;
        self.draw_plate(canvas, surface)?;
        self.maker.draw(canvas, surface, &self.text.maker, PI)?;
        self.location.draw(canvas, surface, &self.text.location, PI)?;
        self.draw_band_circles(canvas, surface)?;
        self.draw_graduations(canvas, surface)?;
        for (i, number) in MINUTE_NUMBERS.iter().enumerate() {
            self.minutes
                .draw(canvas, surface, number, i as f64 * NUMBER_STEP)?;
        }
        for (i, numeral) in HOUR_NUMERALS.iter().enumerate() {
            self.hours
                .draw(canvas, surface, numeral, i as f64 * NUMBER_STEP)?;
        }
        Ok(())
    }

    fn draw_surround<C: Canvas>(&self, canvas: &C, surface: &Surface) -> Result<(), C::Error> {
        let o = surface.origin();
        let (inner, outer) = (
            surface.at(RADII.surround_inner),
            surface.at(RADII.surround_outer),
        );
        // light wood veneer
        let wood = Gradient::radial(o.x, o.y, inner, o.x, o.y, outer)
            .stop(0.0, named::SADDLEBROWN)
            .stop(0.25, named::SIENNA)
            .stop(0.5, named::BURLYWOOD)
            .stop(0.75, named::SIENNA)
            .stop(1.0, named::SADDLEBROWN);

        canvas.begin_path();
        canvas.arc(o.x, o.y, outer, 0.0, 2.0 * PI, true);
        canvas.arc(o.x, o.y, inner, 0.0, 2.0 * PI, true);
        canvas.close_path();
        canvas.fill(&wood.into())
    }

    fn draw_plate<C: Canvas>(&self, canvas: &C, surface: &Surface) -> Result<(), C::Error> {
        let o = surface.origin();
        let black = Paint::solid(named::BLACK);

        canvas.circle(o.x, o.y, surface.at(RADII.surround_inner));
        canvas.close_path();
        canvas.fill(&Paint::solid(named::PALEGOLDENROD))?;

        canvas.set_font(&Font::new(&self.text.font, surface.scale(10.0)));
        let width = surface.scale(canvas.measure_text(&self.text.legend)?);

        let frame = canvas.frame();
        frame.translate(o.x, o.y);
        frame.fill_text(
            &self.text.legend,
            0.0,
            surface.at(RADII.legend),
            TextStyle::new(TextAlign::Center, TextBaseline::Bottom),
            Some(width * 0.7),
            &black,
        )?;

        // hand adjustment keyhole
        let keyhole = surface.at(RADII.keyhole);
        frame.circle(surface.scale(0.0), keyhole, surface.scale(9.0));
        frame.fill(&Paint::solid(named::DARKGREY))?;
        frame.circle(surface.scale(0.0), keyhole, surface.scale(7.0));
        frame.fill(&black)
    }

    fn draw_band_circles<C: Canvas>(&self, canvas: &C, surface: &Surface) -> Result<(), C::Error> {
        let o = surface.origin();
        let black = Paint::solid(named::BLACK);
        canvas.set_line_width(surface.scale(1.0));
        for band in [
            RADII.minutes_outer,
            RADII.minutes_inner,
            RADII.hours_outer,
            RADII.hours_inner,
        ] {
            canvas.circle(o.x, o.y, surface.at(band));
            canvas.stroke(&black)?;
        }
        Ok(())
    }

    fn draw_graduations<C: Canvas>(&self, canvas: &C, surface: &Surface) -> Result<(), C::Error> {
        let o = surface.origin();
        let black = Paint::solid(named::BLACK);
        let inner = -surface.at(RADII.minutes_inner);
        let middle = -surface.at(RADII.diamond_middle);
        let outer = -surface.at(RADII.minutes_outer);

        for minute in 0..GRADUATIONS {
            let frame = canvas.frame();
            frame.translate(o.x, o.y);
            frame.rotate(f64::from(minute) * GRADUATION_STEP);

            frame.begin_path();
            if minute % 5 == 0 {
                frame.move_to(0.0, inner);
                frame.line_to(surface.scale(-3.0), middle);
                frame.line_to(0.0, outer);
                frame.line_to(surface.scale(3.0), middle);
                frame.line_to(0.0, inner);
                frame.fill(&black)?;
            } else {
                frame.set_line_width(surface.scale(3.0));
                frame.move_to(0.0, inner);
                frame.line_to(0.0, outer);
                frame.close_path();
                frame.stroke(&black)?;
            }
        }
        Ok(())
    }
}
