use crate::canvas::{Canvas, Gradient, Paint};
use crate::surface::Surface;
use crate::time::HandAngles;
use palette::named;

/// Redraws the hands layer: erases it, then paints the hour, minute and
/// second hands and the center cap over them. Every hand gets its own frame
/// so the transform is identity between hands and on return.
pub fn draw_hands<C: Canvas>(
    canvas: &C,
    surface: &Surface,
    angles: &HandAngles,
) -> Result<(), C::Error> {
    canvas.clear()?;
    hour_hand(canvas, surface, angles.hour)?;
    minute_hand(canvas, surface, angles.minute)?;
    second_hand(canvas, surface, angles.second)?;
    center_cap(canvas, surface)
}

fn hour_hand<C: Canvas>(canvas: &C, s: &Surface, angle: f64) -> Result<(), C::Error> {
    let black = Paint::solid(named::BLACK);
    let frame = canvas.frame();
    frame.translate(s.origin().x, s.origin().y);
    frame.rotate(angle);

    // shank
    frame.begin_path();
    frame.move_to(s.scale(4.0), 0.0);
    frame.line_to(s.scale(-4.0), 0.0);
    frame.line_to(s.scale(-2.0), s.scale(-90.0));
    frame.line_to(s.scale(2.0), s.scale(-90.0));
    frame.close_path();
    frame.fill(&black)?;

    // piercing
    frame.set_line_width(s.scale(4.0));
    frame.begin_path();
    for side in [-20.0, 20.0] {
        frame.move_to(0.0, s.scale(-90.0));
        frame.quad_to(s.scale(side), s.scale(-90.0), 0.0, s.scale(-120.0));
    }
    frame.stroke(&black)?;

    // tip
    frame.begin_path();
    frame.move_to(s.scale(2.0), s.scale(-120.0));
    frame.line_to(s.scale(-2.0), s.scale(-120.0));
    frame.line_to(0.0, s.scale(-150.0));
    frame.close_path();
    frame.fill(&black)
}

fn minute_hand<C: Canvas>(canvas: &C, s: &Surface, angle: f64) -> Result<(), C::Error> {
    let black = Paint::solid(named::BLACK);
    let frame = canvas.frame();
    frame.translate(s.origin().x, s.origin().y);
    frame.rotate(angle);

    frame.begin_path();
    frame.move_to(s.scale(4.0), s.scale(20.0));
    frame.line_to(s.scale(-4.0), s.scale(20.0));
    frame.line_to(s.scale(-2.0), s.scale(-150.0));
    frame.line_to(s.scale(2.0), s.scale(-150.0));
    frame.close_path();
    frame.fill(&black)?;

    // brass counterweight
    let weight_y = s.scale(30.0);
    for (radius, color) in [
        (10.0, named::DARKORANGE),
        (9.0, named::GOLD),
        (8.0, named::LIGHTYELLOW),
    ] {
        frame.circle(0.0, weight_y, s.scale(radius));
        frame.fill(&Paint::solid(color))?;
    }
    let sheen = Gradient::linear(s.scale(-10.0), s.scale(12.0), s.scale(10.0), s.scale(32.0))
        .stop(0.0, named::WHITE)
        .stop(0.5, named::GOLD)
        .stop(1.0, named::WHITE);
    frame.circle(0.0, weight_y, s.scale(7.0));
    frame.fill(&sheen.into())?;

    // piercing loop and its bars
    frame.set_line_width(s.scale(4.0));
    frame.begin_path();
    frame.move_to(0.0, s.scale(-150.0));
    frame.curve_to(
        s.scale(20.0),
        s.scale(-140.0),
        s.scale(20.0),
        s.scale(-190.0),
        0.0,
        s.scale(-180.0),
    );
    frame.stroke(&black)?;
    for y in [-150.0, -180.0] {
        frame.begin_path();
        frame.move_to(s.scale(1.0), s.scale(y));
        frame.line_to(s.scale(-8.0), s.scale(y));
        frame.stroke(&black)?;
    }
    frame.set_line_width(s.scale(2.0));
    frame.begin_path();
    frame.move_to(s.scale(-5.0), s.scale(-150.0));
    frame.line_to(s.scale(-5.0), s.scale(-180.0));
    frame.stroke(&black)?;

    frame.begin_path();
    frame.move_to(s.scale(2.0), s.scale(-180.0));
    frame.line_to(s.scale(-2.0), s.scale(-180.0));
    frame.line_to(0.0, s.scale(-220.0));
    frame.close_path();
    frame.fill(&black)
}

fn second_hand<C: Canvas>(canvas: &C, s: &Surface, angle: f64) -> Result<(), C::Error> {
    let frame = canvas.frame();
    frame.translate(s.origin().x, s.origin().y);
    frame.rotate(angle);

    let steel = Gradient::linear(s.scale(-3.0), 0.0, s.scale(3.0), 0.0)
        .stop(0.0, named::DARKGREY)
        .stop(0.35, named::SILVER)
        .stop(0.5, named::WHITE)
        .stop(0.65, named::SILVER)
        .stop(1.0, named::DARKGREY);
    frame.begin_path();
    frame.move_to(s.scale(3.0), s.scale(18.0));
    frame.line_to(s.scale(-3.0), s.scale(18.0));
    frame.line_to(s.scale(-1.0), s.scale(-240.0));
    frame.line_to(s.scale(1.0), s.scale(-240.0));
    frame.close_path();
    frame.fill(&steel.into())?;

    // counterweight ring
    let ring = Gradient::radial(
        0.0,
        s.scale(24.0),
        s.scale(6.0),
        0.0,
        s.scale(28.0),
        s.scale(10.0),
    )
    .stop(0.0, named::DARKGREY)
    .stop(0.4, named::SILVER)
    .stop(0.5, named::WHITE)
    .stop(0.6, named::SILVER)
    .stop(1.0, named::DARKGREY);
    frame.set_line_width(s.scale(4.0));
    frame.circle(0.0, s.scale(26.0), s.scale(8.0));
    frame.stroke(&ring.into())
}

fn center_cap<C: Canvas>(canvas: &C, s: &Surface) -> Result<(), C::Error> {
    let frame = canvas.frame();
    frame.translate(s.origin().x, s.origin().y);
    for (radius, color) in [
        (12.0, named::BLACK),
        (11.0, named::DARKGREY),
        (10.0, named::BLACK),
        (2.0, named::DARKSLATEGREY),
    ] {
        frame.circle(0.0, 0.0, s.scale(radius));
        frame.fill(&Paint::solid(color))?;
    }
    Ok(())
}
