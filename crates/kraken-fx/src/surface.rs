//! Drawing boundary between the effects engine and whatever rasterises it.
//!
//! Surfaces use canvas coordinates: origin at the top-left corner, x to the
//! right, y downwards. Implementations convert to their own space.

use crate::color::Rgba;

/// One colour stop of a radial gradient (`offset` in 0-1)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Colour of a gradient at `offset`, linear between stops and held flat
/// outside them. Stops must be sorted by offset.
pub fn sample_gradient(stops: &[GradientStop], offset: f32) -> Rgba {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rgba::TRANSPARENT,
    };
    if offset <= first.offset {
        return first.color;
    }
    if offset >= last.offset {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if offset <= b.offset {
            let span = b.offset - a.offset;
            let t = if span > 0.0 { (offset - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, t);
        }
    }
    last.color
}

/// A 2D raster target
pub trait Surface {
    /// Current drawable size in pixels (width, height)
    fn size(&self) -> (f32, f32);

    /// Erase everything drawn since the last clear
    fn clear(&mut self);

    /// Filled disc
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    /// Disc filled with a radial gradient running from `focus` (offset 0)
    /// out to the rim at `radius` around `(x, y)` (offset 1)
    fn fill_radial_gradient(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        focus: (f32, f32),
        stops: &[GradientStop],
    );

    /// Axis-aligned filled rectangle; `(x, y)` is the top-left corner
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    /// Single stroked segment with round caps
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), weight: f32, color: Rgba);

    /// Connected stroked path
    fn stroke_polyline(&mut self, points: &[(f32, f32)], weight: f32, color: Rgba);
}

/// The three independently sized layers the engine paints each frame
pub struct Layers<'a> {
    pub ambient: &'a mut dyn Surface,
    pub burst: &'a mut dyn Surface,
    pub visualizer: &'a mut dyn Surface,
}

impl<'a> Layers<'a> {
    pub fn new(
        ambient: &'a mut dyn Surface,
        burst: &'a mut dyn Surface,
        visualizer: &'a mut dyn Surface,
    ) -> Self {
        Self {
            ambient,
            burst,
            visualizer,
        }
    }

    pub fn clear(&mut self) {
        self.ambient.clear();
        self.burst.clear();
        self.visualizer.clear();
    }
}
