//! `Surface` over nannou's `Draw`.
//!
//! The engine paints in top-left/y-down canvas space; nannou's origin is the
//! window centre with y up. Every call converts at this boundary.

use kraken_fx::{sample_gradient, GradientStop, Layers, Rgba, Surface};
use nannou::prelude::{pt2, rgba, App, Draw, Frame, Point2};

/// Concentric discs used to fake a radial gradient
const GRADIENT_RINGS: usize = 10;

fn to_nannou(color: Rgba) -> nannou::color::Rgba {
    rgba(color.r, color.g, color.b, color.a)
}

/// Canvas coordinates to centred, y-up coordinates
fn to_centred((w, h): (f32, f32), (x, y): (f32, f32)) -> (f32, f32) {
    (x - w / 2.0, h / 2.0 - y)
}

/// A disc of the gradient approximation, in canvas space
#[derive(Clone, Copy, Debug, PartialEq)]
struct Ring {
    x: f32,
    y: f32,
    radius: f32,
    color: Rgba,
}

/// Outermost first. Each ring's alpha is chosen so the stacked coverage
/// inside it matches the gradient's alpha at that offset.
fn gradient_rings(x: f32, y: f32, radius: f32, focus: (f32, f32), stops: &[GradientStop]) -> Vec<Ring> {
    let mut rings = Vec::with_capacity(GRADIENT_RINGS);
    let mut coverage = 0.0f32;
    let step = 1.0 / GRADIENT_RINGS as f32;

    for i in 0..GRADIENT_RINGS {
        let t = 1.0 - i as f32 * step;
        let target = sample_gradient(stops, t - step / 2.0);

        let alpha = if coverage < 1.0 {
            ((target.a - coverage) / (1.0 - coverage)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        coverage += (1.0 - coverage) * alpha;

        rings.push(Ring {
            x: focus.0 + (x - focus.0) * t,
            y: focus.1 + (y - focus.1) * t,
            radius: radius * t,
            color: target.with_alpha(alpha),
        });
    }
    rings
}

pub struct CanvasSurface {
    draw: Draw,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            draw: Draw::new(),
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn draw(&self) -> &Draw {
        &self.draw
    }

    fn point(&self, x: f32, y: f32) -> Point2 {
        let (cx, cy) = to_centred((self.width, self.height), (x, y));
        pt2(cx, cy)
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.draw.reset();
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let p = self.point(x, y);
        self.draw
            .ellipse()
            .xy(p)
            .w_h(radius * 2.0, radius * 2.0)
            .color(to_nannou(color));
    }

    fn fill_radial_gradient(&mut self, x: f32, y: f32, radius: f32, focus: (f32, f32), stops: &[GradientStop]) {
        for ring in gradient_rings(x, y, radius, focus, stops) {
            if ring.color.a <= 0.0 {
                continue;
            }
            let p = self.point(ring.x, ring.y);
            self.draw
                .ellipse()
                .xy(p)
                .w_h(ring.radius * 2.0, ring.radius * 2.0)
                .color(to_nannou(ring.color));
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let p = self.point(x + w / 2.0, y + h / 2.0);
        self.draw.rect().xy(p).w_h(w, h).color(to_nannou(color));
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), weight: f32, color: Rgba) {
        let start = self.point(from.0, from.1);
        let end = self.point(to.0, to.1);
        self.draw
            .line()
            .start(start)
            .end(end)
            .weight(weight)
            .caps_round()
            .color(to_nannou(color));
    }

    fn stroke_polyline(&mut self, points: &[(f32, f32)], weight: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        let points: Vec<Point2> = points.iter().map(|(x, y)| self.point(*x, *y)).collect();
        self.draw
            .polyline()
            .weight(weight)
            .points(points)
            .color(to_nannou(color));
    }
}

/// The engine's three layers, rendered bottom to top
pub struct CanvasLayers {
    pub ambient: CanvasSurface,
    pub burst: CanvasSurface,
    pub visualizer: CanvasSurface,
}

impl CanvasLayers {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            ambient: CanvasSurface::new(width, height),
            burst: CanvasSurface::new(width, height),
            visualizer: CanvasSurface::new(width, height),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.ambient.resize(width, height);
        self.burst.resize(width, height);
        self.visualizer.resize(width, height);
    }

    pub fn layers(&mut self) -> Layers<'_> {
        Layers::new(&mut self.ambient, &mut self.burst, &mut self.visualizer)
    }

    pub fn to_frame(&self, app: &App, frame: &Frame) {
        for (name, surface) in [
            ("ambient", &self.ambient),
            ("burst", &self.burst),
            ("visualizer", &self.visualizer),
        ] {
            if let Err(e) = surface.draw().to_frame(app, frame) {
                log::warn!("Failed to render {} layer: {:?}", name, e);
            }
        }
    }
}
