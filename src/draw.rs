//! Drawing primitives.
//!
//! [`PixelDrawer`] implements [`Drawer`] for any image. Each primitive is
//! built as a `tiny_skia` path, rasterized without anti-aliasing into a
//! coverage pixmap the size of the canvas, and the covered pixels are written
//! back through the image, so it behaves the same on every backend.
//!
//! Geometry is clipped against the canvas (plus a margin for the stroke)
//! before it reaches the rasterizer. Shapes that fall outside the canvas are
//! dropped silently and never cost more than the visible part.
//!
//! Angles are in degrees, measured clockwise from the 3 o'clock position (the
//! y axis points down). An end angle smaller than the start wraps around by
//! a full turn. Ellipse-based shapes take the *full* width and height of the
//! ellipse in `size`, centered on `center`.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Dimensions, Point};
use crate::imaging::Image;
use std::fmt;
use std::path::Path;
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Largest number of segments an arc is flattened into.
const MAX_ARC_STEPS: usize = 1 << 18;

/// Maximum distance, in pixels, between a flattened arc and the true curve.
const ARC_TOLERANCE: f64 = 0.1;

/// Stroke and fill settings for a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    /// Stroke width in pixels, at least 1.
    pub thickness: u32,
    /// Whether closed shapes are filled as well as outlined.
    pub fill: bool,
}

impl Pen {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            thickness: 1,
            fill: false,
        }
    }

    pub fn thickness(self, thickness: u32) -> Self {
        Self {
            thickness: thickness.max(1),
            ..self
        }
    }

    pub fn filled(self) -> Self {
        Self { fill: true, ..self }
    }

    fn width(&self) -> f32 {
        self.thickness.max(1) as f32
    }

    fn stroke(&self, line_cap: LineCap) -> Stroke {
        Stroke {
            width: self.width(),
            line_cap,
            ..Stroke::default()
        }
    }
}

/// A typeface handle used by [`Drawer::text`].
pub trait Font: fmt::Debug {
    fn file(&self) -> &Path;
    fn size(&self) -> u32;
    fn color(&self) -> Color;
    /// Extent `text` occupies when rendered.
    fn text_box(&self, text: &str) -> Result<Dimensions>;
}

/// Primitives that paint into an image, each returning the drawer for chaining.
///
/// Arguments that can never describe a shape are rejected before anything is
/// painted: a polygon with fewer than three points, or a non-finite arc angle,
/// fails with [`Error::InvalidArgument`]. A primitive that fails while painting,
/// or one the backend cannot render at all, fails with [`Error::Runtime`].
pub trait Drawer {
    fn arc(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self>;

    /// Arc closed by the straight line between its endpoints.
    fn chord(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self>;

    fn ellipse(&mut self, center: Point, size: Dimensions, pen: Pen) -> Result<&mut Self>;

    fn line(&mut self, start: Point, end: Point, pen: Pen) -> Result<&mut Self>;

    /// Arc closed by two radii through the center.
    fn pie_slice(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self>;

    fn dot(&mut self, position: Point, color: Color) -> Result<&mut Self>;

    /// Closed polygon through at least three points.
    fn polygon(&mut self, points: &[Point], pen: Pen) -> Result<&mut Self>;

    fn text(
        &mut self,
        text: &str,
        font: &dyn Font,
        position: Point,
        angle: f64,
    ) -> Result<&mut Self>;
}

/// A point in pixel coordinates; integer values address pixel corners.
type Vertex = (f64, f64);

/// [`Drawer`] bound to one image.
pub struct PixelDrawer<'a> {
    image: &'a mut Image,
}

impl<'a> PixelDrawer<'a> {
    pub(crate) fn new(image: &'a mut Image) -> Self {
        Self { image }
    }

    /// Canvas rectangle grown far enough that strokes along its border,
    /// joins included, never reach a visible pixel.
    fn clip_bounds(&self, pen: Pen) -> Bounds {
        let size = self.image.size();
        let margin = 2.0 * f64::from(pen.thickness.max(1)) + 2.0;
        Bounds {
            left: -margin,
            top: -margin,
            right: f64::from(size.width()) + margin,
            bottom: f64::from(size.height()) + margin,
        }
    }

    /// Rasterizes through `render` and paints every covered pixel with `color`.
    fn cover<F>(&mut self, color: Color, render: F) -> Result<()>
    where
        F: FnOnce(&mut Pixmap, &Paint<'static>),
    {
        let size = self.image.size();
        let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            Error::runtime(format!("Cannot allocate a {size} drawing surface"))
        })?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = false;
        render(&mut pixmap, &paint);

        let width = size.width() as usize;
        let covered = pixmap
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, pixel)| pixel.alpha() > 0)
            .map(|(i, _)| Point::new((i % width) as u32, (i / width) as u32));
        for point in covered {
            self.image.set_color_at(point, color)?;
        }
        Ok(())
    }

    /// Square of the pen's width centered on one pixel.
    fn stamp(&mut self, at: Vertex, pen: Pen) -> Result<()> {
        let half = pen.width() / 2.0;
        let Some(square) = Rect::from_xywh(
            at.0 as f32 + 0.5 - half,
            at.1 as f32 + 0.5 - half,
            pen.width(),
            pen.width(),
        ) else {
            return Ok(());
        };
        self.cover(pen.color, |pixmap, paint| {
            pixmap.fill_rect(square, paint, Transform::identity(), None);
        })
    }

    fn stroke_open(&mut self, vertices: &[Vertex], pen: Pen) -> Result<()> {
        let bounds = self.clip_bounds(pen);
        if let [only] = vertices {
            if bounds.contains(*only) {
                self.stamp(*only, pen)?;
            }
            return Ok(());
        }
        let Some(path) = open_path(vertices, &bounds) else {
            return Ok(());
        };
        let stroke = pen.stroke(LineCap::Square);
        self.cover(pen.color, |pixmap, paint| {
            pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
        })
    }

    fn shape(&mut self, outline: &[Vertex], pen: Pen) -> Result<()> {
        let bounds = self.clip_bounds(pen);
        let Some(path) = closed_path(&clip_polygon(outline, &bounds)) else {
            return Ok(());
        };
        let stroke = pen.stroke(LineCap::Butt);
        self.cover(pen.color, |pixmap, paint| {
            if pen.fill {
                pixmap.fill_path(&path, paint, FillRule::EvenOdd, Transform::identity(), None);
            }
            pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
        })
    }
}

impl Drawer for PixelDrawer<'_> {
    fn arc(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self> {
        let vertices = arc_vertices(center, size, start, end)?;
        self.stroke_open(&vertices, pen)?;
        Ok(self)
    }

    fn chord(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self> {
        let vertices = arc_vertices(center, size, start, end)?;
        self.shape(&vertices, pen)?;
        Ok(self)
    }

    fn ellipse(&mut self, center: Point, size: Dimensions, pen: Pen) -> Result<&mut Self> {
        let mut vertices = arc_vertices(center, size, 0.0, 360.0)?;
        vertices.pop();
        self.shape(&vertices, pen)?;
        Ok(self)
    }

    fn line(&mut self, start: Point, end: Point, pen: Pen) -> Result<&mut Self> {
        let bounds = self.clip_bounds(pen);
        match clip_segment(vertex(start), vertex(end), &bounds) {
            Some((a, b)) if a == b => self.stamp(a, pen)?,
            Some((a, b)) => self.stroke_open(&[a, b], pen)?,
            None => {}
        }
        Ok(self)
    }

    fn pie_slice(
        &mut self,
        center: Point,
        size: Dimensions,
        start: f64,
        end: f64,
        pen: Pen,
    ) -> Result<&mut Self> {
        let mut vertices = vec![vertex(center)];
        vertices.extend(arc_vertices(center, size, start, end)?);
        self.shape(&vertices, pen)?;
        Ok(self)
    }

    fn dot(&mut self, position: Point, color: Color) -> Result<&mut Self> {
        if position.is_in(self.image.size()) {
            self.image.set_color_at(position, color)?;
        }
        Ok(self)
    }

    fn polygon(&mut self, points: &[Point], pen: Pen) -> Result<&mut Self> {
        if points.len() < 3 {
            return Err(Error::invalid_argument(format!(
                "A polygon must consist of at least 3 points, {} given",
                points.len()
            )));
        }
        let vertices: Vec<Vertex> = points.iter().copied().map(vertex).collect();
        self.shape(&vertices, pen)?;
        Ok(self)
    }

    fn text(
        &mut self,
        text: &str,
        font: &dyn Font,
        _position: Point,
        _angle: f64,
    ) -> Result<&mut Self> {
        Err(Error::runtime(format!(
            "Cannot render {:?} with font {}: text rendering is not supported by the {} backend",
            text,
            font.file().display(),
            self.image.kind()
        )))
    }
}

fn vertex(point: Point) -> Vertex {
    (f64::from(point.x), f64::from(point.y))
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

/// Axis-aligned clip rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Bounds {
    fn contains(&self, (x, y): Vertex) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    fn inside(&self, side: Side, (x, y): Vertex) -> bool {
        match side {
            Side::Left => x >= self.left,
            Side::Top => y >= self.top,
            Side::Right => x <= self.right,
            Side::Bottom => y <= self.bottom,
        }
    }

    /// Where the edge `from`-`to` crosses `side`; the edge must cross it.
    fn crossing(&self, side: Side, (x0, y0): Vertex, (x1, y1): Vertex) -> Vertex {
        match side {
            Side::Left | Side::Right => {
                let x = if let Side::Left = side { self.left } else { self.right };
                (x, y0 + (y1 - y0) * (x - x0) / (x1 - x0))
            }
            Side::Top | Side::Bottom => {
                let y = if let Side::Top = side { self.top } else { self.bottom };
                (x0 + (x1 - x0) * (y - y0) / (y1 - y0), y)
            }
        }
    }
}

/// Liang-Barsky: the part of segment `a`-`b` inside `bounds`, if any.
fn clip_segment(a: Vertex, b: Vertex, bounds: &Bounds) -> Option<(Vertex, Vertex)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let limits = [
        (-dx, a.0 - bounds.left),
        (dx, bounds.right - a.0),
        (-dy, a.1 - bounds.top),
        (dy, bounds.bottom - a.1),
    ];
    for (p, q) in limits {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let start = if t0 > 0.0 { (a.0 + t0 * dx, a.1 + t0 * dy) } else { a };
    let end = if t1 < 1.0 { (a.0 + t1 * dx, a.1 + t1 * dy) } else { b };
    Some((start, end))
}

/// Sutherland-Hodgman: the closed outline cut down to `bounds`.
fn clip_polygon(vertices: &[Vertex], bounds: &Bounds) -> Vec<Vertex> {
    let mut output = vertices.to_vec();
    for side in [Side::Left, Side::Top, Side::Right, Side::Bottom] {
        let input = std::mem::take(&mut output);
        let Some(&last) = input.last() else {
            break;
        };
        let mut previous = last;
        for &current in &input {
            match (bounds.inside(side, previous), bounds.inside(side, current)) {
                (true, true) => output.push(current),
                (true, false) => output.push(bounds.crossing(side, previous, current)),
                (false, true) => {
                    output.push(bounds.crossing(side, previous, current));
                    output.push(current);
                }
                (false, false) => {}
            }
            previous = current;
        }
    }
    output
}

/// Shifts a vertex onto the pixel center it addresses.
fn to_skia((x, y): Vertex) -> (f32, f32) {
    ((x + 0.5) as f32, (y + 0.5) as f32)
}

/// Polyline through the visible runs of `vertices`.
fn open_path(vertices: &[Vertex], bounds: &Bounds) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    let mut cursor: Option<Vertex> = None;
    for pair in vertices.windows(2) {
        let Some((a, b)) = clip_segment(pair[0], pair[1], bounds) else {
            cursor = None;
            continue;
        };
        if cursor != Some(a) {
            let (x, y) = to_skia(a);
            builder.move_to(x, y);
        }
        let (x, y) = to_skia(b);
        builder.line_to(x, y);
        cursor = Some(b);
    }
    builder.finish()
}

fn closed_path(vertices: &[Vertex]) -> Option<tiny_skia::Path> {
    let (first, rest) = vertices.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut builder = PathBuilder::new();
    let (x, y) = to_skia(*first);
    builder.move_to(x, y);
    for &v in rest {
        let (x, y) = to_skia(v);
        builder.line_to(x, y);
    }
    builder.close();
    builder.finish()
}

/// Points along an elliptical arc, start and end included.
///
/// The arc is flattened finely enough to stay within [`ARC_TOLERANCE`] of the
/// curve, with at most [`MAX_ARC_STEPS`] segments.
fn arc_vertices(center: Point, size: Dimensions, start: f64, end: f64) -> Result<Vec<Vertex>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(Error::invalid_argument(format!(
            "Arc angles must be finite, {start} and {end} given"
        )));
    }
    let mut sweep = end - start;
    if sweep < 0.0 {
        sweep = sweep.rem_euclid(360.0);
    }
    let sweep = sweep.min(360.0);

    let (rx, ry) = (f64::from(size.width()) / 2.0, f64::from(size.height()) / 2.0);
    let (cx, cy) = vertex(center);
    let radius = rx.max(ry).max(1.0);
    let step_angle = 2.0 * (1.0 - ARC_TOLERANCE / radius).acos();
    let steps = (sweep.to_radians() / step_angle).ceil().clamp(4.0, MAX_ARC_STEPS as f64) as usize;

    let mut vertices: Vec<Vertex> = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let theta = (start + sweep * i as f64 / steps as f64).to_radians();
        let v = (cx + rx * theta.cos(), cy + ry * theta.sin());
        if vertices.last() != Some(&v) {
            vertices.push(v);
        }
    }
    Ok(vertices)
}
