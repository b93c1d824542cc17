// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spatial selections over video frames and their brightness series.
//!
//! A [`Shape`] covers a set of pixels; a [`Region`] is either a single shape or a feature
//! group (grid cells, mask clusters) contributing one series per member shape. Frames are
//! grayscale images indexed `[y, x]`.

use ndarray::{Array1, Array2, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::binning::TimeSeries;
use crate::error::{CaimError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Axis-aligned box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub tl: Point,
    pub br: Point,
}

impl BoundingBox {
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            tl: Point::new(a.x.min(b.x), a.y.min(b.y)),
            br: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> i64 {
        self.br.x - self.tl.x
    }

    pub fn height(&self) -> i64 {
        self.br.y - self.tl.y
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.tl.x <= x && x <= self.br.x && self.tl.y <= y && y <= self.br.y
    }

    /// Grow the box to cover `p`.
    pub fn include(&mut self, p: Point) {
        self.tl.x = self.tl.x.min(p.x);
        self.tl.y = self.tl.y.min(p.y);
        self.br.x = self.br.x.max(p.x);
        self.br.y = self.br.y.max(p.y);
    }

    fn around(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::new(*first, *first);
        for p in rest {
            bbox.include(*p);
        }
        Some(bbox)
    }
}

/// A single selection shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    /// Every pixel of the inclusive box spanned by two corners.
    Rectangle { a: Point, b: Point },
    /// Pixels within `radius` of `center`.
    Circle { center: Point, radius: f64 },
    /// Closed polygon; pixels inside by the even-odd rule.
    FreeForm { boundary: Vec<Point> },
    /// An explicit list of pixels.
    PointSet { points: Vec<Point> },
}

impl Shape {
    pub fn rectangle(a: Point, b: Point) -> Self {
        Shape::Rectangle { a, b }
    }

    /// Circle centred on `center` passing through `edge`.
    pub fn circle(center: Point, edge: Point) -> Self {
        Shape::Circle {
            center,
            radius: center.distance(edge),
        }
    }

    pub fn free_form(boundary: Vec<Point>) -> Result<Self> {
        if boundary.is_empty() {
            return Err(CaimError::invalid("free-form shape needs at least one point"));
        }
        Ok(Shape::FreeForm { boundary })
    }

    pub fn point_set(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(CaimError::invalid("point set needs at least one point"));
        }
        Ok(Shape::PointSet { points })
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Rectangle { a, b } => BoundingBox::new(*a, *b),
            Shape::Circle { center, radius } => {
                let r = radius.ceil() as i64;
                BoundingBox::new(
                    Point::new(center.x - r, center.y - r),
                    Point::new(center.x + r, center.y + r),
                )
            }
            Shape::FreeForm { boundary: points } | Shape::PointSet { points } => {
                let origin = Point::new(0, 0);
                BoundingBox::around(points).unwrap_or(BoundingBox::new(origin, origin))
            }
        }
    }

    pub fn is_inside(&self, x: i64, y: i64) -> bool {
        match self {
            Shape::Rectangle { a, b } => BoundingBox::new(*a, *b).contains(x, y),
            Shape::Circle { center, radius } => center.distance(Point::new(x, y)) <= *radius,
            Shape::FreeForm { boundary } => polygon_contains(boundary, x as f64, y as f64),
            Shape::PointSet { points } => points.iter().any(|p| p.x == x && p.y == y),
        }
    }

    /// Pixels of the bounding box that lie inside the shape, row by row.
    pub fn interior(&self) -> Vec<Point> {
        if let Shape::PointSet { points } = self {
            return points.clone();
        }
        let bbox = self.bounding_box();
        let mut out = Vec::new();
        for y in bbox.tl.y..=bbox.br.y {
            for x in bbox.tl.x..=bbox.br.x {
                if self.is_inside(x, y) {
                    out.push(Point::new(x, y));
                }
            }
        }
        out
    }

    /// Mean brightness (scaled to `[0, 1]`) of the interior pixels in every frame.
    ///
    /// Interior pixels outside a frame are skipped.
    ///
    /// # Errors
    /// `InvalidInput` if there are no frames, or if a frame contains none of the interior.
    pub fn timeseries(&self, frames: &[Array2<u8>]) -> Result<TimeSeries> {
        if frames.is_empty() {
            return Err(CaimError::invalid("no frames to sample"));
        }
        let interior = self.interior();
        let mut series = Array1::zeros(frames.len());
        for (t, frame) in frames.iter().enumerate() {
            let (height, width) = frame.dim();
            let mut sum = 0.0;
            let mut count = 0usize;
            for p in &interior {
                if (0..width as i64).contains(&p.x) && (0..height as i64).contains(&p.y) {
                    sum += f64::from(frame[[p.y as usize, p.x as usize]]) / 255.0;
                    count += 1;
                }
            }
            if count == 0 {
                return Err(CaimError::invalid(format!(
                    "shape covers no pixels of frame {t}"
                )));
            }
            series[t] = sum / count as f64;
        }
        Ok(series)
    }
}

// Even-odd ray casting towards +x.
fn polygon_contains(boundary: &[Point], x: f64, y: f64) -> bool {
    let mut inside = false;
    let len = boundary.len();
    for i in 0..len {
        let p = boundary[i];
        let q = boundary[(i + 1) % len];
        let (px, py, qx, qy) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
        if (py <= y && qy > y) || (py > y && qy <= y) {
            let v = (y - py) / (qy - py);
            if x < px + v * (qx - px) {
                inside = !inside;
            }
        }
    }
    inside
}

/// A user selection contributing one or more series to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Region {
    Shape(Shape),
    /// A box split into `cells_wide * cells_high` rectangles, row-major.
    Grid {
        a: Point,
        b: Point,
        cells_wide: usize,
        cells_high: usize,
        shapes: Vec<Shape>,
    },
    /// One point set per distinct non-black colour of a mask image.
    Mask { shapes: Vec<Shape> },
}

impl From<Shape> for Region {
    fn from(shape: Shape) -> Self {
        Region::Shape(shape)
    }
}

impl Region {
    /// Split the box spanned by `a` and `b` into a grid of rectangular cells.
    ///
    /// Cell edges are placed at `tl + floor(i * extent / cells)`, so the cells tile the box.
    pub fn grid(a: Point, b: Point, cells_wide: usize, cells_high: usize) -> Result<Self> {
        if cells_wide == 0 || cells_high == 0 {
            return Err(CaimError::range("grid needs at least one cell in each direction"));
        }
        let bbox = BoundingBox::new(a, b);
        let edge = |origin: i64, extent: i64, i: usize, cells: usize| {
            origin + extent * i as i64 / cells as i64
        };
        let mut shapes = Vec::with_capacity(cells_wide * cells_high);
        for i in 0..cells_high {
            for j in 0..cells_wide {
                let u = Point::new(
                    edge(bbox.tl.x, bbox.width(), j, cells_wide),
                    edge(bbox.tl.y, bbox.height(), i, cells_high),
                );
                let v = Point::new(
                    edge(bbox.tl.x, bbox.width(), j + 1, cells_wide),
                    edge(bbox.tl.y, bbox.height(), i + 1, cells_high),
                );
                shapes.push(Shape::rectangle(u, v));
            }
        }
        Ok(Region::Grid {
            a,
            b,
            cells_wide,
            cells_high,
            shapes,
        })
    }

    /// Cluster the pixels of an RGB image (`[height, width, 3]`) by colour.
    ///
    /// Black pixels are background. Clusters are ordered by the first pixel of each colour
    /// in row-major scan order.
    pub fn mask_from_rgb(image: ArrayView3<'_, u8>) -> Result<Self> {
        let (height, width, channels) = image.dim();
        if channels < 3 {
            return Err(CaimError::invalid(format!(
                "mask image needs 3 colour channels, got {channels}"
            )));
        }
        let mut colors: Vec<[u8; 3]> = Vec::new();
        let mut clusters: Vec<Vec<Point>> = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let c = [image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]]];
                if c == [0, 0, 0] {
                    continue;
                }
                let p = Point::new(x as i64, y as i64);
                match colors.iter().position(|d| *d == c) {
                    Some(idx) => clusters[idx].push(p),
                    None => {
                        colors.push(c);
                        clusters.push(vec![p]);
                    }
                }
            }
        }
        if clusters.is_empty() {
            return Err(CaimError::invalid("mask image has no coloured regions"));
        }
        let shapes = clusters
            .into_iter()
            .map(|points| Shape::PointSet { points })
            .collect();
        Ok(Region::Mask { shapes })
    }

    /// Member shapes; a single shape is a group of one.
    pub fn shapes(&self) -> &[Shape] {
        match self {
            Region::Shape(shape) => std::slice::from_ref(shape),
            Region::Grid { shapes, .. } | Region::Mask { shapes } => shapes,
        }
    }

    pub fn is_feature_group(&self) -> bool {
        !matches!(self, Region::Shape(_))
    }

    /// Number of series the region contributes.
    pub fn series_count(&self) -> usize {
        self.shapes().len()
    }

    /// One brightness series per member shape.
    pub fn timeseries(&self, frames: &[Array2<u8>]) -> Result<Vec<TimeSeries>> {
        self.shapes().iter().map(|s| s.timeseries(frames)).collect()
    }
}
