// THEORY:
// A `Region` is one connected patch of matching pixels in a single frame, as
// seen through its external boundary. Like the other per-frame containers it
// is stateless: it knows nothing about the previous frame and is discarded
// once the frame has been annotated.
//
// Two derived attributes drive everything downstream:
// - `area`: the polygon area enclosed by the boundary, traced through pixel
//   centres. It filters out specks and picks the largest region.
// - `bounding_box`: the axis-aligned box covering every boundary pixel. It is
//   what the annotator draws.

use imageproc::point::Point;

/// An axis-aligned rectangle in pixel coordinates. Width and height are
/// inclusive of both edge pixels, so a single pixel has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// The tightest box around a set of points, or `None` for no points.
    pub fn enclosing(points: &[Point<u32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Some(BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    pub fn right(&self) -> u32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height - 1
    }
}

/// A connected foreground region of a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Position of this region in trace order for the current frame only.
    pub id: usize,
    pub bounding_box: BoundingBox,
    /// Area enclosed by the external boundary, in square pixels.
    pub area: f64,
    /// The external boundary pixels, in tracing order.
    pub boundary: Vec<Point<u32>>,
}

impl Region {
    pub fn from_boundary(id: usize, boundary: Vec<Point<u32>>) -> Option<Self> {
        let bounding_box = BoundingBox::enclosing(&boundary)?;
        Some(Region {
            id,
            bounding_box,
            area: enclosed_area(&boundary),
            boundary,
        })
    }
}

/// Shoelace area of a closed polygon.
pub fn enclosed_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice_area.abs() as f64 / 2.0
}
