// ABOUTME: Geometry primitives shared by the layout engine and the host.
// ABOUTME: Orientation of a split plus points, sizes and rectangles in points.

use serde::{Deserialize, Serialize};

/// Direction along which a container lays out its children.
///
/// `Row` places children side by side (dividers are vertical lines), so its
/// axis is the width. `Column` stacks children (dividers are horizontal
/// lines), so its axis is the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Row,
    Column,
}

impl Orientation {
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Row => Orientation::Column,
            Orientation::Column => Orientation::Row,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Row => "row",
            Orientation::Column => "column",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along the axis a container of `orientation` lays out on
    pub fn extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Row => self.width,
            Orientation::Column => self.height,
        }
    }
}

/// Rectangle in points, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn extent(&self, orientation: Orientation) -> f32 {
        self.size().extent(orientation)
    }

    /// Sub-rectangle covering `[start, start + length)` along the axis,
    /// measured from this rectangle's origin. The cross axis is unchanged.
    pub fn slice(&self, orientation: Orientation, start: f32, length: f32) -> Rect {
        match orientation {
            Orientation::Row => Rect::new(self.x + start, self.y, length, self.height),
            Orientation::Column => Rect::new(self.x, self.y + start, self.width, length),
        }
    }

    /// Grow along the axis by `delta`, keeping the rectangle centred
    pub fn grow_centered(&self, orientation: Orientation, delta: f32) -> Rect {
        match orientation {
            Orientation::Row => Rect::new(
                self.x - delta / 2.0,
                self.y,
                self.width + delta,
                self.height,
            ),
            Orientation::Column => Rect::new(
                self.x,
                self.y - delta / 2.0,
                self.width,
                self.height + delta,
            ),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
