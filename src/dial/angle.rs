use super::state::Value;
use super::{DEFAULT_INSET, FULL_TURN, START_OFFSET, VALUE_MAX, VALUE_MIN};
use derive_more::{Deref, Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Angle in radians as drawn on screen: `START_OFFSET` is the top of the
/// circle and angles grow clockwise (y points down).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Deref, From, Into)]
pub struct Angle(f64);

impl Angle {
    pub fn radians(self) -> f64 {
        self.0
    }
}

/// Angle reached after sweeping `fraction` of the circle clockwise from the top.
pub fn fraction_to_angle(fraction: f64) -> Angle {
    Angle(fraction * FULL_TURN + START_OFFSET)
}

pub fn value_to_angle(value: Value) -> Angle {
    fraction_to_angle(value.fraction())
}

pub fn angle_to_point(angle: Angle, center: Point, radius: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Maps a pointer position to a value. Only the direction from `center`
/// matters, so any finite point lands in range.
pub fn point_to_value(point: Point, center: Point) -> Value {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    // undo the top-origin rotation
    let raw = dy.atan2(dx) - START_OFFSET;
    let normalized = if raw < 0.0 { raw + FULL_TURN } else { raw };
    let progress = normalized / FULL_TURN;
    Value::new(VALUE_MIN + progress * (VALUE_MAX - VALUE_MIN))
}

/// Where the dial sits inside a drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub radius: f64,
}

impl DialGeometry {
    /// Centers the dial in `size` and pulls the radius in by `inset` so the
    /// stroke stays inside the area. Areas smaller than the inset collapse to
    /// a zero radius.
    pub fn from_size(size: Size, inset: f64) -> Self {
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        let radius = (size.width.min(size.height) / 2.0 - inset).max(0.0);
        Self { center, radius }
    }

    pub fn knob_position(&self, value: Value) -> Point {
        angle_to_point(value_to_angle(value), self.center, self.radius)
    }

    pub fn value_at(&self, point: Point) -> Value {
        point_to_value(point, self.center)
    }
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self::from_size(Size::new(300.0, 300.0), DEFAULT_INSET)
    }
}
