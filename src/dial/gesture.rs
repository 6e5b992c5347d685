use super::angle::Point;

/// Follows a single drag gesture. GTK reports drag updates as offsets from the
/// press position, so the tracker keeps the press point to rebuild absolute
/// pointer positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    origin: Option<Point>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking when `start` lands within `hit_radius` of the knob.
    /// Returns whether the drag was accepted.
    pub fn begin(&mut self, start: Point, knob: Point, hit_radius: f64) -> bool {
        self.origin = (start.distance(knob) <= hit_radius).then_some(start);
        self.origin.is_some()
    }

    /// Absolute pointer position for an update, or `None` if no drag is active.
    pub fn update(&self, dx: f64, dy: f64) -> Option<Point> {
        self.origin.map(|origin| origin.offset(dx, dy))
    }

    pub fn end(&mut self) {
        self.origin = None;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}
