use std::f64::consts::PI;

pub mod angle;
pub mod gesture;
pub mod state;

pub use angle::{
    Angle, DialGeometry, Point, Size, angle_to_point, fraction_to_angle, point_to_value,
    value_to_angle,
};
pub use gesture::DragTracker;
pub use state::{DialHandle, DialState, SubscriptionId, Value};

pub const VALUE_MIN: f64 = 0.0;
pub const VALUE_MAX: f64 = 100.0;
pub const FULL_TURN: f64 = 2.0 * PI;
pub const START_OFFSET: f64 = -PI / 2.0; // zero-point at the top
pub const DEFAULT_INSET: f64 = 20.0;
