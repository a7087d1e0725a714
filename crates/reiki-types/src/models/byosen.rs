//! Body-map ("byosen sheet") points recorded during a visit.

use serde::{Deserialize, Serialize};

/// Which side of the body drawing a point belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyView {
    Front,
    Back,
}

/// A mark on the body drawing, with coordinates normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ByosenPoint {
    pub x: f64,
    pub y: f64,
    /// Omitted for sheets that only have one drawing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<BodyView>,
}

impl ByosenPoint {
    /// Point on a single-view sheet.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, view: None }
    }

    /// Euclidean distance in normalized units.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}
