//! Editor for the body-map ("byosen sheet") marks of a visit.

use reiki_types::{BodyView, ByosenPoint};

/// Clicking within this normalized distance of a mark removes it.
pub const TOGGLE_RADIUS: f64 = 0.035;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyMap {
    points: Vec<ByosenPoint>,
}

impl BodyMap {
    pub fn new(points: Vec<ByosenPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ByosenPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ByosenPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove the first mark of the same view within [`TOGGLE_RADIUS`], or add one.
    pub fn toggle(&mut self, x: f64, y: f64, view: Option<BodyView>) -> Toggle {
        let (x, y) = (clamp_unit(x), clamp_unit(y));
        let hit = self
            .points
            .iter()
            .position(|p| p.view == view && p.distance_to(x, y) < TOGGLE_RADIUS);
        if let Some(idx) = hit {
            self.points.remove(idx);
            Toggle::Removed
        } else {
            self.points.push(ByosenPoint { x, y, view });
            Toggle::Added
        }
    }

    /// Toggle at a pixel position inside a `width` x `height` viewport.
    pub fn toggle_in_viewport(
        &mut self,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
        view: Option<BodyView>,
    ) -> Option<Toggle> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(self.toggle(px / width, py / height, view))
    }

    /// Drop the most recent mark.
    pub fn undo(&mut self) -> Option<ByosenPoint> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
