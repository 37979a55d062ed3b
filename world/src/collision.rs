//! Axis-aligned box geometry used for overlap tests and push-out resolution.

use basecamp_defence_core::Vec2;

/// Axis-aligned box described by its centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Aabb {
    pub(crate) center: Vec2,
    pub(crate) half: Vec2,
}

impl Aabb {
    pub(crate) fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Reports whether the two boxes share any area or touch edges.
    pub(crate) fn intersects(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        delta.x <= self.half.x + other.half.x && delta.y <= self.half.y + other.half.y
    }

    /// Smallest translation that moves `self` out of `other`, if they overlap.
    ///
    /// The translation runs along the axis of least penetration. Coincident
    /// centres separate along +x.
    pub(crate) fn separation(&self, other: &Aabb) -> Option<Vec2> {
        let delta = self.center - other.center;
        let overlap = self.half + other.half - delta.abs();
        if overlap.x <= 0.0 || overlap.y <= 0.0 {
            return None;
        }

        if overlap.x < overlap.y {
            let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
            Some(Vec2::new(overlap.x * sign, 0.0))
        } else {
            let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
            Some(Vec2::new(0.0, overlap.y * sign))
        }
    }
}
