// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use ultraviolet::DVec3;

/// An axis-aligned bounding box defined by two opposite corners (`min` and `max`).
/// `min.x <= max.x`, `min.y <= max.y`, `min.z <= max.z` once at least one point is enclosed.
#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for BoundingBox {
    /// An empty box: enclosing any point turns it into that point.
    fn default() -> Self {
        Self {
            min: DVec3::broadcast(f64::INFINITY),
            max: DVec3::broadcast(f64::NEG_INFINITY),
        }
    }
}

impl BoundingBox {
    /// Returns the smallest `BoundingBox` containing every point of `points`.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Self {
        let mut bbox = Self::default();
        for point in points {
            bbox.enclose_point(point);
        }
        bbox
    }

    /// True until the first point has been enclosed.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Edge lengths along x, y and z. Zero for an empty box.
    pub fn extent(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::zero();
        }
        self.max - self.min
    }

    /// Returns true if the provided `point` is inside this `BoundingBox`.
    /// Otherwise returns false.
    pub fn contains(&self, point: DVec3) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
            && self.min.z <= point.z
            && point.z <= self.max.z
    }

    /// Grows this `BoundingBox` in-place to ensure that it will contain a given `point`.
    pub fn enclose_point(&mut self, point: DVec3) {
        self.min.x = f64::min(self.min.x, point.x);
        self.min.y = f64::min(self.min.y, point.y);
        self.min.z = f64::min(self.min.z, point.z);

        self.max.x = f64::max(self.max.x, point.x);
        self.max.y = f64::max(self.max.y, point.y);
        self.max.z = f64::max(self.max.z, point.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encloses_points() {
        let bbox = BoundingBox::from_points([
            DVec3::new(1.0, -2.0, 0.5),
            DVec3::new(-1.0, 3.0, 0.0),
        ]);
        assert!(!bbox.is_empty());
        assert_eq!(bbox.extent(), DVec3::new(2.0, 5.0, 0.5));
        assert!(bbox.contains(DVec3::new(0.0, 0.0, 0.25)));
        assert!(!bbox.contains(DVec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn empty_box_has_no_extent() {
        let bbox = BoundingBox::default();
        assert!(bbox.is_empty());
        assert_eq!(bbox.extent(), DVec3::zero());
    }
}

// End of File
