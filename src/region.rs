//! Axis-aligned cubic bounding volume and its octant subdivision.

use crate::vec3::Vec3;

/// A cube of side `2 * half_size` centered on `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Vec3,
    pub half_size: f64,
}

impl Region {
    pub fn new(center: Vec3, half_size: f64) -> Self {
        Self { center, half_size }
    }

    /// Closed-interval membership test on all three axes.
    pub fn contains(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.half_size
            && (point.y - self.center.y).abs() <= self.half_size
            && (point.z - self.center.z).abs() <= self.half_size
    }

    /// Child region `i` (`i` in `[0, 7]`), per the octant bit convention:
    /// bit 0 is x, bit 1 is y, bit 2 is z; a set bit means the child is
    /// offset in the positive direction on that axis.
    ///
    /// Panics if `i` is not in `[0, 7]` — an out-of-range octant index is
    /// a programmer error.
    pub fn child_region(&self, i: usize) -> Self {
        assert!(i < 8, "octant index {i} out of range [0, 7]");

        let sign = |bit: usize| -> f64 {
            if i & bit != 0 {
                1.
            } else {
                -1.
            }
        };

        let offset = self.half_size / 2.;
        let center = self.center
            + Vec3::new(sign(0b001) * offset, sign(0b010) * offset, sign(0b100) * offset);

        Self::new(center, self.half_size / 2.)
    }

    /// The octant index of `point` relative to this region's center, per
    /// the `(z_bit << 2) | (y_bit << 1) | x_bit` convention. Boundary ties
    /// (`point.k == center.k`) are assigned to the upper octant.
    pub fn octant_of(&self, point: Vec3) -> usize {
        let bit = |p: f64, c: f64| -> usize {
            if p >= c {
                1
            } else {
                0
            }
        };

        bit(point.x, self.center.x)
            | (bit(point.y, self.center.y) << 1)
            | (bit(point.z, self.center.z) << 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_closed_interval() {
        let r = Region::new(Vec3::new_zero(), 1.);
        assert!(r.contains(Vec3::new(1., 1., 1.)));
        assert!(r.contains(Vec3::new(-1., -1., -1.)));
        assert!(!r.contains(Vec3::new(1.0001, 0., 0.)));
    }

    #[test]
    fn child_region_octant_roundtrip() {
        let r = Region::new(Vec3::new(1., 2., 3.), 4.);
        for i in 0..8 {
            let child = r.child_region(i);
            assert_eq!(r.octant_of(child.center), i);
        }
    }

    #[test]
    fn child_region_contains_offset_corner() {
        let r = Region::new(Vec3::new_zero(), 2.);
        for i in 0..8 {
            let child = r.child_region(i);
            let sign = |bit: usize| if i & bit != 0 { 1. } else { -1. };
            let corner = r.center
                + Vec3::new(
                    sign(0b001) * (r.half_size / 2.),
                    sign(0b010) * (r.half_size / 2.),
                    sign(0b100) * (r.half_size / 2.),
                );
            assert!(child.contains(corner));
        }
    }

    #[test]
    #[should_panic]
    fn child_region_out_of_range_panics() {
        let r = Region::new(Vec3::new_zero(), 1.);
        r.child_region(8);
    }
}
