// Vector utilities for ray tracing.
//
// glam::Vec3 already covers add/sub/scale/dot/cross/length/normalize;
// this adds the few operations the tracer needs on top.

use glam::Vec3;

/// Approximate float equality within machine epsilon.
#[inline]
pub fn epsilon_equals(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON
}

/// Extension trait for Vec3 with ray tracing helpers.
pub trait Vec3Ext {
    /// Reflect this direction about a unit normal: `d - 2(d.n)n`.
    fn reflect_about(self, normal: Vec3) -> Vec3;

    /// Normalize in place.
    ///
    /// A zero-length vector yields non-finite components, same as
    /// `Vec3::normalize`. Validate at construction time where that matters.
    fn normalize_in_place(&mut self);
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn reflect_about(self, normal: Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }

    #[inline]
    fn normalize_in_place(&mut self) {
        let length = self.length();
        *self /= length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_reflect_is_involution() {
        let normals = [
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.2, 0.9).normalize(),
        ];
        let directions = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(2.5, -0.7, 3.1),
        ];

        for n in normals {
            for d in directions {
                let r = d.reflect_about(n);
                assert_vec_near(r.reflect_about(n), d);
                assert!((r.length() - d.length()).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let r = Vec3::new(1.0, -1.0, 0.0).reflect_about(Vec3::Y);
        assert_vec_near(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_normalize_in_place() {
        let mut v = Vec3::new(3.0, 0.0, 4.0);
        v.normalize_in_place();
        assert_vec_near(v, Vec3::new(0.6, 0.0, 0.8));
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_not_finite() {
        let mut v = Vec3::ZERO;
        v.normalize_in_place();
        assert!(!v.is_finite());
    }

    #[test]
    fn test_epsilon_equals() {
        assert!(epsilon_equals(1.0, 1.0));
        assert!(epsilon_equals(0.0, f32::EPSILON * 0.5));
        assert!(!epsilon_equals(0.0, 0.001));
    }
}
