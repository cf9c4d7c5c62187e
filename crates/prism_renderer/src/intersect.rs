//! Ray-sphere intersection and closest-hit search.

use prism_core::Sphere;
use prism_math::{epsilon_equals, Interval, Ray};

/// A ray parameter paired with the sphere it hit.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub t: f32,
    pub sphere: &'a Sphere,
}

/// Solve `|O + tD - C|^2 = r^2` for the nearer root.
///
/// Returns `None` when the ray misses. The root is not filtered by sign:
/// a sphere behind the origin, or one containing it, yields a negative `t`,
/// and callers reject those with their own minimum distance.
pub fn intersect_ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let co = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * co.dot(ray.direction);
    let c = co.dot(co) - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    if epsilon_equals(discriminant, 0.0) {
        // Tangent
        return Some(-b / (2.0 * a));
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);
    Some(t1.min(t2))
}

/// Nearest sphere whose root lies strictly inside `window`.
///
/// Linear scan over every sphere.
pub fn closest_intersection<'a>(
    ray: &Ray,
    spheres: &'a [Sphere],
    window: Interval,
) -> Option<Hit<'a>> {
    let mut closest = None;
    let mut closest_so_far = window.max;

    for sphere in spheres {
        if let Some(t) = intersect_ray_sphere(ray, sphere) {
            if window.with_max(closest_so_far).surrounds(t) {
                closest_so_far = t;
                closest = Some(Hit { t, sphere });
            }
        }
    }

    closest
}

/// True if any sphere has a root strictly inside `window`.
pub fn any_intersection(ray: &Ray, spheres: &[Sphere], window: Interval) -> bool {
    spheres
        .iter()
        .filter_map(|sphere| intersect_ray_sphere(ray, sphere))
        .any(|t| window.surrounds(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::{Color, Vec3};

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Color::WHITE)
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let target = sphere(Vec3::new(5.0, 5.0, 5.0), 0.1);
        assert_eq!(intersect_ray_sphere(&ray, &target), None);
    }

    #[test]
    fn test_direct_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let target = sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = intersect_ray_sphere(&ray, &target).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_tangent_hit() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z);
        let target = sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = intersect_ray_sphere(&ray, &target).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_roots_are_not_filtered_by_sign() {
        // Sphere entirely behind the origin
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let behind = sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let t = intersect_ray_sphere(&ray, &behind).unwrap();
        assert!((t + 6.0).abs() < 1e-5);

        // Origin inside the sphere: nearer root is negative
        let around = sphere(Vec3::ZERO, 2.0);
        let t = intersect_ray_sphere(&ray, &around).unwrap();
        assert!((t + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_unnormalized_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        let target = sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = intersect_ray_sphere(&ray, &target).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_picks_nearest() {
        let spheres = [
            sphere(Vec3::new(0.0, 0.0, 10.0), 1.0),
            sphere(Vec3::new(0.0, 0.0, 5.0), 1.0),
            sphere(Vec3::new(0.0, 0.0, -5.0), 1.0),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = closest_intersection(&ray, &spheres, Interval::new(0.01, f32::MAX)).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert_eq!(hit.sphere.center, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_closest_respects_window() {
        let spheres = [sphere(Vec3::new(0.0, 0.0, 5.0), 1.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert!(closest_intersection(&ray, &spheres, Interval::new(0.01, 4.0)).is_none());
        assert!(closest_intersection(&ray, &spheres, Interval::new(4.0, 100.0)).is_none());
        assert!(closest_intersection(&ray, &spheres, Interval::new(3.9, 4.1)).is_some());
    }

    #[test]
    fn test_any_intersection() {
        let spheres = [sphere(Vec3::new(0.0, 0.0, 5.0), 1.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(any_intersection(&ray, &spheres, Interval::new(0.01, 4.5)));
        assert!(!any_intersection(&ray, &spheres, Interval::new(0.01, 4.0)));
        assert!(!any_intersection(&ray, &[], Interval::new(0.01, 4.5)));
    }
}
