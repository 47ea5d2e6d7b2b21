//! CPU ray picking against interactive scene objects.
//!
//! Hotspots are few and geometrically simple, so each one is tested with an
//! analytic proxy (sphere or axis-aligned box) rather than its triangles.

mod ray;

pub use ray::{ray_aabb_intersect, ray_sphere_intersect, Ray};

use glam::Vec3;

/// Analytic shape used for ray tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProxyShape {
    /// Sphere of the given radius.
    Sphere {
        /// World-space radius.
        radius: f32,
    },
    /// Axis-aligned box with the given half extent along every axis.
    Box {
        /// World-space half edge length.
        half_extent: f32,
    },
}

/// A pickable object: its index in the owning collection plus a proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitProxy {
    /// Index of the object in the caller's collection.
    pub index: usize,
    /// World-space center.
    pub center: Vec3,
    /// Proxy shape around `center`.
    pub shape: ProxyShape,
}

impl HitProxy {
    /// Distance along `ray` to this proxy, if hit in front of the origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self.shape {
            ProxyShape::Sphere { radius } => ray_sphere_intersect(
                ray.origin,
                ray.direction,
                self.center,
                radius,
            ),
            ProxyShape::Box { half_extent } => {
                let half = Vec3::splat(half_extent);
                ray_aabb_intersect(
                    ray.origin,
                    ray.direction,
                    self.center - half,
                    self.center + half,
                )
            }
        }
    }
}

/// A ray hit, ordered by `distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the hit object (from [`HitProxy::index`]).
    pub index: usize,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Test `ray` against every candidate; hits are returned nearest first.
#[must_use]
pub fn intersect_proxies(ray: &Ray, candidates: &[HitProxy]) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = candidates
        .iter()
        .filter_map(|proxy| {
            proxy.intersect(ray).map(|distance| RayHit {
                index: proxy.index,
                distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(index: usize, center: Vec3, radius: f32) -> HitProxy {
        HitProxy {
            index,
            center,
            shape: ProxyShape::Sphere { radius },
        }
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let candidates = [
            sphere(0, Vec3::new(0.0, 0.0, -5.0), 0.5),
            sphere(1, Vec3::new(0.0, 0.0, 2.0), 0.5),
            sphere(2, Vec3::new(5.0, 0.0, 0.0), 0.5),
        ];
        let hits = intersect_proxies(&ray, &candidates);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[1].index, 0);
        assert!((hits[0].distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn box_proxy_is_hit_on_its_face() {
        let ray = Ray::new(Vec3::new(0.2, 0.1, 10.0), Vec3::NEG_Z);
        let proxy = HitProxy {
            index: 3,
            center: Vec3::ZERO,
            shape: ProxyShape::Box { half_extent: 0.5 },
        };
        let hits = intersect_proxies(&ray, &[proxy]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn box_proxy_missed_beside_face() {
        let ray = Ray::new(Vec3::new(0.6, 0.0, 10.0), Vec3::NEG_Z);
        let proxy = HitProxy {
            index: 0,
            center: Vec3::ZERO,
            shape: ProxyShape::Box { half_extent: 0.5 },
        };
        assert!(intersect_proxies(&ray, &[proxy]).is_empty());
    }

    #[test]
    fn no_candidates_no_hits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_proxies(&ray, &[]).is_empty());
    }
}
