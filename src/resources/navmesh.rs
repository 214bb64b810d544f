//! Navigation mesh proximity queries.
//!
//! The [`NavMesh`] resource wraps whatever navigation backend the host
//! provides behind the [`NavMeshSampler`] trait. Rules only ever ask one
//! question: "is there a point on the mesh close enough to this one?".
//!
//! [`FlatNavMesh`] is a small sampler made of horizontal rectangles, good
//! enough for flat play areas and for tests.

use bevy_ecs::prelude::Resource;
use glam::{Vec2, Vec3};

/// Area mask accepting every area.
pub const ALL_AREAS: i32 = -1;

/// Result of a successful sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavMeshHit {
    /// Closest point on the mesh.
    pub position: Vec3,
    /// Distance from the sampled point to `position`.
    pub distance: f32,
    /// Index of the area the point lies in.
    pub area: u8,
}

/// Navigation backend.
pub trait NavMeshSampler: Send + Sync {
    /// Find the closest mesh point within `max_distance` of `source` that lies
    /// in one of the areas selected by `area_mask`.
    fn sample_position(&self, source: Vec3, max_distance: f32, area_mask: i32)
    -> Option<NavMeshHit>;
}

/// Navigation mesh resource queried by navigation mesh rules.
#[derive(Resource)]
pub struct NavMesh {
    sampler: Box<dyn NavMeshSampler>,
}

impl NavMesh {
    pub fn new(sampler: impl NavMeshSampler + 'static) -> Self {
        Self {
            sampler: Box::new(sampler),
        }
    }

    pub fn sample_position(
        &self,
        source: Vec3,
        max_distance: f32,
        area_mask: i32,
    ) -> Option<NavMeshHit> {
        self.sampler.sample_position(source, max_distance, area_mask)
    }
}

/// Horizontal rectangle of walkable surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavMeshRegion {
    pub min: Vec2,
    pub max: Vec2,
    /// Height of the surface.
    pub height: f32,
    /// Area index in `0..32`.
    pub area: u8,
}

impl NavMeshRegion {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
            area: 0,
        }
    }

    pub fn with_area(mut self, area: u8) -> Self {
        self.area = area;
        self
    }

    fn closest_point(&self, source: Vec3) -> Vec3 {
        let planar = Vec2::new(source.x, source.z).clamp(self.min, self.max);
        Vec3::new(planar.x, self.height, planar.y)
    }
}

/// Sampler built from flat rectangular regions on the XZ plane.
#[derive(Clone, Debug, Default)]
pub struct FlatNavMesh {
    pub regions: Vec<NavMeshRegion>,
}

impl FlatNavMesh {
    pub fn new(regions: Vec<NavMeshRegion>) -> Self {
        Self { regions }
    }
}

fn area_selected(area_mask: i32, area: u8) -> bool {
    area < 32 && (area_mask as u32 & (1u32 << area)) != 0
}

impl NavMeshSampler for FlatNavMesh {
    fn sample_position(
        &self,
        source: Vec3,
        max_distance: f32,
        area_mask: i32,
    ) -> Option<NavMeshHit> {
        self.regions
            .iter()
            .filter(|region| area_selected(area_mask, region.area))
            .map(|region| {
                let position = region.closest_point(source);
                NavMeshHit {
                    position,
                    distance: position.distance(source),
                    area: region.area,
                }
            })
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> FlatNavMesh {
        FlatNavMesh::new(vec![
            NavMeshRegion::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 0.0),
            NavMeshRegion::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0), 2.0).with_area(3),
        ])
    }

    #[test]
    fn sample_inside_region_hits_surface() {
        let hit = floor()
            .sample_position(Vec3::new(0.5, 0.05, 0.5), 0.1, ALL_AREAS)
            .unwrap();
        assert_eq!(hit.position, Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(hit.area, 0);
    }

    #[test]
    fn sample_too_far_misses() {
        assert!(
            floor()
                .sample_position(Vec3::new(0.0, 1.0, 0.0), 0.1, ALL_AREAS)
                .is_none()
        );
    }

    #[test]
    fn sample_respects_area_mask() {
        let mesh = floor();
        let source = Vec3::new(5.5, 2.0, 5.5);
        assert!(mesh.sample_position(source, 0.1, 1 << 3).is_some());
        assert!(mesh.sample_position(source, 0.1, 1 << 0).is_none());
    }

    #[test]
    fn nav_mesh_resource_delegates() {
        let nav = NavMesh::new(floor());
        assert!(nav.sample_position(Vec3::ZERO, 0.1, ALL_AREAS).is_some());
    }
}
