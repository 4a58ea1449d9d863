//! Shadow matrix computation.
//!
//! Follows the reference implementation's exact order of operations rather
//! than the rounder prose description of it: the position push for a
//! directional light uses the *original* box's world size (not a
//! pre-adjusted one), and the far-plane distance is derived afterward from
//! the adjusted box. See `SPEC_FULL.md` §4.4 and §9's shadow open question.

use glam::{Mat4, Quat, Vec3};

use crate::utils::vec3_changed;

const POSITION_PUSH_FACTOR: f32 = 0.55;
const FAR_PLANE_SLACK: f32 = 1.01;
const NEAR_PLANE: f32 = 0.1;
const WINDOW_HALF_EXTENT_FACTOR: f32 = 0.55;
const DIRTY_EPSILON: f32 = 1e-4;

/// Axis-aligned world bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn midpoint(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn world_size(&self) -> f32 {
        (self.max - self.min).length()
    }

    #[must_use]
    pub fn union_point(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[must_use]
    pub fn transform(&self, m: Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut out = Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        };
        for c in corners {
            let p = m.transform_point3(c);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }
}

/// Orthographic view-projection covering a world box for one shadow-casting light.
pub struct ShadowMatrixComputation {
    light_position: Vec3,
    light_dir: Vec3,
    is_directional: bool,
    cached_box: Option<BoundingBox>,
    cached_matrix: Option<Mat4>,
}

impl ShadowMatrixComputation {
    /// `light_position_w` is the homogeneous w-component: 0 for a directional light.
    #[must_use]
    pub fn new(light_position: Vec3, light_position_w: f32, spot_direction: Vec3) -> Self {
        let light_dir = if spot_direction == Vec3::ZERO {
            Vec3::new(0.0, -1.0, 0.0)
        } else {
            spot_direction.normalize()
        };
        Self {
            light_position,
            light_dir,
            is_directional: light_position_w == 0.0,
            cached_box: None,
            cached_matrix: None,
        }
    }

    fn needs_update(&self, world_box: &BoundingBox) -> bool {
        match self.cached_box {
            None => true,
            Some(cached) => {
                vec3_changed(cached.min, world_box.min, DIRTY_EPSILON)
                    || vec3_changed(cached.max, world_box.max, DIRTY_EPSILON)
            }
        }
    }

    /// Recomputes (and memoizes) the shadow matrix for `world_box`. Returns
    /// the cached matrix unchanged if nothing moved beyond the epsilon.
    pub fn update_shadow_matrix(&mut self, world_box: BoundingBox) -> Mat4 {
        if !self.needs_update(&world_box) {
            return self.cached_matrix.unwrap();
        }

        let position = if self.is_directional {
            world_box.midpoint() + self.light_position.normalize_or_zero() * world_box.world_size() * POSITION_PUSH_FACTOR
        } else {
            self.light_position
        };

        let adjusted_box = world_box.union_point(position);
        let far = FAR_PLANE_SLACK * adjusted_box.world_size();
        let near = NEAR_PLANE;

        // View rotation is the minimal rotation carrying +Z onto the raw
        // (unpushed) light-position vector, not a look-at toward the box
        // midpoint: `examples/original_source/source/shadow/shadowMatrixComputation.cpp`
        // builds `GfRotation({0,0,1}, lightPosition)` directly, with no
        // explicit up-vector alignment.
        let rotation = Quat::from_rotation_arc(Vec3::Z, self.light_position.normalize_or(Vec3::Z));
        let view = Mat4::from_rotation_translation(rotation, position).inverse();

        let view_box = world_box.transform(view);
        let half_extent = (view_box.max - view_box.min) * WINDOW_HALF_EXTENT_FACTOR;

        let proj = Mat4::orthographic_rh(
            -half_extent.x,
            half_extent.x,
            -half_extent.y,
            half_extent.y,
            near,
            far.max(near + 0.01),
        );

        let matrix = proj * view;
        self.cached_box = Some(world_box);
        self.cached_matrix = Some(matrix);
        matrix
    }

    /// The most recently computed matrix, if [`update_shadow_matrix`] has run at least once.
    #[must_use]
    pub fn cached_matrix(&self) -> Option<Mat4> {
        self.cached_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_light_pushes_position_by_original_world_size() {
        let mut comp = ShadowMatrixComputation::new(Vec3::new(0.0, 1.0, 0.0), 0.0, Vec3::ZERO);
        let bbox = BoundingBox { min: Vec3::splat(-1.0), max: Vec3::splat(1.0) };
        let m1 = comp.update_shadow_matrix(bbox);
        // Calling again with the identical box must hit the cache (same matrix).
        let m2 = comp.update_shadow_matrix(bbox);
        assert_eq!(m1, m2);
    }

    #[test]
    fn box_growth_beyond_epsilon_invalidates_cache() {
        let mut comp = ShadowMatrixComputation::new(Vec3::new(0.0, 1.0, 0.0), 0.0, Vec3::ZERO);
        let bbox = BoundingBox { min: Vec3::splat(-1.0), max: Vec3::splat(1.0) };
        let m1 = comp.update_shadow_matrix(bbox);
        let bbox2 = BoundingBox { min: Vec3::splat(-2.0), max: Vec3::splat(2.0) };
        let m2 = comp.update_shadow_matrix(bbox2);
        assert_ne!(m1, m2);
    }
}
