//! Small utilities shared across the orchestration core.

/// Compares two floats component-wise within the reference epsilon used by
/// shadow-matrix dirtiness tracking (see [`crate::lighting::shadow`]).
#[must_use]
pub fn vec3_changed(a: glam::Vec3, b: glam::Vec3, epsilon: f32) -> bool {
    (a.x - b.x).abs() > epsilon || (a.y - b.y).abs() > epsilon || (a.z - b.z).abs() > epsilon
}
