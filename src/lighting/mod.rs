//! LightingManager — reconciles the application's active-light list against
//! a set of light SPrim records, recomputing shadow matrices as needed (§4.4).

pub mod shadow;

use glam::{Mat4, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::ids::Path;
use crate::utils::vec3_changed;
use shadow::{BoundingBox, ShadowMatrixComputation};

const CAMERA_LIGHT_DEFAULT_ANGLE_DEGREES: f32 = 0.53;
const CAMERA_LIGHT_DEFAULT_INTENSITY: f32 = 15000.0;
const DIRTY_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Attached to the active camera; falls back to a distant light when the
    /// delegate has no dedicated camera-light SPrim type.
    Camera,
    /// Positional, infinite (homogeneous `w == 0`).
    Distant,
    /// Environment light, textured by a dome file.
    Dome,
}

#[derive(Clone, Debug)]
pub struct ShadowParams {
    pub resolution: u32,
    pub blur: f32,
}

/// The parameter block the app supplies per active light (§3.1 "Light Record").
#[derive(Clone, Debug, PartialEq)]
pub struct LightParams {
    pub kind: LightKind,
    pub intensity: f32,
    pub exposure: f32,
    pub normalize: bool,
    pub color: Vec3,
    pub transform: Mat4,
    /// Homogeneous position; `w == 0` marks a directional/infinite light.
    pub position: Vec4,
    pub spot_direction: Vec3,
    pub cast_shadows: bool,
    pub texture_file: Option<String>,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            kind: LightKind::Distant,
            intensity: 1.0,
            exposure: 0.0,
            normalize: false,
            color: Vec3::ONE,
            transform: Mat4::IDENTITY,
            position: Vec4::new(0.0, 1.0, 0.0, 0.0),
            spot_direction: Vec3::ZERO,
            cast_shadows: false,
            texture_file: None,
        }
    }
}

struct LightRecord {
    path: Path,
    params: LightParams,
    shadow: Option<(ShadowParams, ShadowMatrixComputation)>,
}

#[derive(Default)]
pub struct LightingManager {
    pass_path: Option<Path>,
    lights: Vec<LightRecord>,
    use_lighting: bool,
    material_network_lighting: bool,
}

impl LightingManager {
    #[must_use]
    pub fn new(pass_path: Path, material_network_lighting: bool) -> Self {
        Self {
            pass_path: Some(pass_path),
            lights: Vec::new(),
            use_lighting: false,
            material_network_lighting,
        }
    }

    #[must_use]
    pub fn use_lighting(&self) -> bool {
        self.use_lighting
    }

    #[must_use]
    pub fn shadows_enabled(&self) -> bool {
        self.lights.iter().any(|l| l.params.cast_shadows)
    }

    #[must_use]
    pub fn light_paths(&self) -> Vec<Path> {
        self.lights.iter().map(|l| l.path.clone()).collect()
    }

    /// §4.4 reconciliation protocol: grow/shrink the owned light list to
    /// match `active_lights.len()`, then diff parameters index-by-index.
    pub fn set_lighting(
        &mut self,
        active_lights: &[LightParams],
        world_extent: BoundingBox,
        shadow_params: Option<ShadowParams>,
    ) {
        let pass_path = self.pass_path.clone().unwrap_or_else(|| Path::from("/pass"));
        self.use_lighting = !active_lights.is_empty();

        while self.lights.len() < active_lights.len() {
            let i = self.lights.len();
            let path = pass_path.append(&format!("light{i}"));
            self.lights.push(LightRecord {
                path,
                params: LightParams::default(),
                shadow: None,
            });
        }
        while self.lights.len() > active_lights.len() {
            self.lights.pop();
        }

        for (i, target) in active_lights.iter().enumerate() {
            let record = &mut self.lights[i];
            if record.params != *target {
                record.params = target.clone();
            }

            if target.cast_shadows {
                let sp = shadow_params.clone().unwrap_or(ShadowParams { resolution: 1024, blur: 0.0 });
                match &mut record.shadow {
                    Some((_, _comp)) => {}
                    None => {
                        let comp = ShadowMatrixComputation::new(
                            target.position.truncate(),
                            target.position.w,
                            target.spot_direction,
                        );
                        record.shadow = Some((sp, comp));
                    }
                }
                if let Some((_, comp)) = &mut record.shadow {
                    comp.update_shadow_matrix(world_extent);
                }
            } else {
                record.shadow = None;
            }
        }

        log::debug!(
            "lighting reconciled: {} active lights, shadows_enabled={}",
            self.lights.len(),
            self.shadows_enabled()
        );
    }

    #[must_use]
    pub fn params_for(&self, path: &Path) -> Option<&LightParams> {
        self.lights.iter().find(|l| &l.path == path).map(|l| &l.params)
    }

    /// The current per-light shadow matrix for every shadow-casting light,
    /// keyed by light path, for a `shadowTask` to consume (§4.7).
    #[must_use]
    pub fn shadow_matrices(&self) -> FxHashMap<Path, Mat4> {
        self.lights
            .iter()
            .filter_map(|l| {
                let (_, comp) = l.shadow.as_ref()?;
                comp.cached_matrix().map(|m| (l.path.clone(), m))
            })
            .collect()
    }

    /// The shadow resolution currently configured for shadow-casting lights,
    /// if any are active.
    #[must_use]
    pub fn shadow_resolution(&self) -> Option<u32> {
        self.lights.iter().find_map(|l| l.shadow.as_ref().map(|(sp, _)| sp.resolution))
    }

    #[must_use]
    pub fn camera_light_defaults() -> (f32, f32) {
        (CAMERA_LIGHT_DEFAULT_ANGLE_DEGREES, CAMERA_LIGHT_DEFAULT_INTENSITY)
    }

    /// Per-frame light transform for non-dome camera lights under
    /// material-network lighting: `view_inverse * light.transform`, updated
    /// only when it actually changed.
    pub fn material_network_transforms(&self, view_inverse: Mat4) -> FxHashMap<Path, Mat4> {
        let mut out = FxHashMap::default();
        if !self.material_network_lighting {
            return out;
        }
        for record in &self.lights {
            if record.params.kind == LightKind::Dome {
                continue;
            }
            out.insert(record.path.clone(), view_inverse * record.params.transform);
        }
        out
    }
}

#[must_use]
pub fn light_changed(a: &LightParams, b: &LightParams) -> bool {
    a.kind != b.kind
        || vec3_changed(a.color, b.color, DIRTY_EPSILON)
        || (a.intensity - b.intensity).abs() > DIRTY_EPSILON
        || a.transform != b.transform
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox { min: Vec3::splat(-5.0), max: Vec3::splat(5.0) }
    }

    #[test]
    fn light_count_matches_active_lights_after_growth() {
        let mut lm = LightingManager::new(Path::from("/pass"), false);
        let lights = vec![LightParams::default(), LightParams::default(), LightParams::default()];
        lm.set_lighting(&lights, bbox(), None);
        assert_eq!(lm.light_paths().len(), 3);
    }

    #[test]
    fn light_count_shrinks_back_down() {
        let mut lm = LightingManager::new(Path::from("/pass"), false);
        let three = vec![LightParams::default(); 3];
        lm.set_lighting(&three, bbox(), None);
        lm.set_lighting(&[], bbox(), None);
        assert_eq!(lm.light_paths().len(), 0);
        assert!(!lm.use_lighting());
    }

    #[test]
    fn round_trip_through_zero_matches_direct() {
        let mut a = LightingManager::new(Path::from("/pass"), false);
        let two = vec![LightParams::default(); 2];
        a.set_lighting(&two, bbox(), None);
        a.set_lighting(&[], bbox(), None);
        a.set_lighting(&two, bbox(), None);

        let mut b = LightingManager::new(Path::from("/pass"), false);
        b.set_lighting(&two, bbox(), None);

        assert_eq!(a.light_paths().len(), b.light_paths().len());
    }

    #[test]
    fn shadows_enabled_reflects_any_casting_light() {
        let mut lm = LightingManager::new(Path::from("/pass"), false);
        let mut l = LightParams::default();
        l.cast_shadows = true;
        lm.set_lighting(&[l], bbox(), None);
        assert!(lm.shadows_enabled());
    }
}
