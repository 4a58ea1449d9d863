//! Pick: isolated single-frame queries against id buffers (§4.5 "Pick").

use rustc_hash::FxHashSet;

use crate::ids::Path;

/// What granularity a pick query aggregates hits at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickTarget {
    PrimsAndInstances,
    Faces,
    Edges,
    Points,
    PointsAndInstances,
}

/// How the on-screen pick rectangle resolves to a single winning hit (or all
/// hits within it) when more than one pixel is covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveMode {
    Nearest,
    Unique,
    All,
}

#[derive(Clone, Debug)]
pub struct PickParams {
    pub target: PickTarget,
    pub resolve_mode: ResolveMode,
    pub mesh_points_representation: bool,
    pub exclude_paths: Vec<Path>,
}

impl Default for PickParams {
    fn default() -> Self {
        Self {
            target: PickTarget::PrimsAndInstances,
            resolve_mode: ResolveMode::Nearest,
            mesh_points_representation: false,
            exclude_paths: Vec::new(),
        }
    }
}

/// One aggregated hit group (§3.1 "Hit"): a distinct (prim, instancer,
/// instance-index) tuple with every face/edge/point index observed within
/// the pick rectangle for that tuple unioned together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    pub path: Path,
    pub instancer_path: Option<Path>,
    pub instance_index: Option<i32>,
    pub faces: FxHashSet<u32>,
    pub edges: FxHashSet<u32>,
    pub points: FxHashSet<u32>,
    pub normalized_depth: OrderedDepth,
    pub world_space_hit_point: [f32; 3],
}

/// `f32` isn't `Eq`/`Hash`; pick depths are compared for "nearest" ordering
/// only, so hits store the bit pattern and reconstruct the float on read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderedDepth(u32);

impl OrderedDepth {
    #[must_use]
    pub fn from_f32(v: f32) -> Self {
        Self(v.to_bits())
    }

    #[must_use]
    pub fn to_f32(self) -> f32 {
        f32::from_bits(self.0)
    }
}

/// A raw per-pixel sample decoded from the id buffers before aggregation.
#[derive(Clone, Copy, Debug)]
pub struct RawSample {
    pub path: Path,
    pub instancer_path: Option<Path>,
    pub instance_index: Option<i32>,
    pub face_id: Option<u32>,
    pub edge_id: Option<u32>,
    pub point_id: Option<u32>,
    pub depth: f32,
    pub world_space_hit_point: [f32; 3],
}

/// Groups raw per-pixel samples into [`Hit`]s, keyed by `(path, instancer
/// path, instance index)` — every sample sharing that key contributes its
/// face/edge/point id to that hit's unioned index sets (§4.5 step 3).
#[must_use]
pub fn aggregate_hits(samples: &[RawSample], target: PickTarget, exclude: &[Path]) -> Vec<Hit> {
    let mut groups: Vec<Hit> = Vec::new();

    for sample in samples {
        if exclude.iter().any(|p| p == &sample.path) {
            continue;
        }

        let existing = groups.iter_mut().find(|h| {
            h.path == sample.path
                && h.instancer_path == sample.instancer_path
                && h.instance_index == sample.instance_index
        });

        let hit = if let Some(h) = existing {
            h
        } else {
            groups.push(Hit {
                path: sample.path.clone(),
                instancer_path: sample.instancer_path.clone(),
                instance_index: sample.instance_index,
                faces: FxHashSet::default(),
                edges: FxHashSet::default(),
                points: FxHashSet::default(),
                normalized_depth: OrderedDepth::from_f32(sample.depth),
                world_space_hit_point: sample.world_space_hit_point,
            });
            groups.last_mut().unwrap()
        };

        if sample.depth < hit.normalized_depth.to_f32() {
            hit.normalized_depth = OrderedDepth::from_f32(sample.depth);
            hit.world_space_hit_point = sample.world_space_hit_point;
        }

        match target {
            PickTarget::Faces => {
                if let Some(f) = sample.face_id {
                    hit.faces.insert(f);
                }
            }
            PickTarget::Edges => {
                if let Some(e) = sample.edge_id {
                    hit.edges.insert(e);
                }
            }
            PickTarget::Points | PickTarget::PointsAndInstances => {
                if let Some(p) = sample.point_id {
                    hit.points.insert(p);
                }
            }
            PickTarget::PrimsAndInstances => {}
        }
    }

    groups.sort_by(|a, b| a.normalized_depth.cmp(&b.normalized_depth));
    groups
}

/// Applies [`ResolveMode`] to an already-aggregated hit list.
#[must_use]
pub fn resolve(hits: Vec<Hit>, mode: ResolveMode) -> Vec<Hit> {
    match mode {
        ResolveMode::All => hits,
        ResolveMode::Unique => hits.into_iter().take(1).collect(),
        ResolveMode::Nearest => hits.into_iter().take(1).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(path: &str, face: u32, depth: f32) -> RawSample {
        RawSample {
            path: Path::from(path),
            instancer_path: None,
            instance_index: None,
            face_id: Some(face),
            edge_id: None,
            point_id: None,
            depth,
            world_space_hit_point: [0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn samples_on_same_prim_union_into_one_hit_with_all_faces() {
        let samples = vec![sample("/cube", 0, 0.5), sample("/cube", 1, 0.4), sample("/cube", 2, 0.6)];
        let hits = aggregate_hits(&samples, PickTarget::Faces, &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].faces.len(), 3);
    }

    #[test]
    fn distinct_prims_produce_distinct_hits() {
        let samples = vec![sample("/a", 0, 0.5), sample("/b", 0, 0.3)];
        let hits = aggregate_hits(&samples, PickTarget::Faces, &[]);
        assert_eq!(hits.len(), 2);
        // nearest depth first
        assert_eq!(hits[0].path, Path::from("/b"));
    }

    #[test]
    fn excluded_paths_are_dropped() {
        let samples = vec![sample("/a", 0, 0.5)];
        let hits = aggregate_hits(&samples, PickTarget::Faces, &[Path::from("/a")]);
        assert!(hits.is_empty());
    }

    #[test]
    fn nearest_resolve_mode_keeps_only_closest_hit() {
        let samples = vec![sample("/a", 0, 0.5), sample("/b", 0, 0.3)];
        let hits = aggregate_hits(&samples, PickTarget::Faces, &[]);
        let resolved = resolve(hits, ResolveMode::Nearest);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].path, Path::from("/b"));
    }
}
