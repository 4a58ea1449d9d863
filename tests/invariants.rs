//! Cross-module invariants and round-trip laws from the design's "testable
//! properties" section, exercised against the public API without a GPU
//! device.

use glam::{Mat4, Vec3};
use viewport_core::ids::Path;
use viewport_core::lighting::shadow::BoundingBox;
use viewport_core::lighting::{LightKind, LightParams, LightingManager};
use viewport_core::pageable::{PageableBufferManager, PageableBufferManagerConfig};
use viewport_core::pageable::buffer::Residency;
use viewport_core::selection::pick::{aggregate_hits, resolve, PickTarget, RawSample, ResolveMode};
use viewport_core::selection::{SelectedPrim, SelectionHelper};
use viewport_core::sync_delegate::SyncDelegate;
use viewport_core::task_manager::{Anchor, TaskManager, TaskTags};

fn world_extent() -> BoundingBox {
    BoundingBox { min: Vec3::splat(-10.0), max: Vec3::splat(10.0) }
}

fn rt() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

/// "For all `activeLights` assignments L, ... for each i the stored params
/// equals L[i]."
#[test]
fn light_params_match_input_index_by_index() {
    let mut lm = LightingManager::new(Path::from("/pass"), false);
    let lights = vec![
        LightParams { kind: LightKind::Distant, intensity: 2.0, ..LightParams::default() },
        LightParams { kind: LightKind::Dome, intensity: 5.0, ..LightParams::default() },
    ];
    lm.set_lighting(&lights, world_extent(), None);

    let paths = lm.light_paths();
    assert_eq!(paths.len(), lights.len());
    for (path, expected) in paths.iter().zip(lights.iter()) {
        assert_eq!(lm.params_for(path), Some(expected));
    }
}

/// "A light list transition from n -> 0 -> n produces the same final SPrim
/// set as n -> n."
#[test]
fn light_list_round_trip_through_empty_matches_direct_path() {
    let lights = vec![
        LightParams { kind: LightKind::Distant, intensity: 1.0, ..LightParams::default() },
        LightParams { kind: LightKind::Camera, intensity: 3.0, ..LightParams::default() },
    ];

    let mut via_zero = LightingManager::new(Path::from("/pass"), false);
    via_zero.set_lighting(&lights, world_extent(), None);
    via_zero.set_lighting(&[], world_extent(), None);
    via_zero.set_lighting(&lights, world_extent(), None);

    let mut direct = LightingManager::new(Path::from("/pass"), false);
    direct.set_lighting(&lights, world_extent(), None);

    assert_eq!(via_zero.light_paths(), direct.light_paths());
    for (path, expected) in via_zero.light_paths().iter().zip(lights.iter()) {
        assert_eq!(via_zero.params_for(path), Some(expected));
    }
}

/// "AdvanceFrame(k); AdvanceFrame(m) produces the same current frame as
/// AdvanceFrame(k+m)."
#[test]
fn advance_frame_is_additive() {
    let runtime = rt();
    let k = 3;
    let m = 5;

    let stepped = PageableBufferManager::new(PageableBufferManagerConfig::default(), runtime.handle().clone());
    for _ in 0..k {
        stepped.advance_frame();
    }
    for _ in 0..m {
        stepped.advance_frame();
    }

    let combined = PageableBufferManager::new(PageableBufferManagerConfig::default(), runtime.handle().clone());
    for _ in 0..(k + m) {
        combined.advance_frame();
    }

    assert_eq!(stepped.current_frame(), combined.current_frame());
}

/// "ageLimit == 0 causes every buffer older than the current frame to be
/// immediately eligible [for drop once it reaches disk tier]."
#[test]
fn zero_age_limit_drops_disk_buffers_on_the_next_crawl() {
    let runtime = rt();
    let mut cfg = PageableBufferManagerConfig::default();
    cfg.min_check_count = 1;
    cfg.age_limit_frames = 0;
    let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());

    let id = mgr.register(1024);
    mgr.advance_frame();

    // Scene -> Disk, then the same crawl's retain pass drops it since age 1 > limit 0.
    mgr.free_crawl(0.9);
    assert_eq!(mgr.residency(id), None);
}

/// "For every `FreeCrawl(p)` call with scene and renderer pressures below
/// threshold, no buffer's residency changes."
#[test]
fn free_crawl_under_threshold_leaves_residency_untouched() {
    let runtime = rt();
    let mut cfg = PageableBufferManagerConfig::default();
    cfg.min_check_count = 1;
    let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());
    let id = mgr.register(2048);

    assert_eq!(mgr.free_crawl(cfg_threshold_below()), 0);
    assert_eq!(mgr.residency(id), Some(Residency::Scene));
}

fn cfg_threshold_below() -> f32 {
    PageableBufferManagerConfig::default().low_pressure_threshold - 0.1
}

/// "Set/Get on TaskManager: for every SetTaskValue(p,k,v) followed by
/// GetTaskValue(p,k), the returned value equals v."
#[test]
fn task_manager_set_get_value_round_trips_across_types() {
    struct Noop;
    impl viewport_core::graph::RenderNode for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        fn run(&self, _ctx: &viewport_core::graph::ExecuteContext<'_>, _encoder: &mut wgpu::CommandEncoder) {}
    }

    let mut tm = TaskManager::new(Path::from("/pass"));
    tm.add_task("t", 0i32, Box::new(|_: &mut SyncDelegate, _: &Path| {}), Noop, Anchor::End, TaskTags::EXECUTABLE)
        .unwrap();

    tm.set_task_value::<String>("t", "label", "hello".to_string());
    assert_eq!(tm.get_task_value::<String>("t", "label"), Some("hello".to_string()));

    tm.set_task_value::<f32>("t", "weight", 0.25);
    assert_eq!(tm.get_task_value::<f32>("t", "weight"), Some(0.25));
}

/// Selection hit aggregation should not depend on the order samples arrive
/// in: shuffled input produces the same grouped face set per prim.
#[test]
fn pick_aggregation_is_order_independent_within_a_group() {
    let forward = vec![
        sample("/cube", 0, 0.5),
        sample("/cube", 1, 0.4),
        sample("/cube", 2, 0.6),
    ];
    let mut shuffled = forward.clone();
    shuffled.reverse();

    let hits_forward = aggregate_hits(&forward, PickTarget::Faces, &[]);
    let hits_shuffled = aggregate_hits(&shuffled, PickTarget::Faces, &[]);

    assert_eq!(hits_forward.len(), 1);
    assert_eq!(hits_shuffled.len(), 1);
    assert_eq!(hits_forward[0].faces, hits_shuffled[0].faces);
}

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

/// Scenario 5: pick points on a unit cube, target `points`, expect indices
/// `{0..7}` aggregated for the one prim.
#[test]
fn picking_points_on_a_cube_aggregates_all_eight_corner_indices() {
    let samples: Vec<RawSample> = (0u32..8)
        .map(|i| RawSample {
            path: Path::from("/cube"),
            instancer_path: None,
            instance_index: None,
            face_id: None,
            edge_id: None,
            point_id: Some(i),
            depth: 0.5,
            world_space_hit_point: [0.0, 0.0, 0.0],
        })
        .collect();

    let hits = aggregate_hits(&samples, PickTarget::Points, &[]);
    assert_eq!(hits.len(), 1);
    let expected: std::collections::HashSet<u32> = (0..8).collect();
    let got: std::collections::HashSet<u32> = hits[0].points.iter().copied().collect();
    assert_eq!(got, expected);

    let resolved = resolve(hits, ResolveMode::All);
    assert_eq!(resolved.len(), 1);
}

/// Selection helper and the mesh-picking path agree on which prim paths are
/// currently marked as selected.
#[test]
fn selection_helper_tracks_picked_prim_as_selected() {
    let mut sh = SelectionHelper::new();
    sh.set_selection(vec![SelectedPrim { path: Path::from("/cube"), instance_index: None }]);
    assert!(sh.is_selected(&Path::from("/cube")));
    assert!(!sh.is_selected(&Path::from("/sphere")));
}

#[test]
fn material_network_transforms_skip_dome_lights() {
    let mut lm = LightingManager::new(Path::from("/pass"), true);
    let lights = vec![
        LightParams { kind: LightKind::Distant, transform: Mat4::from_translation(Vec3::X), ..LightParams::default() },
        LightParams { kind: LightKind::Dome, transform: Mat4::from_translation(Vec3::Y), ..LightParams::default() },
    ];
    lm.set_lighting(&lights, world_extent(), None);

    let transforms = lm.material_network_transforms(Mat4::IDENTITY);
    assert_eq!(transforms.len(), 1);
}
