//! Paging and eviction-candidate-selection strategies (§4.6).

use rustc_hash::FxHashMap;

use super::buffer::{PageableBuffer, PageableBufferId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagingStrategy {
    /// Mix of age and pressure, the default.
    Hybrid,
    PressureBased,
    Conservative,
    AgeBased,
}

/// Pressure at or above this is "critical": strategies that look at pressure
/// favor dropping a renderer-tier buffer outright over paying for a disk
/// write, and mark the decision as one that shouldn't wait its turn.
const CRITICAL_PRESSURE: f32 = 0.9;

/// `conservative` only acts once a buffer is this many times staler than
/// `ageLimit`, trading slower reclaim for fewer tier transitions.
const CONSERVATIVE_AGE_MULTIPLIER: u64 = 2;

/// One of the five dispositions a paging strategy can hand back for a
/// candidate buffer (§4.6 step 6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagingAction {
    SwapSceneToDisk,
    SwapRendererToDisk,
    SwapToSceneMemory,
    ReleaseRendererBuffer,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingDecision {
    pub should_page: bool,
    pub action: PagingAction,
    pub force_operation: bool,
}

impl PagingDecision {
    const NONE: Self = Self { should_page: false, action: PagingAction::None, force_operation: false };
}

/// §4.6 step 6: decides what (if anything) to do with a candidate already
/// past the buffer-selection cut, given its age, the strategy in effect and
/// the pressure that triggered the crawl. `disk`-resident candidates are
/// never passed in here — there's nowhere further down to page them.
#[must_use]
pub fn decide_paging_action(
    residency: super::buffer::Residency,
    age_frames: u64,
    age_limit_frames: u64,
    pressure: f32,
    strategy: PagingStrategy,
) -> PagingDecision {
    use super::buffer::Residency;

    let min_age = match strategy {
        PagingStrategy::Conservative => age_limit_frames.saturating_mul(CONSERVATIVE_AGE_MULTIPLIER),
        PagingStrategy::Hybrid | PagingStrategy::PressureBased | PagingStrategy::AgeBased => age_limit_frames,
    };
    if age_frames < min_age {
        return PagingDecision::NONE;
    }

    let critical = pressure >= CRITICAL_PRESSURE;
    let releases_outright = critical && matches!(strategy, PagingStrategy::PressureBased | PagingStrategy::Hybrid);

    let action = match residency {
        Residency::Scene => PagingAction::SwapSceneToDisk,
        Residency::Renderer if releases_outright => PagingAction::ReleaseRendererBuffer,
        Residency::Renderer => PagingAction::SwapRendererToDisk,
        Residency::Disk => PagingAction::None,
    };

    PagingDecision { should_page: action != PagingAction::None, action, force_operation: releases_outright }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStrategy {
    Lru,
    Fifo,
    OldestFirst,
    LargestFirst,
}

/// Orders `candidates` so the front of the list is evicted first.
pub fn order_candidates(
    candidates: &mut [PageableBufferId],
    buffers: &FxHashMap<PageableBufferId, PageableBuffer>,
    strategy: SelectionStrategy,
) {
    match strategy {
        SelectionStrategy::Lru | SelectionStrategy::OldestFirst => {
            candidates.sort_by_key(|id| buffers.get(id).map_or(u64::MAX, |b| b.last_touched_frame));
        }
        SelectionStrategy::Fifo => {
            candidates.sort_by_key(|id| id.0);
        }
        SelectionStrategy::LargestFirst => {
            candidates.sort_by_key(|id| std::cmp::Reverse(buffers.get(id).map_or(0, |b| b.size_bytes)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pageable::buffer::Residency;

    #[test]
    fn lru_orders_by_ascending_last_touched_frame() {
        let mut buffers = FxHashMap::default();
        let a = PageableBufferId(0);
        let b = PageableBufferId(1);
        buffers.insert(a, PageableBuffer { id: a, size_bytes: 1, residency: Residency::Scene, last_touched_frame: 10 });
        buffers.insert(b, PageableBuffer { id: b, size_bytes: 1, residency: Residency::Scene, last_touched_frame: 2 });
        let mut candidates = vec![a, b];
        order_candidates(&mut candidates, &buffers, SelectionStrategy::Lru);
        assert_eq!(candidates, vec![b, a]);
    }

    #[test]
    fn largest_first_orders_by_descending_size() {
        let mut buffers = FxHashMap::default();
        let a = PageableBufferId(0);
        let b = PageableBufferId(1);
        buffers.insert(a, PageableBuffer { id: a, size_bytes: 10, residency: Residency::Scene, last_touched_frame: 0 });
        buffers.insert(b, PageableBuffer { id: b, size_bytes: 100, residency: Residency::Scene, last_touched_frame: 0 });
        let mut candidates = vec![a, b];
        order_candidates(&mut candidates, &buffers, SelectionStrategy::LargestFirst);
        assert_eq!(candidates, vec![b, a]);
    }

    #[test]
    fn age_based_ignores_buffers_younger_than_the_limit() {
        let decision = decide_paging_action(Residency::Scene, 5, 60, 0.95, PagingStrategy::AgeBased);
        assert!(!decision.should_page);
        assert_eq!(decision.action, PagingAction::None);
    }

    #[test]
    fn age_based_demotes_scene_to_disk_once_past_the_limit() {
        let decision = decide_paging_action(Residency::Scene, 61, 60, 0.1, PagingStrategy::AgeBased);
        assert!(decision.should_page);
        assert_eq!(decision.action, PagingAction::SwapSceneToDisk);
        assert!(!decision.force_operation);
    }

    #[test]
    fn conservative_requires_twice_the_age_limit() {
        let just_past = decide_paging_action(Residency::Renderer, 61, 60, 0.95, PagingStrategy::Conservative);
        assert!(!just_past.should_page);
        let well_past = decide_paging_action(Residency::Renderer, 121, 60, 0.95, PagingStrategy::Conservative);
        assert_eq!(well_past.action, PagingAction::SwapRendererToDisk);
    }

    #[test]
    fn hybrid_releases_renderer_buffer_outright_under_critical_pressure() {
        let decision = decide_paging_action(Residency::Renderer, 60, 60, 0.95, PagingStrategy::Hybrid);
        assert_eq!(decision.action, PagingAction::ReleaseRendererBuffer);
        assert!(decision.force_operation);
    }

    #[test]
    fn pressure_based_keeps_swapping_to_disk_below_the_critical_threshold() {
        let decision = decide_paging_action(Residency::Renderer, 60, 60, 0.75, PagingStrategy::PressureBased);
        assert_eq!(decision.action, PagingAction::SwapRendererToDisk);
        assert!(!decision.force_operation);
    }

    #[test]
    fn disk_residency_never_produces_an_action() {
        let decision = decide_paging_action(Residency::Disk, 1000, 60, 1.0, PagingStrategy::Hybrid);
        assert_eq!(decision.action, PagingAction::None);
        assert!(!decision.should_page);
    }
}
