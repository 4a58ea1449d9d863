//! PageableBufferManager — tiered residency for buffers too large to keep
//! fully resident (§4.6). Unlike the rest of the orchestration core, this
//! manager runs a background task arena and is safe to call from multiple
//! threads concurrently.

pub mod buffer;
pub mod strategies;

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{Result, ViewportError};
use buffer::{PageableBuffer, PageableBufferId, Residency};
pub use strategies::{PagingStrategy, SelectionStrategy};

const DEFAULT_LOW_PRESSURE_THRESHOLD: f32 = 0.7;
const DEFAULT_MIN_CHECK_COUNT: usize = 16;
const DEFAULT_AGE_LIMIT_FRAMES: u64 = 60;

#[derive(Clone, Debug)]
pub struct PageableBufferManagerConfig {
    /// 0 lets the runtime pick a worker count.
    pub num_threads: usize,
    pub low_pressure_threshold: f32,
    pub min_check_count: usize,
    pub age_limit_frames: u64,
    pub paging_strategy: PagingStrategy,
    pub selection_strategy: SelectionStrategy,
    pub disk_dir: PathBuf,
}

impl Default for PageableBufferManagerConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            low_pressure_threshold: DEFAULT_LOW_PRESSURE_THRESHOLD,
            min_check_count: DEFAULT_MIN_CHECK_COUNT,
            age_limit_frames: DEFAULT_AGE_LIMIT_FRAMES,
            paging_strategy: PagingStrategy::Hybrid,
            selection_strategy: SelectionStrategy::Lru,
            disk_dir: std::env::temp_dir().join("hvt_temp_pages"),
        }
    }
}

struct Inner {
    buffers: FxHashMap<PageableBufferId, PageableBuffer>,
    next_id: u64,
    frame: u64,
}

/// Tri-tier (scene/renderer/disk) buffer residency manager.
///
/// The buffer map is `parking_lot::RwLock`-guarded so paging callbacks
/// spawned on the task arena can promote/demote entries while the render
/// thread enumerates resident buffers for the current frame.
pub struct PageableBufferManager {
    config: PageableBufferManagerConfig,
    inner: Arc<RwLock<Inner>>,
    runtime: tokio::runtime::Handle,
}

impl PageableBufferManager {
    /// Builds a manager on top of an existing Tokio runtime handle. A
    /// dedicated multi-thread runtime is appropriate when embedding outside
    /// an already-async host; `numThreads == 0` lets Tokio pick.
    #[must_use]
    pub fn new(config: PageableBufferManagerConfig, runtime: tokio::runtime::Handle) -> Self {
        Self {
            config,
            inner: Arc::new(RwLock::new(Inner {
                buffers: FxHashMap::default(),
                next_id: 0,
                frame: 0,
            })),
            runtime,
        }
    }

    pub fn advance_frame(&self) {
        self.inner.write().frame += 1;
    }

    #[must_use]
    pub fn current_frame(&self) -> u64 {
        self.inner.read().frame
    }

    /// Registers a new buffer resident in the scene tier.
    pub fn register(&self, size_bytes: u64) -> PageableBufferId {
        let mut inner = self.inner.write();
        let id = PageableBufferId(inner.next_id);
        inner.next_id += 1;
        let frame = inner.frame;
        inner.buffers.insert(
            id,
            PageableBuffer {
                id,
                size_bytes,
                residency: Residency::Scene,
                last_touched_frame: frame,
            },
        );
        id
    }

    pub fn touch(&self, id: PageableBufferId) {
        let mut inner = self.inner.write();
        let frame = inner.frame;
        if let Some(buf) = inner.buffers.get_mut(&id) {
            buf.last_touched_frame = frame;
        }
    }

    #[must_use]
    pub fn residency(&self, id: PageableBufferId) -> Option<Residency> {
        self.inner.read().buffers.get(&id).map(|b| b.residency)
    }

    #[must_use]
    pub fn resident_bytes(&self, tier: Residency) -> u64 {
        self.inner
            .read()
            .buffers
            .values()
            .filter(|b| b.residency == tier)
            .map(|b| b.size_bytes)
            .sum()
    }

    /// §4.6 "FreeCrawl": synchronous eviction pass run when memory pressure
    /// crosses the configured threshold.
    ///
    /// 1. Skip if fewer than `min_check_count` buffers are tracked.
    /// 2. Skip if current pressure is already under `low_pressure_threshold`.
    /// 3. Select eviction candidates via the configured [`SelectionStrategy`].
    /// 4. For each candidate older than `age_limit_frames`, consult the
    ///    configured [`PagingStrategy`] for a `{should_page, action,
    ///    force_operation}` decision and apply it; younger candidates and
    ///    `none` decisions are left untouched.
    /// 5. Disk-tier buffers older than `age_limit_frames` are dropped outright.
    /// 6. Stop once pressure falls back under the threshold or candidates run out.
    pub fn free_crawl(&self, current_pressure: f32) -> usize {
        let mut inner = self.inner.write();
        if inner.buffers.len() < self.config.min_check_count {
            return 0;
        }
        if current_pressure < self.config.low_pressure_threshold {
            return 0;
        }

        let frame = inner.frame;
        let age_limit = self.config.age_limit_frames;
        let selection_strategy = self.config.selection_strategy;
        let paging_strategy = self.config.paging_strategy;

        let mut candidates: Vec<PageableBufferId> = inner
            .buffers
            .values()
            .filter(|b| b.residency != Residency::Disk)
            .map(|b| b.id)
            .collect();
        strategies::order_candidates(&mut candidates, &inner.buffers, selection_strategy);

        let mut evicted = 0;
        for id in candidates {
            let Some(buf) = inner.buffers.get_mut(&id) else { continue };
            let age = frame.saturating_sub(buf.last_touched_frame);
            let decision = strategies::decide_paging_action(buf.residency, age, age_limit, current_pressure, paging_strategy);
            if !decision.should_page {
                continue;
            }
            match decision.action {
                strategies::PagingAction::SwapSceneToDisk | strategies::PagingAction::SwapRendererToDisk => {
                    buf.residency = Residency::Disk;
                    evicted += 1;
                }
                strategies::PagingAction::ReleaseRendererBuffer => {
                    buf.residency = Residency::Scene;
                    evicted += 1;
                }
                strategies::PagingAction::SwapToSceneMemory | strategies::PagingAction::None => {}
            }
        }

        inner.buffers.retain(|_, b| {
            !(b.residency == Residency::Disk && frame.saturating_sub(b.last_touched_frame) > age_limit)
        });

        evicted
    }

    /// Spawns an async promotion (disk/renderer → scene) on the task arena.
    pub async fn promote(&self, id: PageableBufferId) -> Result<()> {
        let inner = self.inner.clone();
        let handle = self
            .runtime
            .spawn_blocking(move || {
                let mut guard = inner.write();
                if let Some(buf) = guard.buffers.get_mut(&id) {
                    buf.residency = Residency::Scene;
                }
            });
        handle.await.map_err(|e| ViewportError::TaskJoinError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
    }

    #[test]
    fn new_buffer_starts_resident_in_scene_tier() {
        let runtime = rt();
        let mgr = PageableBufferManager::new(PageableBufferManagerConfig::default(), runtime.handle().clone());
        let id = mgr.register(1024);
        assert_eq!(mgr.residency(id), Some(Residency::Scene));
    }

    #[test]
    fn free_crawl_skips_below_min_check_count() {
        let runtime = rt();
        let mgr = PageableBufferManager::new(PageableBufferManagerConfig::default(), runtime.handle().clone());
        mgr.register(1024);
        assert_eq!(mgr.free_crawl(1.0), 0);
    }

    #[test]
    fn free_crawl_demotes_scene_buffers_under_pressure() {
        let runtime = rt();
        let mut cfg = PageableBufferManagerConfig::default();
        cfg.min_check_count = 1;
        cfg.age_limit_frames = 0;
        let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());
        let id = mgr.register(1024);
        let evicted = mgr.free_crawl(0.9);
        assert_eq!(evicted, 1);
        assert_eq!(mgr.residency(id), Some(Residency::Disk));
    }

    #[test]
    fn free_crawl_leaves_buffers_younger_than_age_limit_untouched() {
        let runtime = rt();
        let mut cfg = PageableBufferManagerConfig::default();
        cfg.min_check_count = 1;
        let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());
        let id = mgr.register(1024);
        let evicted = mgr.free_crawl(0.9);
        assert_eq!(evicted, 0);
        assert_eq!(mgr.residency(id), Some(Residency::Scene));
    }

    #[test]
    fn free_crawl_is_noop_under_low_pressure_threshold() {
        let runtime = rt();
        let mut cfg = PageableBufferManagerConfig::default();
        cfg.min_check_count = 1;
        let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());
        mgr.register(1024);
        assert_eq!(mgr.free_crawl(0.1), 0);
    }

    #[test]
    fn promote_moves_buffer_back_to_scene_tier() {
        let runtime = rt();
        let mut cfg = PageableBufferManagerConfig::default();
        cfg.min_check_count = 1;
        cfg.age_limit_frames = 0;
        let mgr = PageableBufferManager::new(cfg, runtime.handle().clone());
        let id = mgr.register(1024);
        mgr.free_crawl(0.9);
        assert_eq!(mgr.residency(id), Some(Residency::Disk));
        runtime.block_on(mgr.promote(id)).unwrap();
        assert_eq!(mgr.residency(id), Some(Residency::Scene));
    }
}
