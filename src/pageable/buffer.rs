//! Pageable buffer handle and residency state (§3.1 "Pageable Buffer").

/// Opaque handle returned by [`super::PageableBufferManager::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageableBufferId(pub(super) u64);

/// Which tier currently holds a buffer's bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Residency {
    /// Fully resident in scene-owned GPU memory.
    Scene,
    /// Resident in renderer-owned (typically host-visible staging) memory.
    Renderer,
    /// Paged out to the configured disk directory.
    Disk,
}

pub struct PageableBuffer {
    pub id: PageableBufferId,
    pub size_bytes: u64,
    pub residency: Residency,
    pub last_touched_frame: u64,
}
