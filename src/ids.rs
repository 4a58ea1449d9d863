//! Lightweight path and token identifiers.
//!
//! The reference design threads `SdfPath`-like identities through every
//! subsystem (frame pass path, task paths, light paths, BPrim paths). This
//! crate does not carry a full scene-graph path library, so `Path` is a cheap
//! `Arc<str>`-backed newtype: clone is a refcount bump, equality and hashing
//! compare the interned bytes, and child paths are built with [`Path::append`].

use std::fmt;
use std::sync::Arc;

/// An absolute or relative scene-graph-style path, e.g. `/pass/light0`.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Path(Arc<str>);

impl Path {
    #[must_use]
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a child segment, e.g. `pass.append("light0")` → `/pass/light0`.
    #[must_use]
    pub fn append(&self, child: &str) -> Self {
        Self(Arc::from(format!("{}/{}", self.0, child)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

/// A schema/task/AOV token. These are almost always `'static` string literals
/// (`"shadowTask"`, `"color"`, `"primId"`) so a bare `&'static str` suffices —
/// no interning table is needed for a vocabulary this small and this static.
pub type Token = &'static str;

pub mod tokens {
    use super::Token;

    pub const COLOR: Token = "color";
    pub const DEPTH: Token = "depth";
    pub const NEYE: Token = "Neye";
    pub const PRIM_ID: Token = "primId";
    pub const ELEMENT_ID: Token = "elementId";
    pub const INSTANCE_ID: Token = "instanceId";
    pub const EDGE_ID: Token = "edgeId";
    pub const POINT_ID: Token = "pointId";

    pub const SIMPLE_LIGHT_TASK: Token = "simpleLightTask";
    pub const SHADOW_TASK: Token = "shadowTask";
    pub const RENDER_TASK_DEFAULT: Token = "renderTask_default";
    pub const RENDER_TASK_MASKED: Token = "renderTask_masked";
    pub const RENDER_TASK_ADDITIVE: Token = "renderTask_additive";
    pub const RENDER_TASK_TRANSLUCENT: Token = "renderTask_translucent";
    pub const RENDER_TASK_VOLUME: Token = "renderTask_volume";
    pub const AOV_INPUT_TASK: Token = "aovInputTask";
    pub const BOUNDING_BOX_TASK: Token = "boundingBoxTask";
    pub const OIT_RESOLVE_TASK: Token = "oitResolveTask";
    pub const SELECTION_TASK: Token = "selectionTask";
    pub const COLORIZE_SELECTION_TASK: Token = "colorizeSelectionTask";
    pub const COLOR_CORRECTION_TASK: Token = "colorCorrectionTask";
    pub const VISUALIZE_AOV_TASK: Token = "visualizeAovTask";
    pub const PRESENT_TASK: Token = "presentTask";
    pub const PICK_TASK: Token = "pickTask";
    pub const PICK_FROM_RENDER_BUFFER_TASK: Token = "pickFromRenderBufferTask";
    pub const DEPTH_BIAS_TASK: Token = "depthBiasTask";
    pub const SSAO_TASK: Token = "ssaoTask";
    pub const COMPOSE_TASK: Token = "composeTask";
    pub const BLUR_TASK: Token = "blurTask";
    pub const FXAA_TASK: Token = "fxaaTask";
    pub const SKYDOME_TASK: Token = "skydomeTask";

    pub const LINEAR_DEPTH: Token = "linearDepth";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_append_builds_expected_string() {
        let pass = Path::from("/pass");
        let light = pass.append("light0");
        assert_eq!(light.as_str(), "/pass/light0");
    }

    #[test]
    fn path_equality_is_value_based() {
        let a = Path::from("/pass/light0");
        let b = Path::from("/pass").append("light0");
        assert_eq!(a, b);
    }
}
