//! Canonical task-creation orders (§4.7). These are the orderings a
//! [`crate::frame_pass::FramePass`] falls back to when the application
//! doesn't supply an explicit task list.

use crate::ids::{tokens, Token};

/// Storm-like rasterizer order: one render task per material variant
/// (opaque default → masked → additive → translucent → volume), each a
/// distinct top-level task rather than a sub-stage of one render task.
#[must_use]
pub fn storm_like_order() -> Vec<Token> {
    vec![
        tokens::SIMPLE_LIGHT_TASK,
        tokens::SHADOW_TASK,
        tokens::SKYDOME_TASK,
        tokens::RENDER_TASK_DEFAULT,
        tokens::RENDER_TASK_MASKED,
        tokens::RENDER_TASK_ADDITIVE,
        tokens::RENDER_TASK_TRANSLUCENT,
        tokens::RENDER_TASK_VOLUME,
        tokens::AOV_INPUT_TASK,
        tokens::OIT_RESOLVE_TASK,
        tokens::SSAO_TASK,
        tokens::SELECTION_TASK,
        tokens::COLORIZE_SELECTION_TASK,
        tokens::DEPTH_BIAS_TASK,
        tokens::COLOR_CORRECTION_TASK,
        tokens::VISUALIZE_AOV_TASK,
        tokens::BOUNDING_BOX_TASK,
        tokens::PRESENT_TASK,
    ]
}

/// Path-tracing order: no rasterization stages, a single progressive render
/// task followed directly by post and presentation.
#[must_use]
pub fn path_tracing_order() -> Vec<Token> {
    vec![
        tokens::RENDER_TASK_DEFAULT,
        tokens::SELECTION_TASK,
        tokens::COLORIZE_SELECTION_TASK,
        tokens::COLOR_CORRECTION_TASK,
        tokens::VISUALIZE_AOV_TASK,
        tokens::PRESENT_TASK,
    ]
}

/// Minimal preset (expansion detail): the smallest task set that still
/// produces a displayable, pickable color buffer. No shadows, no OIT, no
/// post-processing chain.
#[must_use]
pub fn minimal_order() -> Vec<Token> {
    vec![
        tokens::SIMPLE_LIGHT_TASK,
        tokens::RENDER_TASK_DEFAULT,
        tokens::SELECTION_TASK,
        tokens::PRESENT_TASK,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_task_variants_appear_in_material_priority_order() {
        let order = storm_like_order();
        let pos = |t: Token| order.iter().position(|&x| x == t).unwrap();
        assert!(pos(tokens::RENDER_TASK_DEFAULT) < pos(tokens::RENDER_TASK_MASKED));
        assert!(pos(tokens::RENDER_TASK_MASKED) < pos(tokens::RENDER_TASK_ADDITIVE));
        assert!(pos(tokens::RENDER_TASK_ADDITIVE) < pos(tokens::RENDER_TASK_TRANSLUCENT));
        assert!(pos(tokens::RENDER_TASK_TRANSLUCENT) < pos(tokens::RENDER_TASK_VOLUME));
    }

    #[test]
    fn present_task_is_always_last() {
        assert_eq!(storm_like_order().last(), Some(&tokens::PRESENT_TASK));
        assert_eq!(path_tracing_order().last(), Some(&tokens::PRESENT_TASK));
        assert_eq!(minimal_order().last(), Some(&tokens::PRESENT_TASK));
    }

    #[test]
    fn minimal_order_excludes_shadow_and_post_processing() {
        let order = minimal_order();
        assert!(!order.contains(&tokens::SHADOW_TASK));
        assert!(!order.contains(&tokens::SSAO_TASK));
        assert!(!order.contains(&tokens::COLOR_CORRECTION_TASK));
    }
}
