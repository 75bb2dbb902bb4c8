use crate::{ElementGeometry, EndPercent, ParallaxError, Progress, ScrollFrame};

/// Computes how far an element has travelled through the viewport.
///
/// The result is `-1` while the element is still below the viewport, around `0` when it is
/// centered, and `1` once it has left above. `end_percent` compresses that travel.
///
/// Infinite intermediates (e.g. a zero-height element in a zero-height viewport scrolled
/// past) clamp to `±1`; only NaN is reported as an error.
pub fn compute_progress(
    frame: &ScrollFrame,
    geometry: &(impl ElementGeometry + ?Sized),
    end_percent: EndPercent,
) -> Result<Progress, ParallaxError> {
    let element_top = frame.wrapper_pos_y + geometry.bounding_top();
    let element_height = geometry.rendered_height();
    let travel = (element_height + frame.screen_y) / end_percent.divisor();
    let raw = (frame.wrapper_pos_y - element_top + frame.screen_y) / travel;
    ptrace!(element_top, element_height, raw, "compute_progress");

    Progress::new(raw).ok_or(ParallaxError::NonFiniteProgress {
        element_top,
        element_height,
    })
}
