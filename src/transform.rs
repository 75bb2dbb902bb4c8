use alloc::string::String;
use core::fmt::Write as _;

use crate::{Progress, TransformPoint};

/// Linearly interpolates every axis of `end` between `start` and `end` at `progress`.
///
/// Uses `start * (1 - p) + end * p`, so `p = 0` yields `start` and `p = 1` yields `end` bit
/// for bit. Axes only present in `start` are carried unchanged after the animated ones.
/// Missing start values count as `0`.
pub fn interpolate(
    start: &TransformPoint,
    end: &TransformPoint,
    progress: Progress,
) -> TransformPoint {
    let p = progress.get();
    let mut out: TransformPoint = end
        .iter()
        .map(|(axis, to)| {
            let from = start.get(axis).unwrap_or(0.0);
            (axis, from * (1.0 - p) + to * p)
        })
        .collect();
    for (axis, value) in start.iter() {
        if !end.contains(axis) {
            out.set(axis, value);
        }
    }
    out
}

/// Renders a point as a CSS transform list, e.g. `translateY(50px) rotateZ(12deg) scale(1.5)`.
///
/// An empty point renders as the empty string.
pub fn render_transform(point: &TransformPoint) -> String {
    let mut out = String::new();
    for (axis, value) in point.iter() {
        if !out.is_empty() {
            out.push(' ');
        }
        // -0 renders as "0".
        let value = if value == 0.0 { 0.0 } else { value };
        // Writing into a String cannot fail.
        let _ = write!(out, "{}({}{})", axis.function(), value, axis.unit());
    }
    out
}
