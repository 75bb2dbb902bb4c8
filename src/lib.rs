//! A headless engine for scroll-linked parallax transforms.
//!
//! Elements register with a [`ScrollCoordinator`]. On each throttled scroll tick the
//! coordinator builds one immutable [`ScrollFrame`] and hands it to every registered
//! [`ElementController`], which turns the frame and its element's live geometry into a
//! [`Progress`] in `[-1, 1]` and linearly interpolates its configured [`TransformPoint`]s.
//! Independently, each element toggles an in-view class from host intersection reports.
//!
//! It is UI-agnostic. A DOM/TUI/GUI layer is expected to provide (see [`ports`]):
//! - scroll offsets and viewport size ([`ViewportGeometrySource`])
//! - scroll notifications and a timestamp per notification ([`ScrollSource`])
//! - per-element bounding geometry ([`ElementGeometry`])
//! - intersection detection ([`VisibilityObserver`])
//!
//! and to apply each element's [`RenderState`] (transform string + class).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod coordinator;
mod element;
mod error;
mod options;
pub mod ports;
mod progress;
mod throttle;
mod transform;
mod types;
mod visibility;


pub use controller::{ControllerState, ElementController};
pub use coordinator::{DispatchReport, ScrollCoordinator, ScrollTarget, SharedScrollTarget};
pub use element::ParallaxElement;
pub use error::{ParallaxError, Result};
pub use options::{
    CoordinatorOptions, DEFAULT_THROTTLE_MS, DispatchPolicy, ElementOptions, InViewOptions,
    InViewOverrides, Length, MIN_OUTER_HEIGHT, NARROW_VIEWPORT_WIDTH, OnRenderCallback,
    ParallaxOptions, ViewMargin,
};
pub use ports::{
    ElementGeometry, IntersectionEntry, NoIntersectionObserver, ObservationHandle, ScrollSource,
    ScrollSubscription, ViewportGeometrySource, VisibilityObserver,
};
pub use progress::compute_progress;
pub use throttle::Throttle;
pub use transform::{interpolate, render_transform};
pub use types::{Axis, ControllerId, EndPercent, Progress, RenderState, ScrollFrame, TransformPoint};
pub use visibility::{Visibility, VisibilityTracker, VisibilityTransition};
