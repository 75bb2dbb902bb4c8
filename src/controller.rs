use alloc::string::String;

use crate::coordinator::ScrollTarget;
use crate::progress::compute_progress;
use crate::transform::{interpolate, render_transform};
use crate::{
    ControllerId, ElementGeometry, ElementOptions, EndPercent, NARROW_VIEWPORT_WIDTH,
    ObservationHandle, ParallaxError, Progress, RenderState, ScrollFrame, TransformPoint,
    Visibility, VisibilityTracker, VisibilityTransition,
};

/// The mutable, render-facing state of one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerState {
    pub class_name: String,
    pub transform: TransformPoint,
    /// `None` until the first scroll frame arrives.
    pub progress: Option<Progress>,
}

/// Owns one parallax element: its configuration, the interpolated transform, and the in-view
/// class.
///
/// The controller is headless. `G` supplies the element's live geometry and doubles as the
/// observation target handed to a [`crate::VisibilityObserver`]. Lifecycle wiring (registering
/// with a coordinator, starting observation) lives in [`crate::ParallaxElement`].
#[derive(Debug)]
pub struct ElementController<G> {
    geometry: G,
    options: ElementOptions,
    start: TransformPoint,
    end: TransformPoint,
    end_percent: EndPercent,
    visibility: VisibilityTracker,
    state: ControllerState,

    registry_id: Option<ControllerId>,
    observation: Option<ObservationHandle>,
    degradation: Option<ParallaxError>,
}

impl<G: ElementGeometry> ElementController<G> {
    /// Creates a controller.
    ///
    /// On viewports with `viewport_outer_width <= NARROW_VIEWPORT_WIDTH` the configured start
    /// point is ignored. Every axis of the end point that is missing from the start point
    /// starts at `0`.
    pub fn new(geometry: G, options: ElementOptions, viewport_outer_width: f64) -> Self {
        let parallax = options.parallax.as_ref();
        let mut start = match parallax.and_then(|p| p.start.clone()) {
            Some(start) if viewport_outer_width > NARROW_VIEWPORT_WIDTH => start,
            _ => TransformPoint::new(),
        };
        let end = parallax.and_then(|p| p.end.clone()).unwrap_or_default();
        let end_percent = parallax.map(|p| p.end_percent).unwrap_or_default();
        for axis in end.axes() {
            if !start.contains(axis) {
                start.set(axis, 0.0);
            }
        }

        let class_name = if options.in_view.active {
            options.in_view.class_name_not_in_view.clone()
        } else {
            String::new()
        };
        let visibility = VisibilityTracker::new(options.in_view.repeat_in_view);
        let state = ControllerState {
            class_name,
            transform: start.clone(),
            progress: None,
        };

        ptrace!(
            start_axes = start.len(),
            end_axes = end.len(),
            viewport_outer_width,
            "ElementController::new"
        );
        Self {
            geometry,
            options,
            start,
            end,
            end_percent,
            visibility,
            state,
            registry_id: None,
            observation: None,
            degradation: None,
        }
    }

    /// Progress of this element for `frame`, re-reading live geometry.
    pub fn compute_progress(&self, frame: &ScrollFrame) -> Result<Progress, ParallaxError> {
        compute_progress(frame, &self.geometry, self.end_percent)
    }

    /// The transform at `progress`.
    pub fn interpolate(&self, progress: Progress) -> TransformPoint {
        interpolate(&self.start, &self.end, progress)
    }

    /// Recomputes progress and transform for a new frame.
    ///
    /// On error the previous state is kept.
    pub fn on_scroll_frame(&mut self, frame: &ScrollFrame) -> Result<(), ParallaxError> {
        let progress = self.compute_progress(frame)?;
        let transform = self.interpolate(progress);
        self.state.progress = Some(progress);
        if self.state.transform != transform {
            self.state.transform = transform;
            self.notify();
        }
        Ok(())
    }

    /// Feeds one intersection report into the in-view state machine and updates the class.
    ///
    /// The caller is responsible for unobserving when this returns
    /// `Entered { stop_observing: true }`. Reports are ignored while in-view tracking is
    /// inactive or the element has degraded.
    pub fn on_visibility_change(&mut self, is_intersecting: bool) -> VisibilityTransition {
        if !self.options.in_view.active || self.degradation.is_some() {
            return VisibilityTransition::Unchanged;
        }
        let transition = self.visibility.apply(is_intersecting);
        let class_name = match transition {
            VisibilityTransition::Entered { .. } => &self.options.in_view.class_name_in_view,
            VisibilityTransition::Left => &self.options.in_view.class_name_not_in_view,
            VisibilityTransition::Unchanged => return transition,
        };
        if self.state.class_name != *class_name {
            self.state.class_name = class_name.clone();
            self.notify();
        }
        transition
    }
}

impl<G> ElementController<G> {
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn options(&self) -> &ElementOptions {
        &self.options
    }

    /// The start point after narrow-viewport handling and zero-defaulting.
    pub fn start_point(&self) -> &TransformPoint {
        &self.start
    }

    pub fn end_point(&self) -> &TransformPoint {
        &self.end
    }

    /// Whether this element asked for scroll-linked transforms at all.
    pub fn wants_scroll_frames(&self) -> bool {
        self.options.parallax.is_some()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn class_name(&self) -> &str {
        &self.state.class_name
    }

    pub fn transform(&self) -> &TransformPoint {
        &self.state.transform
    }

    pub fn transform_string(&self) -> String {
        render_transform(&self.state.transform)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    /// Transform string plus the element class joined with the in-view class.
    pub fn render_state(&self) -> RenderState {
        let base = self.options.class_name.as_deref().unwrap_or("");
        let in_view = self.state.class_name.as_str();
        let class_name = match (base.is_empty(), in_view.is_empty()) {
            (false, false) => alloc::format!("{base} {in_view}"),
            (false, true) => String::from(base),
            _ => String::from(in_view),
        };
        RenderState {
            transform: self.transform_string(),
            class_name,
        }
    }

    pub fn registry_id(&self) -> Option<ControllerId> {
        self.registry_id
    }

    pub fn observation(&self) -> Option<ObservationHandle> {
        self.observation
    }

    /// The capability error this element degraded on, if any.
    ///
    /// The log line for a degradation only exists with the `tracing` feature; this accessor is
    /// the signal that is always available.
    pub fn degradation(&self) -> Option<&ParallaxError> {
        self.degradation.as_ref()
    }

    pub(crate) fn visibility_latched(&self) -> bool {
        self.visibility.is_latched()
    }

    pub(crate) fn set_registry_id(&mut self, id: ControllerId) {
        self.registry_id = Some(id);
    }

    pub(crate) fn take_registry_id(&mut self) -> Option<ControllerId> {
        self.registry_id.take()
    }

    pub(crate) fn set_observation(&mut self, handle: ObservationHandle) {
        self.observation = Some(handle);
    }

    pub(crate) fn take_observation(&mut self) -> Option<ObservationHandle> {
        self.observation.take()
    }

    /// Records a missing capability. Logged once per element; the class stays at its
    /// not-in-view value from then on.
    pub(crate) fn degrade(&mut self, err: ParallaxError) {
        if self.degradation.is_some() {
            return;
        }
        perror!(
            error = %err,
            "no support for IntersectionObserver; in-view classes disabled for this element (use a polyfill)"
        );
        self.degradation = Some(err);
    }

    fn notify(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(&self.render_state());
        }
    }
}

impl<G: ElementGeometry> ScrollTarget for ElementController<G> {
    fn on_scroll_frame(&mut self, frame: &ScrollFrame) -> Result<(), ParallaxError> {
        ElementController::on_scroll_frame(self, frame)
    }
}
