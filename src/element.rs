use alloc::rc::Rc;
use core::cell::RefCell;

use crate::{
    ElementController, ElementGeometry, ElementOptions, IntersectionEntry, RenderState,
    ScrollCoordinator, SharedScrollTarget, ViewportGeometrySource, VisibilityObserver,
    VisibilityTransition,
};

/// A mounted parallax element: the lifecycle handle around a shared [`ElementController`].
///
/// - `mount` registers with the coordinator (when parallax is configured) and starts
///   visibility observation (when in-view tracking is active).
/// - `on_intersection` forwards host intersection reports.
/// - `unmount` stops observation, then deregisters. Both steps are idempotent, so a retried
///   unmount is safe.
#[derive(Debug)]
pub struct ParallaxElement<G> {
    controller: Rc<RefCell<ElementController<G>>>,
}

impl<G> Clone for ParallaxElement<G> {
    fn clone(&self) -> Self {
        Self {
            controller: Rc::clone(&self.controller),
        }
    }
}

impl<G: ElementGeometry + 'static> ParallaxElement<G> {
    pub fn new(geometry: G, options: ElementOptions, viewport_outer_width: f64) -> Self {
        Self::from_controller(ElementController::new(
            geometry,
            options,
            viewport_outer_width,
        ))
    }

    pub fn from_controller(controller: ElementController<G>) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
        }
    }

    pub fn controller(&self) -> &Rc<RefCell<ElementController<G>>> {
        &self.controller
    }

    pub fn render_state(&self) -> RenderState {
        self.controller.borrow().render_state()
    }

    /// Wires the element into `coordinator` and `observer`.
    ///
    /// A host without intersection detection degrades the element to a permanent
    /// not-in-view class instead of failing. Mounting twice is a no-op.
    pub fn mount<V, O>(&self, coordinator: &mut ScrollCoordinator<V>, observer: &mut O)
    where
        V: ViewportGeometrySource,
        O: VisibilityObserver<G> + ?Sized,
    {
        let needs_registration = {
            let c = self.controller.borrow();
            c.wants_scroll_frames() && c.registry_id().is_none()
        };
        if needs_registration {
            let target: SharedScrollTarget = self.controller.clone();
            let controller = Rc::clone(&self.controller);
            coordinator.register_with(target, move |id| {
                controller.borrow_mut().set_registry_id(id);
            });
        }

        let mut c = self.controller.borrow_mut();
        let in_view = &c.options().in_view;
        if !in_view.active
            || c.observation().is_some()
            || c.degradation().is_some()
            || c.visibility_latched()
        {
            return;
        }
        match observer.observe(c.geometry(), &in_view.view_margin) {
            Ok(handle) => c.set_observation(handle),
            Err(err) => c.degrade(err),
        }
    }

    /// Delivers one intersection report.
    ///
    /// Reports for a handle other than this element's current observation are ignored.
    pub fn on_intersection<O>(
        &self,
        entry: IntersectionEntry,
        observer: &mut O,
    ) -> VisibilityTransition
    where
        O: VisibilityObserver<G> + ?Sized,
    {
        let mut c = self.controller.borrow_mut();
        if c.observation() != Some(entry.handle) {
            return VisibilityTransition::Unchanged;
        }
        let transition = c.on_visibility_change(entry.is_intersecting);
        if let VisibilityTransition::Entered {
            stop_observing: true,
        } = transition
        {
            if let Some(handle) = c.take_observation() {
                pdebug!(handle = handle.0, "in-view latched, unobserving");
                observer.unobserve(handle);
            }
        }
        transition
    }

    /// Stops observation, then deregisters from `coordinator`.
    pub fn unmount<V, O>(&self, coordinator: &mut ScrollCoordinator<V>, observer: &mut O)
    where
        V: ViewportGeometrySource,
        O: VisibilityObserver<G> + ?Sized,
    {
        let handle = self.controller.borrow_mut().take_observation();
        if let Some(handle) = handle {
            observer.unobserve(handle);
        }

        let id = self.controller.borrow_mut().take_registry_id();
        if let Some(id) = id {
            coordinator.deregister(id);
        }
    }
}
