use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::{
    ControllerId, CoordinatorOptions, DispatchPolicy, ParallaxError, ScrollFrame, ScrollSource,
    ScrollSubscription, Throttle, ViewportGeometrySource,
};

/// Anything that consumes scroll frames from a [`ScrollCoordinator`].
pub trait ScrollTarget {
    fn on_scroll_frame(&mut self, frame: &ScrollFrame) -> Result<(), ParallaxError>;
}

/// A registry entry. Shared between the coordinator and the element that owns it.
pub type SharedScrollTarget = Rc<RefCell<dyn ScrollTarget>>;

/// The outcome of one [`ScrollCoordinator::dispatch_frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// The frame handed to every target; `None` when dispatch was skipped.
    pub frame: Option<ScrollFrame>,
    /// Targets that accepted the frame.
    pub dispatched: usize,
    /// Targets that failed (only under [`DispatchPolicy::Isolate`]).
    pub failures: Vec<(ControllerId, ParallaxError)>,
}

impl DispatchReport {
    fn skipped() -> Self {
        Self::default()
    }

    pub fn is_skipped(&self) -> bool {
        self.frame.is_none()
    }
}

/// Registry and dispatch authority for one mounted page region.
///
/// Owns the set of registered [`ScrollTarget`]s and the single scroll subscription. Each
/// throttled scroll tick builds one immutable [`ScrollFrame`] and hands the same snapshot to
/// every target in registration order.
///
/// Elements reach the coordinator by being handed `&mut ScrollCoordinator` at mount time; there
/// is no ambient lookup. Dispatch needs `&mut self`, so the registry cannot change while a
/// frame is being fanned out.
pub struct ScrollCoordinator<V> {
    viewport: V,
    options: CoordinatorOptions,
    registry: BTreeMap<ControllerId, SharedScrollTarget>,
    next_id: u64,
    subscription: Option<ScrollSubscription>,
    throttle: Throttle,
    last_frame: Option<ScrollFrame>,
}

impl<V: ViewportGeometrySource> ScrollCoordinator<V> {
    pub fn new(viewport: V) -> Self {
        Self::with_options(viewport, CoordinatorOptions::default())
    }

    pub fn with_options(viewport: V, options: CoordinatorOptions) -> Self {
        pdebug!(
            throttle_ms = options.throttle_ms,
            min_outer_height = options.min_outer_height,
            "ScrollCoordinator::new"
        );
        Self {
            viewport,
            throttle: Throttle::new(options.throttle_ms),
            options,
            registry: BTreeMap::new(),
            next_id: 0,
            subscription: None,
            last_frame: None,
        }
    }

    /// Subscribes to the host's scroll notifications. Calling it again is a no-op.
    pub fn start(&mut self, source: &mut (impl ScrollSource + ?Sized)) {
        if self.subscription.is_some() {
            return;
        }
        let subscription = source.subscribe();
        pdebug!(subscription = subscription.0, "ScrollCoordinator::start");
        self.subscription = Some(subscription);
    }

    /// Unsubscribes and drops any pending trailing dispatch. Calling it again is a no-op.
    pub fn stop(&mut self, source: &mut (impl ScrollSource + ?Sized)) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        source.unsubscribe(subscription);
        self.throttle.cancel();
        pdebug!(subscription = subscription.0, "ScrollCoordinator::stop");
    }

    pub fn is_started(&self) -> bool {
        self.subscription.is_some()
    }

    /// Feeds one host scroll notification through the throttle.
    ///
    /// Returns the dispatch report when this notification fired a frame, `None` when it was
    /// coalesced (or the coordinator is not started).
    pub fn on_scroll_event(
        &mut self,
        now_ms: u64,
    ) -> Result<Option<DispatchReport>, ParallaxError> {
        if !self.is_started() {
            ptrace!(now_ms, "on_scroll_event: not started, ignoring");
            return Ok(None);
        }
        if !self.throttle.on_event(now_ms) {
            ptrace!(now_ms, "on_scroll_event: throttled");
            return Ok(None);
        }
        self.dispatch_frame().map(Some)
    }

    /// Fires the coalesced trailing dispatch once the throttle interval has elapsed.
    ///
    /// Call this from the adapter's timer or frame tick.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<DispatchReport>, ParallaxError> {
        if !self.is_started() || !self.throttle.poll(now_ms) {
            return Ok(None);
        }
        ptrace!(now_ms, "tick: trailing dispatch");
        self.dispatch_frame().map(Some)
    }

    /// Registers `target` and immediately dispatches one frame so it does not wait for the
    /// next scroll.
    pub fn register(&mut self, target: SharedScrollTarget) -> ControllerId {
        self.register_with(target, |_| {})
    }

    /// Like [`Self::register`], but hands the new id to `on_id` before the initial dispatch
    /// fires, so the target can remember it for deregistration.
    pub fn register_with(
        &mut self,
        target: SharedScrollTarget,
        on_id: impl FnOnce(ControllerId),
    ) -> ControllerId {
        let id = ControllerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.registry.insert(id, target);
        pdebug!(%id, registered = self.registry.len(), "register");

        on_id(id);

        if let Err(_err) = self.dispatch_frame() {
            pwarn!(%id, error = %_err, "register: initial dispatch aborted");
        }
        id
    }

    /// Removes `id` from the registry. Unknown or already-removed ids are ignored.
    ///
    /// Returns whether an entry was removed.
    pub fn deregister(&mut self, id: ControllerId) -> bool {
        if self.registry.remove(&id).is_none() {
            ptrace!(%id, "deregister: unknown id");
            return false;
        }
        pdebug!(%id, registered = self.registry.len(), "deregister");
        true
    }

    /// Builds one frame from the viewport and fans it out to every registered target.
    ///
    /// Skips entirely while the outer viewport height is below
    /// [`CoordinatorOptions::min_outer_height`]. Per-target failures are handled according to
    /// [`CoordinatorOptions::dispatch_policy`].
    pub fn dispatch_frame(&mut self) -> Result<DispatchReport, ParallaxError> {
        let outer_height = self.viewport.outer_viewport_height();
        if outer_height < self.options.min_outer_height {
            ptrace!(outer_height, "dispatch_frame: viewport too short, skipping");
            return Ok(DispatchReport::skipped());
        }

        let frame = self.build_frame();
        self.last_frame = Some(frame);
        ptrace!(
            wrapper_pos_y = frame.wrapper_pos_y,
            screen_y = frame.screen_y,
            targets = self.registry.len(),
            "dispatch_frame"
        );

        let mut report = DispatchReport {
            frame: Some(frame),
            dispatched: 0,
            failures: Vec::new(),
        };
        for (&id, target) in &self.registry {
            let result = match target.try_borrow_mut() {
                Ok(mut target) => target.on_scroll_frame(&frame),
                Err(_) => Err(ParallaxError::ControllerBusy(id)),
            };
            let Err(err) = result else {
                report.dispatched += 1;
                continue;
            };
            match self.options.dispatch_policy {
                DispatchPolicy::Isolate => {
                    pwarn!(%id, error = %err, "dispatch_frame: target failed, skipping");
                    report.failures.push((id, err));
                }
                DispatchPolicy::Abort => {
                    return Err(ParallaxError::DispatchAborted {
                        id,
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(report)
    }

    fn build_frame(&self) -> ScrollFrame {
        let (scroll_x, scroll_y) = self.viewport.scroll_offsets();
        let (width, height) = self.viewport.viewport_size();
        ScrollFrame {
            wrapper_pos_y: scroll_y,
            wrapper_pos_x: scroll_x,
            screen_y: height,
            screen_x: width,
        }
    }
}

impl<V> ScrollCoordinator<V> {
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: ControllerId) -> bool {
        self.registry.contains_key(&id)
    }

    /// Looks up a registered target.
    pub fn get(&self, id: ControllerId) -> Result<&SharedScrollTarget, ParallaxError> {
        self.registry
            .get(&id)
            .ok_or(ParallaxError::UnknownRegistryId(id))
    }

    /// Registered ids in dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.registry.keys().copied()
    }

    /// The most recently dispatched frame.
    pub fn last_frame(&self) -> Option<ScrollFrame> {
        self.last_frame
    }
}

impl<V: fmt::Debug> fmt::Debug for ScrollCoordinator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("registered", &self.registry.len())
            .field("next_id", &self.next_id)
            .field("subscription", &self.subscription)
            .field("throttle", &self.throttle)
            .field("last_frame", &self.last_frame)
            .finish_non_exhaustive()
    }
}
