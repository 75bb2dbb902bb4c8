//! Host capabilities consumed by the engine.
//!
//! The engine never talks to a platform directly. A DOM/TUI/GUI adapter implements these
//! traits; tests implement them with plain in-memory fakes.

use crate::{ParallaxError, ViewMargin};

/// Scroll offsets and viewport dimensions of the page region.
pub trait ViewportGeometrySource {
    /// `(x, y)` scroll offsets.
    fn scroll_offsets(&self) -> (f64, f64);

    /// `(width, height)` of the visible viewport.
    fn viewport_size(&self) -> (f64, f64);

    fn outer_viewport_height(&self) -> f64;

    fn outer_viewport_width(&self) -> f64;
}

/// Live geometry of one element. Read on every frame, never cached by the engine.
pub trait ElementGeometry {
    /// Top edge relative to the viewport.
    fn bounding_top(&self) -> f64;

    fn rendered_height(&self) -> f64;
}

/// Token for an active scroll-notification subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollSubscription(pub u64);

/// The host's scroll-notification stream.
///
/// After subscribing, the host forwards each notification to
/// [`crate::ScrollCoordinator::on_scroll_event`].
pub trait ScrollSource {
    fn subscribe(&mut self) -> ScrollSubscription;

    fn unsubscribe(&mut self, subscription: ScrollSubscription);
}

/// Token for one observed target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObservationHandle(pub u64);

/// One intersection transition reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub handle: ObservationHandle,
    pub is_intersecting: bool,
}

/// Adapter over the host's intersection-detection primitive.
///
/// Transitions are delivered back through [`crate::ParallaxElement::on_intersection`].
pub trait VisibilityObserver<T: ?Sized> {
    /// Starts observing `target`. Hosts without intersection detection return
    /// [`ParallaxError::CapabilityMissing`].
    fn observe(
        &mut self,
        target: &T,
        view_margin: &ViewMargin,
    ) -> Result<ObservationHandle, ParallaxError>;

    /// Stops observing. Unknown handles are ignored.
    fn unobserve(&mut self, handle: ObservationHandle);
}

/// A host without intersection detection.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIntersectionObserver;

impl<T: ?Sized> VisibilityObserver<T> for NoIntersectionObserver {
    fn observe(&mut self, _: &T, _: &ViewMargin) -> Result<ObservationHandle, ParallaxError> {
        Err(ParallaxError::intersection_observer_missing())
    }

    fn unobserve(&mut self, _: ObservationHandle) {}
}
