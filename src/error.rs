use alloc::boxed::Box;
use alloc::string::String;

use crate::ControllerId;

/// Errors surfaced by the parallax engine.
///
/// Most of these never escape to integrators: unknown registry ids are absorbed by
/// `deregister`, a missing intersection capability degrades the element, and per-controller
/// faults are isolated under [`crate::DispatchPolicy::Isolate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParallaxError {
    /// A required host capability (e.g. intersection detection) is absent.
    #[error("host capability missing: {capability}")]
    CapabilityMissing { capability: &'static str },

    #[error("unknown registry id: {0}")]
    UnknownRegistryId(ControllerId),

    #[error("unknown transform axis: {0:?}")]
    UnknownAxis(String),

    #[error("invalid endPercent {0} (expected 1, 2 or 4)")]
    InvalidEndPercent(u32),

    #[error("invalid view margin: {0:?}")]
    InvalidViewMargin(String),

    /// Element geometry produced a progress value that is not a number.
    #[error("progress is not a number (element_top={element_top}, element_height={element_height})")]
    NonFiniteProgress {
        element_top: f64,
        element_height: f64,
    },

    /// The controller was already borrowed when the coordinator tried to dispatch to it.
    #[error("controller {0} is busy")]
    ControllerBusy(ControllerId),

    /// A fault in one controller stopped the whole dispatch batch.
    #[error("dispatch aborted at controller {id}: {source}")]
    DispatchAborted {
        id: ControllerId,
        #[source]
        source: Box<ParallaxError>,
    },
}

impl ParallaxError {
    pub(crate) fn intersection_observer_missing() -> Self {
        Self::CapabilityMissing {
            capability: "IntersectionObserver",
        }
    }
}

pub type Result<T> = core::result::Result<T, ParallaxError>;
