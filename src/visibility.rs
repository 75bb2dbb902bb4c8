/// Whether an element currently intersects the (margin-adjusted) viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    NotInView,
    InView,
}

/// The effect of feeding one intersection report into a [`VisibilityTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityTransition {
    /// `NotInView -> InView`. When `stop_observing` is set the caller must unobserve: this
    /// element never leaves `InView` again.
    Entered { stop_observing: bool },
    /// `InView -> NotInView`.
    Left,
    /// Same state as before, or the tracker already latched.
    Unchanged,
}

/// Two-state in-view machine with optional latching.
///
/// With `repeat = false` the first `Entered` latches the tracker: every later report is
/// ignored, so the element stays `InView`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityTracker {
    state: Visibility,
    repeat: bool,
    latched: bool,
}

impl VisibilityTracker {
    pub fn new(repeat: bool) -> Self {
        Self {
            state: Visibility::NotInView,
            repeat,
            latched: false,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn apply(&mut self, is_intersecting: bool) -> VisibilityTransition {
        if self.latched {
            return VisibilityTransition::Unchanged;
        }
        match (self.state, is_intersecting) {
            (Visibility::NotInView, true) => {
                self.state = Visibility::InView;
                self.latched = !self.repeat;
                VisibilityTransition::Entered {
                    stop_observing: self.latched,
                }
            }
            (Visibility::InView, false) => {
                self.state = Visibility::NotInView;
                VisibilityTransition::Left
            }
            _ => VisibilityTransition::Unchanged,
        }
    }
}
