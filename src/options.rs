use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;
use core::str::FromStr;

use crate::{EndPercent, ParallaxError, RenderState, TransformPoint};

/// Viewports no wider than this (in outer width) ignore the configured start point.
pub const NARROW_VIEWPORT_WIDTH: f64 = 780.0;

/// Viewports shorter than this (in outer height) receive no scroll frames.
pub const MIN_OUTER_HEIGHT: f64 = 780.0;

/// Default scroll throttle interval.
pub const DEFAULT_THROTTLE_MS: u64 = 10;

/// A callback fired whenever an element's render state changes.
pub type OnRenderCallback = Arc<dyn Fn(&RenderState) + Send + Sync>;

/// One component of a [`ViewMargin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolves against the viewport extent along the same axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(v) => extent * v / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        if let Some(n) = token.strip_suffix("px") {
            return n.parse::<f64>().ok().filter(|v| v.is_finite()).map(Self::Px);
        }
        if let Some(n) = token.strip_suffix('%') {
            return n
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Percent);
        }
        // Only a bare zero may omit its unit.
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(Self::Px(0.0)),
            _ => None,
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersection tests.
///
/// Accepts CSS margin shorthand with one to four `px` or `%` components, e.g. `"0px"`,
/// `"-50px 0px"`, `"10% 0px 20% 0px"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ViewMargin {
    source: String,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl ViewMargin {
    pub fn zero() -> Self {
        Self {
            source: String::from("0px"),
            top: Length::Px(0.0),
            right: Length::Px(0.0),
            bottom: Length::Px(0.0),
            left: Length::Px(0.0),
        }
    }

    /// The string this margin was parsed from, suitable for a host `rootMargin`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `(top, right, bottom, left)` in pixels for a viewport of the given size.
    pub fn resolve(&self, viewport_width: f64, viewport_height: f64) -> (f64, f64, f64, f64) {
        (
            self.top.resolve(viewport_height),
            self.right.resolve(viewport_width),
            self.bottom.resolve(viewport_height),
            self.left.resolve(viewport_width),
        )
    }

    /// Vertical intersection test for an element at `bounding_top` (viewport coordinates) with
    /// `height`, against a viewport grown by this margin.
    ///
    /// Hosts without a native intersection primitive can use this to synthesize entries.
    pub fn intersects(
        &self,
        viewport_width: f64,
        viewport_height: f64,
        bounding_top: f64,
        height: f64,
    ) -> bool {
        let (top, _, bottom, _) = self.resolve(viewport_width, viewport_height);
        let root_top = -top;
        let root_bottom = viewport_height + bottom;
        bounding_top < root_bottom && bounding_top + height > root_top
    }
}

impl Default for ViewMargin {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for ViewMargin {
    type Err = ParallaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParallaxError::InvalidViewMargin(s.to_string());
        let mut parts = [Length::Px(0.0); 4];
        let mut n = 0usize;
        for token in s.split_whitespace() {
            if n == parts.len() {
                return Err(invalid());
            }
            parts[n] = Length::parse(token).ok_or_else(invalid)?;
            n += 1;
        }
        let [top, right, bottom, left] = match n {
            1 => [parts[0]; 4],
            2 => [parts[0], parts[1], parts[0], parts[1]],
            3 => [parts[0], parts[1], parts[2], parts[1]],
            4 => parts,
            _ => return Err(invalid()),
        };
        Ok(Self {
            source: s.trim().to_string(),
            top,
            right,
            bottom,
            left,
        })
    }
}

impl TryFrom<String> for ViewMargin {
    type Error = ParallaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewMargin> for String {
    fn from(value: ViewMargin) -> Self {
        value.source
    }
}

impl fmt::Display for ViewMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// In-view class toggling configuration.
///
/// With `feature = "serde"`, keys are camelCase, missing keys fall back to the defaults and
/// unrecognized keys are ignored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct InViewOptions {
    pub active: bool,
    pub class_name_in_view: String,
    pub class_name_not_in_view: String,
    pub view_margin: ViewMargin,
    /// When false, observation stops after the first time the element enters the viewport.
    pub repeat_in_view: bool,
}

impl Default for InViewOptions {
    fn default() -> Self {
        Self {
            active: true,
            class_name_in_view: String::from("in-view"),
            class_name_not_in_view: String::from("not-in-view"),
            view_margin: ViewMargin::zero(),
            repeat_in_view: true,
        }
    }
}

impl InViewOptions {
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_class_names(
        mut self,
        in_view: impl Into<String>,
        not_in_view: impl Into<String>,
    ) -> Self {
        self.class_name_in_view = in_view.into();
        self.class_name_not_in_view = not_in_view.into();
        self
    }

    pub fn with_view_margin(mut self, view_margin: ViewMargin) -> Self {
        self.view_margin = view_margin;
        self
    }

    pub fn with_repeat_in_view(mut self, repeat_in_view: bool) -> Self {
        self.repeat_in_view = repeat_in_view;
        self
    }

    /// Applies every `Some` field of `overrides`, keeping the rest.
    pub fn merge(mut self, overrides: InViewOverrides) -> Self {
        if let Some(active) = overrides.active {
            self.active = active;
        }
        if let Some(class_name) = overrides.class_name_in_view {
            self.class_name_in_view = class_name;
        }
        if let Some(class_name) = overrides.class_name_not_in_view {
            self.class_name_not_in_view = class_name;
        }
        if let Some(view_margin) = overrides.view_margin {
            self.view_margin = view_margin;
        }
        if let Some(repeat) = overrides.repeat_in_view {
            self.repeat_in_view = repeat;
        }
        self
    }
}

/// A partial [`InViewOptions`]; see [`InViewOptions::merge`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct InViewOverrides {
    pub active: Option<bool>,
    pub class_name_in_view: Option<String>,
    pub class_name_not_in_view: Option<String>,
    pub view_margin: Option<ViewMargin>,
    pub repeat_in_view: Option<bool>,
}

/// Scroll-linked transform configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ParallaxOptions {
    pub end_percent: EndPercent,
    pub start: Option<TransformPoint>,
    pub end: Option<TransformPoint>,
}

impl ParallaxOptions {
    pub fn new(start: TransformPoint, end: TransformPoint) -> Self {
        Self {
            end_percent: EndPercent::One,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn with_end_percent(mut self, end_percent: EndPercent) -> Self {
        self.end_percent = end_percent;
        self
    }

    pub fn with_start(mut self, start: Option<TransformPoint>) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Option<TransformPoint>) -> Self {
        self.end = end;
        self
    }
}

/// Configuration for one [`crate::ElementController`].
///
/// Cheap to clone: the render callback lives behind an `Arc`.
#[derive(Clone, Default)]
pub struct ElementOptions {
    /// The element's own class, rendered before the in-view class.
    pub class_name: Option<String>,
    /// When `None`, the element never registers for scroll frames.
    pub parallax: Option<ParallaxOptions>,
    pub in_view: InViewOptions,
    pub on_change: Option<OnRenderCallback>,
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_parallax(mut self, parallax: Option<ParallaxOptions>) -> Self {
        self.parallax = parallax;
        self
    }

    pub fn with_in_view(mut self, in_view: InViewOptions) -> Self {
        self.in_view = in_view;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&RenderState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl fmt::Debug for ElementOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementOptions")
            .field("class_name", &self.class_name)
            .field("parallax", &self.parallax)
            .field("in_view", &self.in_view)
            .finish_non_exhaustive()
    }
}

/// What the coordinator does when one controller fails during a dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchPolicy {
    /// Log and record the failure, keep dispatching to the remaining controllers.
    #[default]
    Isolate,
    /// Stop the batch at the first failure.
    Abort,
}

/// Configuration for [`crate::ScrollCoordinator`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CoordinatorOptions {
    pub throttle_ms: u64,
    /// Dispatch is skipped while the outer viewport height is below this.
    pub min_outer_height: f64,
    pub dispatch_policy: DispatchPolicy,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            min_outer_height: MIN_OUTER_HEIGHT,
            dispatch_policy: DispatchPolicy::Isolate,
        }
    }
}

impl CoordinatorOptions {
    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_min_outer_height(mut self, min_outer_height: f64) -> Self {
        self.min_outer_height = min_outer_height;
        self
    }

    pub fn with_dispatch_policy(mut self, dispatch_policy: DispatchPolicy) -> Self {
        self.dispatch_policy = dispatch_policy;
        self
    }
}
