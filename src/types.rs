use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::ParallaxError;

/// Opaque registry token handed out by [`crate::ScrollCoordinator::register`].
///
/// Ids are minted from a monotonically increasing counter and never reused by the coordinator
/// that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerId(pub(crate) u64);

impl ControllerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key{}", self.0)
    }
}

/// An immutable snapshot of scroll offsets and viewport size, shared by every controller in
/// one dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScrollFrame {
    pub wrapper_pos_y: f64,
    /// Carried for completeness; horizontal progress is not computed.
    pub wrapper_pos_x: f64,
    pub screen_y: f64,
    pub screen_x: f64,
}

/// Normalized travel of an element through the viewport, always within `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Progress(f64);

impl Progress {
    pub const MIN: Self = Self(-1.0);
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    /// Clamps `raw` into `[-1, 1]`. Returns `None` for NaN.
    pub fn new(raw: f64) -> Option<Self> {
        if raw.is_nan() {
            return None;
        }
        Some(Self(raw.clamp(-1.0, 1.0)))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// A transformable axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
}

impl Axis {
    pub const ALL: [Axis; 7] = [
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::RotateX,
        Axis::RotateY,
        Axis::RotateZ,
        Axis::Scale,
    ];

    /// The configuration key for this axis.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Scale => "scale",
        }
    }

    /// The CSS transform function this axis renders to.
    pub fn function(self) -> &'static str {
        match self {
            Self::X => "translateX",
            Self::Y => "translateY",
            Self::Z => "translateZ",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Scale => "scale",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::X | Self::Y | Self::Z => "px",
            Self::RotateX | Self::RotateY | Self::RotateZ => "deg",
            Self::Scale => "",
        }
    }
}

impl FromStr for Axis {
    type Err = ParallaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| ParallaxError::UnknownAxis(String::from(s)))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sparse, insertion-ordered mapping from [`Axis`] to value.
///
/// Rendering follows insertion order, so a given configuration always renders the same
/// transform string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformPoint {
    entries: Vec<(Axis, f64)>,
}

impl TransformPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a point from `(name, value)` pairs, skipping unknown axis names.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut point = Self::new();
        for (name, value) in pairs {
            match name.parse::<Axis>() {
                Ok(axis) => point.set(axis, value),
                Err(_err) => {
                    pdebug!(axis = name, "TransformPoint: ignoring unknown axis");
                }
            }
        }
        point
    }

    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, value);
        self
    }

    /// Sets `axis`, replacing an existing value in place.
    pub fn set(&mut self, axis: Axis, value: f64) {
        match self.entries.iter_mut().find(|(a, _)| *a == axis) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((axis, value)),
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, v)| *v)
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.get(axis).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.entries.iter().map(|(a, _)| *a)
    }
}

impl FromIterator<(Axis, f64)> for TransformPoint {
    fn from_iter<I: IntoIterator<Item = (Axis, f64)>>(iter: I) -> Self {
        let mut point = Self::new();
        for (axis, value) in iter {
            point.set(axis, value);
        }
        point
    }
}

/// Compresses the scroll distance over which progress reaches its extremes.
///
/// Larger divisors make the effect finish earlier in the scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum EndPercent {
    #[default]
    One,
    Two,
    Four,
}

impl EndPercent {
    pub fn divisor(self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Two => 2.0,
            Self::Four => 4.0,
        }
    }
}

impl TryFrom<u32> for EndPercent {
    type Error = ParallaxError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(ParallaxError::InvalidEndPercent(other)),
        }
    }
}

impl From<EndPercent> for u32 {
    fn from(value: EndPercent) -> Self {
        match value {
            EndPercent::One => 1,
            EndPercent::Two => 2,
            EndPercent::Four => 4,
        }
    }
}

/// What the rendering collaborator applies to an element after each update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RenderState {
    pub transform: String,
    pub class_name: String,
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Axis, TransformPoint};
    use core::fmt;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for TransformPoint {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (axis, value) in self.iter() {
                map.serialize_entry(axis.name(), &value)?;
            }
            map.end()
        }
    }

    struct PointVisitor;

    impl<'de> Visitor<'de> for PointVisitor {
        type Value = TransformPoint;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of transform axis names to numbers")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut point = TransformPoint::new();
            while let Some(key) = access.next_key::<alloc::string::String>()? {
                let value: f64 = access.next_value()?;
                match key.parse::<Axis>() {
                    Ok(axis) => point.set(axis, value),
                    Err(_err) => {
                        pdebug!(axis = key.as_str(), "TransformPoint: ignoring unknown axis");
                    }
                }
            }
            Ok(point)
        }
    }

    impl<'de> Deserialize<'de> for TransformPoint {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(PointVisitor)
        }
    }
}
