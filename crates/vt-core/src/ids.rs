//! Identifier types.
//!
//! Two families live here:
//!
//! - **String identifiers** (`NodeId`, `SegmentId`, `OperationMode`,
//!   `RunwayId`) are the names the outside world uses.  They are `Ord` so
//!   they can key `BTreeMap`s and give deterministic iteration order.
//! - **Dense indices** (`NodeIdx`, `SegmentIdx`, `EdgeIdx`) are `Copy`
//!   integer wrappers used on the routing hot path for direct `Vec`
//!   indexing.  The inner integer is `pub`, but callers should prefer
//!   `.index()`.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_idx {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid index".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized indices are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate an owned string identifier.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique name of a network node, e.g. `"W37"` or `"N0412"`.
    pub struct NodeId;
}

string_id! {
    /// Unique name of a network segment.
    pub struct SegmentId;
}

string_id! {
    /// Named runway-usage configuration, e.g. `"EAST"` / `"WEST"`.
    pub struct OperationMode;
}

string_id! {
    /// Runway designator, e.g. `"24"`, `"06L"`.
    pub struct RunwayId;
}

impl RunwayId {
    /// Nominal runway heading in degrees derived from the designator number
    /// (`"24"` → 240°, `"06L"` → 60°, `"36"` → 360° ≡ 0°).
    ///
    /// Returns `None` if the designator does not start with a number in
    /// `1..=36`.
    pub fn nominal_heading_deg(&self) -> Option<f64> {
        let digits: String = self.0.chars().take_while(|c| c.is_ascii_digit()).collect();
        let n: u32 = digits.parse().ok()?;
        if !(1..=36).contains(&n) {
            return None;
        }
        Some(f64::from(n * 10) % 360.0)
    }
}

typed_idx! {
    /// Dense index of a node inside a built network.
    pub struct NodeIdx(u32);
}

typed_idx! {
    /// Dense index of a segment inside a built network.
    pub struct SegmentIdx(u32);
}

typed_idx! {
    /// Dense index of a directed traversal edge (CSR position).
    pub struct EdgeIdx(u32);
}
