//! Route type shared by routing and motion crates.

use std::str::FromStr;

use crate::VtError;

/// Direction of a ground movement relative to the runway.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RouteType {
    /// Runway exit → gate.  The first path node must be a configured exit.
    Arrival,
    /// Gate → runway entrance.  The last path node must be a configured entrance.
    Departure,
}

impl RouteType {
    /// Lowercase label, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::Arrival   => "arrival",
            RouteType::Departure => "departure",
        }
    }
}

impl std::fmt::Display for RouteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RouteType {
    type Err = VtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival"   => Ok(RouteType::Arrival),
            "departure" => Ok(RouteType::Departure),
            other       => Err(VtError::Parse(format!("unknown route type `{other}`"))),
        }
    }
}
