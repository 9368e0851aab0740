//! Whether a ship is travelling under its own power or riding a UFO.

use crate::TransportId;

/// A ship's relationship to the transports.
///
/// The ship never owns the transport: `Riding` only records which UFO it has
/// committed to, by id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mount {
    /// Moving alone (full energy cost).
    #[default]
    OnFoot,
    /// Boarded, or walking to meet, the given transport.
    Riding(TransportId),
}

impl Mount {
    #[inline]
    pub fn is_riding(self) -> bool {
        matches!(self, Mount::Riding(_))
    }

    /// The transport being ridden, if any.
    #[inline]
    pub fn transport(self) -> Option<TransportId> {
        match self {
            Mount::OnFoot      => None,
            Mount::Riding(ufo) => Some(ufo),
        }
    }

    /// Human-readable label, useful for trace output.
    pub fn as_str(self) -> &'static str {
        match self {
            Mount::OnFoot    => "on_foot",
            Mount::Riding(_) => "riding",
        }
    }
}

impl std::fmt::Display for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
