//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into arena `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
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

typed_id! {
    /// Index of a star in the field.  Stars are numbered in input order.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a ship (a controllable agent) in turn-snapshot order.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a UFO (an externally driven transport) in turn-snapshot order.
    pub struct TransportId(u32);
}

impl NodeId {
    /// Parse a raw protocol value into a node id, rejecting negatives and
    /// values outside `0..count`.
    pub fn checked(raw: i64, count: usize) -> Option<NodeId> {
        if raw < 0 || raw as u64 >= count as u64 {
            return None;
        }
        Some(NodeId(raw as u32))
    }

    /// The legal "do something" fallback used when no plan exists: the next
    /// star in table order, wrapping at `count`.
    #[inline]
    pub fn successor(self, count: usize) -> NodeId {
        debug_assert!(count > 0);
        if !self.is_valid() {
            return NodeId(0);
        }
        NodeId(((self.index() + 1) % count) as u32)
    }
}
