//! Strongly typed, zero-cost identifier wrappers.
//!
//! Both ids are plain integers underneath.  `index()` is the way to turn
//! one into a slice index.

use std::fmt;

/// Define an id newtype over an unsigned integer.  `$tag` prefixes the
/// `Display` form, e.g. `zone#3`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Never handed out; marks an unset id.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
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
    /// Identity of a simulated customer.
    ///
    /// Handed out monotonically by the scheduler and never reused within one
    /// population, so it stays stable while other agents are removed.
    pub struct AgentId(u32) => "agent";
}

typed_id! {
    /// Dense index of a zone in load order.
    ///
    /// The zone's string id is its external identity; `ZoneIdx` is what
    /// matrix rows, agents and aggregates carry.
    pub struct ZoneIdx(u16) => "zone";
}
