//! Typed identifiers.
//!
//! Ordering is load-bearing: agents are advanced in ascending `AgentId`
//! order, and equidistant flowers are tie-broken by the lowest `FlowerId`.

use std::fmt;

/// Declare a `u32` newtype id that prints as `<tag>#<n>`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id allocated after `self`.
            #[inline]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of one bee.  Allocated monotonically and never reused.
    pub struct AgentId(u32) = "bee";
}

typed_id! {
    /// Identity of one flower.  Equal to the flower's index in `World`.
    pub struct FlowerId(u32) = "flower";
}
