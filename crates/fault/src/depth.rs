//! The depth module holds the [Depth] type.

use crate::PositionError;
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The [Depth] of a node within the game tree, measured in edges from the root.
///
/// Depths are stored as a `u64`, but only depths up to [Depth::MAX] are supported: a node at
/// depth `d` needs a `d + 1` bit generalized index, and [Depth::MAX] caps that at 65536 bits.
/// Arithmetic that would step past it (or above the root) fails instead of wrapping, and any
/// operation handed an unsupported depth returns [PositionError::Overflow] before allocating.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Depth(u64);

impl Depth {
    /// The depth of the root node.
    pub const ROOT: Depth = Depth(0);
    /// The maximum supported depth.
    pub const MAX: Depth = Depth(u16::MAX as u64);

    /// Creates a new [Depth].
    pub const fn new(depth: u64) -> Self {
        Self(depth)
    }

    /// Returns the raw depth.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the depth of the root node.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the depth is odd.
    pub const fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// Returns `true` if the depth is at most [Depth::MAX].
    pub const fn is_supported(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Returns the depth unchanged if it is supported, or [PositionError::Overflow] otherwise.
    pub fn ensure_supported(self) -> Result<Self, PositionError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(PositionError::Overflow {
                value: self.0.to_string(),
                target: "Depth",
            })
        }
    }

    /// Returns `2^depth`: the number of nodes at this depth, which is also the generalized
    /// index of the leftmost node at this depth.
    pub fn max_gindex(self) -> Result<BigUint, PositionError> {
        self.ensure_supported().map(Self::leading_bit)
    }

    /// `2^depth` for a depth already known to be supported.
    pub(crate) fn leading_bit(self) -> BigUint {
        BigUint::one() << self.0
    }

    /// Returns the depth one level further from the root.
    pub fn checked_increment(self) -> Result<Self, PositionError> {
        if self >= Self::MAX {
            return Err(PositionError::InvalidNavigation(
                "position is already at the maximum depth",
            ));
        }
        Ok(Self(self.0 + 1))
    }

    /// Returns the depth one level closer to the root.
    pub fn checked_decrement(self) -> Result<Self, PositionError> {
        self.0
            .checked_sub(1)
            .map(Self)
            .ok_or(PositionError::InvalidNavigation("the root has no parent"))
    }

    /// Returns `self - other`, or [PositionError::DepthTooSmall] if `other` is deeper.
    pub fn checked_sub(self, other: Depth) -> Result<Self, PositionError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(PositionError::DepthTooSmall {
                required: other,
                actual: self,
            })
    }
}

impl From<u64> for Depth {
    fn from(depth: u64) -> Self {
        Self(depth)
    }
}

impl From<Depth> for u64 {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::Depth;
    use crate::PositionError;
    use num_bigint::BigUint;

    #[test]
    fn depth_predicates() {
        assert!(Depth::ROOT.is_root());
        assert!(!Depth::new(1).is_root());
        assert!(Depth::new(1).is_odd());
        assert!(!Depth::new(4).is_odd());
        assert!(Depth::MAX.is_odd());
    }

    #[test]
    fn max_gindex_is_leftmost_node() {
        assert_eq!(Depth::new(0).max_gindex().unwrap(), BigUint::from(1u8));
        assert_eq!(Depth::new(4).max_gindex().unwrap(), BigUint::from(16u8));
        assert_eq!(
            Depth::new(64).max_gindex().unwrap(),
            BigUint::from(u64::MAX) + 1u32
        );
        assert_eq!(Depth::MAX.max_gindex().unwrap().bits(), Depth::MAX.get() + 1);
    }

    #[test]
    fn unsupported_depths_overflow() {
        let too_deep = Depth::new(Depth::MAX.get() + 1);
        assert!(Depth::MAX.is_supported());
        assert!(!too_deep.is_supported());
        assert_eq!(Depth::MAX.ensure_supported(), Ok(Depth::MAX));
        for depth in [too_deep, Depth::new(u64::MAX)] {
            assert!(matches!(
                depth.max_gindex(),
                Err(PositionError::Overflow { target: "Depth", .. })
            ));
        }
    }

    #[test]
    fn increment_and_decrement_guard_the_edges() {
        assert_eq!(Depth::new(3).checked_increment(), Ok(Depth::new(4)));
        assert!(matches!(
            Depth::MAX.checked_increment(),
            Err(PositionError::InvalidNavigation(_))
        ));
        assert!(matches!(
            Depth::new(u64::MAX).checked_increment(),
            Err(PositionError::InvalidNavigation(_))
        ));
        assert_eq!(Depth::new(3).checked_decrement(), Ok(Depth::new(2)));
        assert!(matches!(
            Depth::ROOT.checked_decrement(),
            Err(PositionError::InvalidNavigation(_))
        ));
    }

    #[test]
    fn checked_sub_reports_depth_too_small() {
        assert_eq!(Depth::new(5).checked_sub(Depth::new(2)), Ok(Depth::new(3)));
        assert_eq!(
            Depth::new(1).checked_sub(Depth::new(2)),
            Err(PositionError::DepthTooSmall {
                required: Depth::new(2),
                actual: Depth::new(1),
            })
        );
    }

    #[test]
    fn serde_is_a_plain_integer() {
        assert_eq!(serde_json::to_string(&Depth::new(73)).unwrap(), "73");
        assert_eq!(serde_json::from_str::<Depth>("4").unwrap(), Depth::new(4));
    }
}
