//! The position module holds the [Position] type, which addresses a node of the game tree.

use crate::{Depth, PositionError};
use ethers::types::U256;
use num_bigint::BigUint;
use num_traits::{Num, One, ToPrimitive, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Computes a generalized index from a depth and index at depth.
///
/// ### Takes
/// - `depth`: The depth of the generalized index.
/// - `index_at_depth`: The index at depth of the generalized index.
///
/// ### Returns
/// - `Ok(BigUint)`: The generalized index: `2^{depth} | index_at_depth`.
/// - `Err(PositionError::Overflow)`: `depth` is deeper than [Depth::MAX].
pub fn compute_gindex(depth: Depth, index_at_depth: &BigUint) -> Result<BigUint, PositionError> {
    Ok(depth.max_gindex()? | index_at_depth)
}

/// Returns the index of the most significant set bit of `x`, i.e. `floor(log2(x))`.
///
/// `0` has no set bit and maps to depth `0` by convention.
pub fn msb_index(x: &BigUint) -> Depth {
    Depth::new(x.bits().saturating_sub(1))
}

/// A [Position] is a node within the binary game tree, identified by its [Depth] and its
/// 0-based index among the `2^depth` nodes at that depth.
///
/// The canonical encoding is the generalized index `2^{depth} | index_at_depth`:
///
/// ```text
///         1
///       /   \
///      2     3
///     / \   / \
///    4   5 6   7
/// ```
///
/// Positions are values; every navigation method returns a new [Position]. Every [Position] sits
/// at a depth no deeper than [Depth::MAX].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Position {
    depth: Depth,
    index_at_depth: BigUint,
}

impl Position {
    /// Creates a new [Position], rejecting an unsupported `depth` and an `index_at_depth`
    /// outside of `0..2^depth`.
    pub fn new(depth: Depth, index_at_depth: BigUint) -> Result<Self, PositionError> {
        depth.ensure_supported()?;
        if index_at_depth.bits() > depth.get() {
            return Err(PositionError::IndexOutOfRange {
                depth,
                index: index_at_depth,
            });
        }
        Ok(Self {
            depth,
            index_at_depth,
        })
    }

    /// Returns the root [Position].
    pub fn root() -> Self {
        Self::default()
    }

    /// Decodes a generalized index into a [Position].
    ///
    /// `0` is not a node address; it decodes to the root so that it can stand in for
    /// "no parent". A gindex wider than `Depth::MAX + 1` bits returns
    /// [PositionError::Overflow].
    pub fn from_gindex(gindex: &BigUint) -> Result<Self, PositionError> {
        if !msb_index(gindex).is_supported() {
            return Err(PositionError::Overflow {
                value: format!("gindex of {} bits", gindex.bits()),
                target: "Position",
            });
        }
        Ok(Self::decode(gindex))
    }

    /// Encodes this [Position] as a generalized index.
    pub fn to_gindex(&self) -> BigUint {
        self.depth.leading_bit() | &self.index_at_depth
    }

    /// Encodes this [Position] as the `uint128` generalized index used on chain.
    pub fn to_gindex_u128(&self) -> Result<u128, PositionError> {
        let gindex = self.to_gindex();
        gindex.to_u128().ok_or(PositionError::Overflow {
            value: gindex.to_string(),
            target: "u128",
        })
    }

    /// Returns the depth of the [Position] within the tree.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Returns the index at depth of the [Position] within the tree.
    pub fn index_at_depth(&self) -> &BigUint {
        &self.index_at_depth
    }

    /// Returns `true` if this is the root of the tree.
    pub fn is_root_position(&self) -> bool {
        self.depth.is_root() && self.index_at_depth.is_zero()
    }

    /// Returns the left child [Position].
    pub fn left_child(&self) -> Result<Self, PositionError> {
        Ok(Self {
            depth: self.depth.checked_increment()?,
            index_at_depth: &self.index_at_depth << 1u8,
        })
    }

    /// Returns the right child [Position].
    pub fn right_child(&self) -> Result<Self, PositionError> {
        Ok(Self {
            depth: self.depth.checked_increment()?,
            index_at_depth: (&self.index_at_depth << 1u8) | BigUint::one(),
        })
    }

    /// Returns the parent [Position]. The root has no parent.
    pub fn parent(&self) -> Result<Self, PositionError> {
        Ok(Self {
            depth: self.depth.checked_decrement()?,
            index_at_depth: self.parent_index_at_depth(),
        })
    }

    /// Returns the [Position] of an attack against this one: its left child.
    pub fn attack(&self) -> Result<Self, PositionError> {
        self.left_child()
    }

    /// Returns the [Position] of a defense of this one: the left child of its parent's right
    /// child.
    pub fn defend(&self) -> Result<Self, PositionError> {
        self.parent()?.right_child()?.left_child()
    }

    /// Returns the [Position] of an attack or a defense against this one.
    pub fn make_move(&self, is_attack: bool) -> Result<Self, PositionError> {
        if is_attack {
            self.attack()
        } else {
            self.defend()
        }
    }

    /// Returns this [Position] as seen from inside the subtree rooted at `ancestor` levels below
    /// the true root. The path bits above the ancestor are dropped.
    pub fn relative_to_ancestor_at_depth(&self, ancestor: Depth) -> Result<Self, PositionError> {
        let depth = self.depth.checked_sub(ancestor)?;
        let index_at_depth = if self.index_at_depth.bits() <= depth.get() {
            self.index_at_depth.clone()
        } else {
            &self.index_at_depth % depth.leading_bit()
        };
        tracing::trace!(target: "fault-position", "Re-rooted {} at ancestor depth {}: depth {}, index {}", self, ancestor, depth, index_at_depth);
        Ok(Self {
            depth,
            index_at_depth,
        })
    }

    /// Returns the rightmost leaf [Position] at `max_depth` below this one, which commits to the
    /// same trace index as this [Position].
    pub fn right_index(&self, max_depth: Depth) -> Result<Self, PositionError> {
        max_depth.ensure_supported()?;
        let remaining = max_depth.checked_sub(self.depth)?.get();
        Ok(Self {
            depth: max_depth,
            index_at_depth: (&self.index_at_depth << remaining)
                | ((BigUint::one() << remaining) - 1u32),
        })
    }

    /// Returns the trace index that this [Position] commits to in a game of `max_depth`.
    pub fn trace_index(&self, max_depth: Depth) -> Result<BigUint, PositionError> {
        self.right_index(max_depth).map(|leaf| leaf.index_at_depth)
    }

    /// Returns `true` if this position's expected parent index differs from the index of
    /// `parent`.
    pub fn right_of(&self, parent: &Position) -> bool {
        self.parent_index_at_depth() != parent.index_at_depth
    }

    /// Returns the next [Position] to the right at the same depth. Fails with
    /// [PositionError::IndexOutOfRange] when this is already the rightmost node of its depth.
    pub fn move_right(&self) -> Result<Self, PositionError> {
        Self::new(self.depth, &self.index_at_depth + 1u32)
    }

    fn parent_index_at_depth(&self) -> BigUint {
        &self.index_at_depth >> 1u8
    }

    /// Splits a gindex whose depth is known to be supported.
    fn decode(gindex: &BigUint) -> Self {
        let depth = msb_index(gindex);
        let index_at_depth = if gindex.is_zero() {
            BigUint::zero()
        } else {
            gindex - depth.leading_bit()
        };
        Self {
            depth,
            index_at_depth,
        }
    }
}

impl From<u128> for Position {
    fn from(gindex: u128) -> Self {
        // At most 128 bits, well within the supported depth.
        Self::decode(&BigUint::from(gindex))
    }
}

impl TryFrom<&Position> for U256 {
    type Error = PositionError;

    fn try_from(position: &Position) -> Result<Self, Self::Error> {
        let gindex = position.to_gindex();
        let bytes = gindex.to_bytes_be();
        if bytes.len() > 32 {
            return Err(PositionError::Overflow {
                value: gindex.to_string(),
                target: "U256",
            });
        }
        Ok(U256::from_big_endian(&bytes))
    }
}

impl FromStr for Position {
    type Err = PositionError;

    /// Parses a generalized index written in decimal or as `0x`-prefixed hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let gindex = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => BigUint::from_str_radix(hex, 16),
            None => BigUint::from_str_radix(s, 10),
        }
        .map_err(|_| PositionError::InvalidGIndex(s.to_string()))?;
        Self::from_gindex(&gindex)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (gindex {})",
            self.depth,
            self.index_at_depth,
            self.to_gindex()
        )
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.to_gindex())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GIndexVisitor;

        impl<'de> de::Visitor<'de> for GIndexVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a generalized index as an unsigned integer or a decimal/hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Position::from(u128::from(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(GIndexVisitor)
    }
}
