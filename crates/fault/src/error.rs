//! The error module holds the error types returned by [Position](crate::Position) arithmetic and
//! the [GameState](crate::GameState) claim set.

use crate::Depth;
use num_bigint::BigUint;
use thiserror::Error;

/// Errors raised while navigating or converting a [Position](crate::Position).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// A depth smaller than `required` was supplied where at least `required` is needed.
    /// Returned by re-rooting onto an ancestor deeper than the position itself, and by trace
    /// index projection onto a max depth shallower than the position.
    #[error("position depth is too small: need at least {required}, got {actual}")]
    DepthTooSmall {
        /// The minimum depth the operation needed.
        required: Depth,
        /// The depth that was available.
        actual: Depth,
    },
    /// A move that leaves the tree: the parent of the root, or a child past [Depth::MAX].
    #[error("invalid navigation: {0}")]
    InvalidNavigation(&'static str),
    /// A value does not fit in the requested fixed-width type.
    #[error("{value} does not fit in {target}")]
    Overflow {
        /// Decimal rendering of the value being narrowed.
        value: String,
        /// The name of the narrower type.
        target: &'static str,
    },
    /// The index at depth is outside of `0..2^depth`.
    #[error("index {index} is out of range for depth {depth}")]
    IndexOutOfRange {
        /// The depth of the rejected position.
        depth: Depth,
        /// The rejected index at depth.
        index: BigUint,
    },
    /// A generalized index string could not be parsed.
    #[error("invalid generalized index {0:?}")]
    InvalidGIndex(String),
}

/// Errors raised while admitting a [Claim](crate::Claim) into a [GameState](crate::GameState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A claim with the same position and value is already in the set.
    #[error("duplicate claim at gindex {0}")]
    Duplicate(BigUint),
    /// The claim sits below the game's maximum depth.
    #[error("claim depth {depth} exceeds the max game depth {max_depth}")]
    ExceedsMaxDepth {
        /// The depth of the rejected claim.
        depth: Depth,
        /// The maximum depth of the game.
        max_depth: Depth,
    },
    /// The claim's contract index is not the next free slot of the set.
    #[error("expected claim index {expected}, got {got}")]
    UnexpectedIndex {
        /// The next free slot.
        expected: usize,
        /// The index carried by the claim.
        got: usize,
    },
    /// A non-root claim refers to a parent that is not in the set yet.
    #[error("parent claim {0} not found")]
    MissingParent(usize),
}
