//! The types module contains the claim types of the fault dispute game.

use crate::Position;
use ethers::types::H256;
use serde::{Deserialize, Serialize};

/// The [ClaimValue] type is the commitment a participant makes to the execution trace at the
/// trace index of a [Position].
pub type ClaimValue = H256;

/// The [ClaimData] struct pairs a [ClaimValue] with the [Position] it is made at. Two claims
/// with equal [ClaimData] are duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimData {
    /// The claim that is being made at the trace index relative to the position.
    pub value: ClaimValue,
    /// The position of the claim within the game tree.
    pub position: Position,
}

/// The [Claim] struct represents a [ClaimData] as it is recorded in the game's claim set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The value and position of the claim.
    #[serde(flatten)]
    pub data: ClaimData,
    /// The index of this claim in the claim set.
    pub contract_index: usize,
    /// The index of the claim this one responds to. Ignored for the root claim.
    #[serde(default)]
    pub parent_index: usize,
}

impl Claim {
    /// Creates a new [Claim].
    pub fn new(
        value: ClaimValue,
        position: Position,
        contract_index: usize,
        parent_index: usize,
    ) -> Self {
        Self {
            data: ClaimData { value, position },
            contract_index,
            parent_index,
        }
    }

    /// Returns the [Position] of the claim.
    pub fn position(&self) -> &Position {
        &self.data.position
    }

    /// Returns the [ClaimValue] of the claim.
    pub fn value(&self) -> ClaimValue {
        self.data.value
    }

    /// Returns `true` if the claim sits at the root of the game tree.
    pub fn is_root(&self) -> bool {
        self.data.position.is_root_position()
    }
}
