//! The game module holds the [Game] trait, the claim relation predicates, and the append-only
//! [GameState] claim set.

use crate::{Claim, ClaimData, Depth, GameError, Position};
use std::collections::HashSet;

/// The [Game] trait defines the read interface for a local copy of a fault dispute game's claims.
pub trait Game {
    /// Returns every [Claim] in the game, in the order they were made.
    fn claims(&self) -> &[Claim];

    /// Returns the maximum depth of the game tree.
    fn max_depth(&self) -> Depth;

    /// Checks whether a [Claim] with the same position and value already exists in the game.
    ///
    /// ### Takes
    /// - `claim`: The proposed [Claim].
    ///
    /// ### Returns
    /// - `bool`: `true` if admitting `claim` would record the same move twice.
    fn is_duplicate(&self, claim: &Claim) -> bool;

    /// Checks whether a [Claim] defends the claim it responds to.
    ///
    /// ### Takes
    /// - `claim`: A [Claim] in the game.
    ///
    /// ### Returns
    /// - `bool`: `true` if the claim's parent is two levels above it and the claim descends
    ///   from the parent's right child. `false` for the root claim.
    fn defends_parent(&self, claim: &Claim) -> bool;
}

/// Returns `true` if `existing` already holds a [Claim] with the same position and value as
/// `claim`. Claim indices are not compared.
pub fn is_duplicate<'a>(claim: &Claim, existing: impl IntoIterator<Item = &'a Claim>) -> bool {
    existing.into_iter().any(|other| other.data == claim.data)
}

/// Returns `true` if `claim` sits two levels below `parent` and its own parent is the right child
/// of `parent`, the shape a defense move produces. A missing `parent` never defends.
pub fn defends_parent(claim: &Claim, parent: Option<&Claim>) -> bool {
    let Some(parent) = parent else {
        return false;
    };

    let ancestor = parent.position().depth();
    if ancestor.get().checked_add(2) != Some(claim.position().depth().get()) {
        return false;
    }

    match claim.position().relative_to_ancestor_at_depth(ancestor) {
        // Relative to the parent, a grandchild defends unless it hangs off the left child.
        Ok(relative) => relative.right_of(&Position::from(2u128)),
        Err(_) => false,
    }
}

/// The [GameState] struct is the append-only claim set of a single fault dispute game.
///
/// Claims are admitted through [GameState::put] and never removed. Appending takes `&mut self`,
/// so concurrent writers must be serialized by the owner of the state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The claims, indexed by their contract index.
    claims: Vec<Claim>,
    /// The position and value of every admitted claim.
    seen: HashSet<ClaimData>,
    /// The maximum depth of the game tree.
    max_depth: Depth,
}

impl GameState {
    /// Creates an empty [GameState] for a game of `max_depth`.
    pub fn new(max_depth: Depth) -> Self {
        Self {
            claims: Vec::new(),
            seen: HashSet::new(),
            max_depth,
        }
    }

    /// Creates a [GameState] by admitting each of `claims` in order.
    pub fn try_from_claims(
        claims: impl IntoIterator<Item = Claim>,
        max_depth: Depth,
    ) -> Result<Self, GameError> {
        let mut state = Self::new(max_depth);
        for claim in claims {
            state.put(claim)?;
        }
        Ok(state)
    }

    /// Appends a [Claim] to the set.
    ///
    /// ### Takes
    /// - `claim`: The claim to admit. Its `contract_index` must be the next free slot.
    ///
    /// ### Returns
    /// - `Ok(())`: The claim was appended.
    /// - `Err(GameError)`: The claim is too deep, out of order, a duplicate, or responds to a
    ///   claim that is not in the set.
    pub fn put(&mut self, claim: Claim) -> Result<(), GameError> {
        let depth = claim.position().depth();
        if depth > self.max_depth {
            return Err(GameError::ExceedsMaxDepth {
                depth,
                max_depth: self.max_depth,
            });
        }
        if claim.contract_index != self.claims.len() {
            return Err(GameError::UnexpectedIndex {
                expected: self.claims.len(),
                got: claim.contract_index,
            });
        }
        if self.seen.contains(&claim.data) {
            return Err(GameError::Duplicate(claim.position().to_gindex()));
        }
        if !claim.is_root() && claim.parent_index >= self.claims.len() {
            return Err(GameError::MissingParent(claim.parent_index));
        }

        tracing::debug!(target: "fault-game", "Admitting claim {} at {}", claim.contract_index, claim.position());
        self.seen.insert(claim.data.clone());
        self.claims.push(claim);
        Ok(())
    }

    /// Returns the [Claim] at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Claim> {
        self.claims.get(index)
    }

    /// Returns the [Claim] that `claim` responds to. The root claim has no parent.
    pub fn parent(&self, claim: &Claim) -> Option<&Claim> {
        if claim.is_root() {
            return None;
        }
        self.claims.get(claim.parent_index)
    }

    /// Returns the number of claims in the set.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if no claim has been made yet.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl Game for GameState {
    fn claims(&self) -> &[Claim] {
        &self.claims
    }

    fn max_depth(&self) -> Depth {
        self.max_depth
    }

    fn is_duplicate(&self, claim: &Claim) -> bool {
        self.seen.contains(&claim.data)
    }

    fn defends_parent(&self, claim: &Claim) -> bool {
        defends_parent(claim, self.parent(claim))
    }
}
