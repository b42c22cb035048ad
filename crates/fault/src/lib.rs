#![doc = include_str!("../README.md")]

mod depth;
pub use depth::Depth;

mod error;
pub use error::{GameError, PositionError};

mod position;
pub use position::{compute_gindex, msb_index, Position};

mod types;
pub use types::*;

mod game;
pub use game::{defends_parent, is_duplicate, Game, GameState};
