//! Nine-pebbles: a two-player sowing game over an 18-cell board.
//!
//! Each side owns a row of nine cells, every cell starting with nine
//! pebbles. A move picks up a cell's pebbles and sows them one-by-one along
//! a fixed loop through the mover's row and into the opponent's row. A sow
//! ending on an even count in the far row captures that cell; a sow ending
//! on exactly three pebbles may found the mover's "special" cell, which
//! from then on scores every pebble landing on it directly for its owner.
//! More than 81 captured pebbles wins; 81 apiece is a draw; a player with
//! no legal move loses.
//!
//! The crate exposes the immutable [`GameState`] with move legality and
//! application, terminal detection, and the 47-float feature encoding used
//! as neural-network input, plus the [`heuristic`] move valuator feeding
//! that encoding and the [`Outcomes`] tally used by search statistics.

pub mod heuristic;
pub mod outcome;
pub mod player;
pub mod state;

pub use outcome::Outcomes;
pub use player::Player;
pub use state::{GameState, NUM_CELLS, NUM_FEATURES, NUM_MOVES};
