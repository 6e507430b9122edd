//! Core of a falling-block puzzle game: pieces and their rotations, the board,
//! the per-tick game step and the tile atlas renderers draw blocks from.

pub mod atlas;
pub mod board;
pub mod catalog;
pub mod error;
pub mod game;
pub mod grid;
pub mod render;
pub mod sheet;
pub mod tetromino;

pub use atlas::{Style, TileAtlas, TileRegion};
pub use board::Board;
pub use catalog::PieceCatalog;
pub use error::{Error, Result};
pub use game::{GameConfig, GameCore, TickMode, TickOutcome};
pub use tetromino::{PieceKind, Shape, Tetromino};
