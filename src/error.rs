use crate::atlas::Style;
use crate::tetromino::PieceKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i64, y: i64 },

    #[error("{0} is not a block color")]
    InvalidColor(u8),

    #[error("no tile {tile} in {style} sheet")]
    NotFound { style: Style, tile: u8 },

    #[error("failed to load {style} sheet: {reason}")]
    AssetLoad { style: Style, reason: String },

    #[error("piece {0} has no rotations")]
    InvalidRotation(PieceKind),

    #[error("invalid piece catalog: {0}")]
    Catalog(String),
}
