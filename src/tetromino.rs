use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The seven standard four-cell pieces. The ordinal doubles as the block color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Board color, `1..=7`.
    pub fn color(self) -> u8 {
        self as u8 + 1
    }

    /// `None` for the empty color `0` and anything past `7`.
    pub fn from_color(color: u8) -> Option<Self> {
        Self::ALL.get(usize::from(color).checked_sub(1)?).copied()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for PieceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or(format!("unknown piece: {}", s))
    }
}

pub const SHAPE_SIZE: usize = 4;

/// A 4x4 occupancy matrix, row-major, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape([[bool; SHAPE_SIZE]; SHAPE_SIZE]);

impl Shape {
    pub const fn new(rows: [[bool; SHAPE_SIZE]; SHAPE_SIZE]) -> Self {
        Self(rows)
    }

    /// Builds a shape from `(column, row)` offsets inside the 4x4 box.
    pub const fn from_offsets(offsets: [(u8, u8); 4]) -> Self {
        let mut rows = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        let mut i = 0;

        while i < offsets.len() {
            let (x, y) = offsets[i];
            rows[y as usize][x as usize] = true;
            i += 1;
        }

        Self(rows)
    }

    /// Parses four rows of four characters; `#` or `X` is filled, `.` or space is empty.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        if rows.len() != SHAPE_SIZE {
            return Err(Error::Catalog(format!(
                "expected {} rows, got {}",
                SHAPE_SIZE,
                rows.len()
            )));
        }

        let mut shape = Self::default();

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();

            if row.chars().count() != SHAPE_SIZE {
                return Err(Error::Catalog(format!("row {:?} is not {} wide", row, SHAPE_SIZE)));
            }

            for (x, c) in row.chars().enumerate() {
                shape.0[y][x] = match c {
                    '#' | 'X' | 'x' => true,
                    '.' | ' ' => false,
                    other => {
                        return Err(Error::Catalog(format!("unexpected {:?} in row {:?}", other, row)))
                    }
                };
            }
        }

        Ok(shape)
    }

    pub fn rows(&self) -> [String; SHAPE_SIZE] {
        self.0.map(|row| row.iter().map(|&filled| if filled { '#' } else { '.' }).collect())
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < SHAPE_SIZE && y < SHAPE_SIZE && self.0[y][x]
    }

    /// Occupied `(column, row)` offsets, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SHAPE_SIZE)
            .flat_map(|y| (0..SHAPE_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| self.0[y][x])
    }

    pub fn is_empty(&self) -> bool {
        self.cells().next().is_none()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }

        Ok(())
    }
}

/// A piece in play: its rotation list, a rotation cursor and a board anchor.
///
/// The anchor is the board position of the shape box's top-left corner. It may
/// lie off the board as long as the filled cells don't.
#[derive(Debug, Clone)]
pub struct Tetromino {
    kind: PieceKind,
    rotations: Arc<[Shape]>,
    cursor: i64,
    position: (i32, i32),
}

impl Tetromino {
    pub fn new(kind: PieceKind, rotations: Arc<[Shape]>) -> Result<Self> {
        if rotations.is_empty() {
            return Err(Error::InvalidRotation(kind));
        }

        Ok(Self {
            kind,
            rotations,
            cursor: 0,
            position: (0, 0),
        })
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> u8 {
        self.kind.color()
    }

    /// Index of the current orientation, `cursor mod len`.
    pub fn rotation(&self) -> usize {
        self.cursor.rem_euclid(self.rotations.len() as i64) as usize
    }

    pub fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    pub fn shape(&self) -> &Shape {
        &self.rotations[self.rotation()]
    }

    pub fn default_shape(&self) -> &Shape {
        &self.rotations[0]
    }

    pub fn rotate(&mut self) {
        self.cursor = self.cursor.wrapping_add(1);
    }

    pub fn rotate_back(&mut self) {
        self.cursor = self.cursor.wrapping_sub(1);
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    /// A copy moved by `(dx, dy)`, or `None` if the anchor would overflow.
    pub fn shifted(&self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.position.0.checked_add(dx)?;
        let y = self.position.1.checked_add(dy)?;

        let mut moved = self.clone();
        moved.position = (x, y);
        Some(moved)
    }

    /// Board coordinates of the filled cells in the current orientation.
    /// Coordinates saturate, so anchors near the `i32` limits stay off the board.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (ax, ay) = self.position;

        self.shape()
            .cells()
            .map(move |(x, y)| (ax.saturating_add(x as i32), ay.saturating_add(y as i32)))
    }
}
