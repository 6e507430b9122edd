//! Piece catalogs.
//!
//! A catalog maps each [`PieceKind`] to its ordered list of orientations. It is
//! built once and shared with the game by `Arc`, so alternate catalogs (the
//! single-orientation prototype set, or one read from JSON) can be swapped in.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use enum_map::EnumMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tetromino::{PieceKind, Shape, Tetromino};

/// Four orientations per kind, clockwise from spawn, inside a 4x4 box.
const STANDARD: [(PieceKind, [[(u8, u8); 4]; 4]); 7] = [
    (
        PieceKind::I,
        [
            [(0, 1), (1, 1), (2, 1), (3, 1)],
            [(2, 0), (2, 1), (2, 2), (2, 3)],
            [(0, 2), (1, 2), (2, 2), (3, 2)],
            [(1, 0), (1, 1), (1, 2), (1, 3)],
        ],
    ),
    (
        PieceKind::J,
        [
            [(0, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (2, 2)],
            [(1, 0), (1, 1), (0, 2), (1, 2)],
        ],
    ),
    (
        PieceKind::L,
        [
            [(2, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (1, 2), (2, 2)],
            [(0, 1), (1, 1), (2, 1), (0, 2)],
            [(0, 0), (1, 0), (1, 1), (1, 2)],
        ],
    ),
    (
        PieceKind::O,
        [
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
        ],
    ),
    (
        PieceKind::S,
        [
            [(1, 0), (2, 0), (0, 1), (1, 1)],
            [(1, 0), (1, 1), (2, 1), (2, 2)],
            [(1, 1), (2, 1), (0, 2), (1, 2)],
            [(0, 0), (0, 1), (1, 1), (1, 2)],
        ],
    ),
    (
        PieceKind::T,
        [
            [(1, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (2, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (1, 2)],
            [(1, 0), (0, 1), (1, 1), (1, 2)],
        ],
    ),
    (
        PieceKind::Z,
        [
            [(0, 0), (1, 0), (1, 1), (2, 1)],
            [(2, 0), (1, 1), (2, 1), (1, 2)],
            [(0, 1), (1, 1), (1, 2), (2, 2)],
            [(1, 0), (0, 1), (1, 1), (0, 2)],
        ],
    ),
];

/// The early single-orientation set: rotating these is a visual no-op.
const MINIMAL: [(PieceKind, [(u8, u8); 4]); 7] = [
    (PieceKind::I, [(0, 0), (0, 1), (0, 2), (0, 3)]),
    (PieceKind::J, [(1, 0), (1, 1), (0, 2), (1, 2)]),
    (PieceKind::L, [(0, 0), (0, 1), (0, 2), (1, 2)]),
    (PieceKind::O, [(0, 1), (1, 1), (0, 2), (1, 2)]),
    (PieceKind::S, [(1, 1), (2, 1), (0, 2), (1, 2)]),
    (PieceKind::T, [(0, 0), (1, 0), (2, 0), (1, 1)]),
    (PieceKind::Z, [(0, 1), (1, 1), (1, 2), (2, 2)]),
];

#[derive(Debug, Clone)]
pub struct PieceCatalog {
    pieces: EnumMap<PieceKind, Option<Arc<[Shape]>>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    pieces: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogEntry {
    kind: PieceKind,
    rotations: Vec<Vec<String>>,
}

impl PieceCatalog {
    /// Builds a catalog; every listed kind needs at least one orientation.
    pub fn new<I>(pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PieceKind, Vec<Shape>)>,
    {
        let mut map: EnumMap<PieceKind, Option<Arc<[Shape]>>> = EnumMap::default();

        for (kind, rotations) in pieces {
            if rotations.is_empty() {
                return Err(Error::InvalidRotation(kind));
            }

            map[kind] = Some(rotations.into());
        }

        if map.values().all(Option::is_none) {
            return Err(Error::Catalog("no pieces defined".to_string()));
        }

        Ok(Self { pieces: map })
    }

    pub fn standard() -> Self {
        Self {
            pieces: Self::table(STANDARD.iter().map(|(kind, rotations)| {
                (*kind, rotations.iter().map(|&o| Shape::from_offsets(o)).collect())
            })),
        }
    }

    pub fn minimal() -> Self {
        Self {
            pieces: Self::table(
                MINIMAL
                    .iter()
                    .map(|&(kind, offsets)| (kind, vec![Shape::from_offsets(offsets)])),
            ),
        }
    }

    fn table<I>(pieces: I) -> EnumMap<PieceKind, Option<Arc<[Shape]>>>
    where
        I: Iterator<Item = (PieceKind, Vec<Shape>)>,
    {
        let mut map = EnumMap::default();

        for (kind, rotations) in pieces {
            map[kind] = Some(Arc::from(rotations));
        }

        map
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))?;

        Self::from_file(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_reader(reader).map_err(|e| Error::Catalog(e.to_string()))?;

        Self::from_file(file)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Catalog(format!("failed to open {}: {}", path.display(), e)))?;

        debug!("Loading piece catalog from {}", path.display());

        Self::from_reader(BufReader::new(file))
    }

    fn from_file(file: CatalogFile) -> Result<Self> {
        let mut pieces = Vec::with_capacity(file.pieces.len());

        for entry in file.pieces {
            let rotations = entry
                .rotations
                .iter()
                .map(|rows| Shape::parse(rows.as_slice()))
                .collect::<Result<Vec<_>>>()?;

            pieces.push((entry.kind, rotations));
        }

        Self::new(pieces)
    }

    pub fn to_json(&self) -> Result<String> {
        let file = CatalogFile {
            pieces: self
                .pieces
                .iter()
                .filter_map(|(kind, rotations)| {
                    let rotations = rotations.as_ref()?;

                    Some(CatalogEntry {
                        kind,
                        rotations: rotations.iter().map(|s| s.rows().to_vec()).collect(),
                    })
                })
                .collect(),
        };

        serde_json::to_string_pretty(&file).map_err(|e| Error::Catalog(e.to_string()))
    }

    /// Kinds present in the catalog, in color order.
    pub fn kinds(&self) -> Vec<PieceKind> {
        self.pieces
            .iter()
            .filter(|(_, rotations)| rotations.is_some())
            .map(|(kind, _)| kind)
            .collect()
    }

    pub fn rotations(&self, kind: PieceKind) -> Option<&Arc<[Shape]>> {
        self.pieces[kind].as_ref()
    }

    /// A fresh piece of `kind` at rotation 0, anchored at the origin.
    pub fn spawn(&self, kind: PieceKind) -> Result<Tetromino> {
        let rotations = self
            .rotations(kind)
            .ok_or_else(|| Error::Catalog(format!("piece {} is not in the catalog", kind)))?;

        Tetromino::new(kind, Arc::clone(rotations))
    }
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
