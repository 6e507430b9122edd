use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::board::{Board, MAX_COLOR};
use crate::catalog::PieceCatalog;
use crate::error::{Error, Result};
use crate::tetromino::{PieceKind, Tetromino};

/// What a tick does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    /// Pieces spawn, fall one row per tick, lock and clear rows.
    #[default]
    Falling,
    /// Recolors every cell in a moving diagonal pattern; no pieces.
    Pattern,
}

impl FromStr for TickMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "falling" => Ok(TickMode::Falling),
            "pattern" => Ok(TickMode::Pattern),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

impl fmt::Display for TickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickMode::Falling => f.write_str("falling"),
            TickMode::Pattern => f.write_str("pattern"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub mode: TickMode,
    pub seed: u64,
    /// Anchor of a freshly spawned piece's shape box.
    pub spawn: (i32, i32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: TickMode::default(),
            seed: 0,
            spawn: (3, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Spawned(PieceKind),
    Fell,
    Locked { cleared: usize },
    Recolored,
    GameOver,
}

pub struct GameCore {
    board: Board,
    catalog: Arc<PieceCatalog>,
    kinds: Vec<PieceKind>,
    config: GameConfig,
    active: Option<Tetromino>,
    rng: XorShiftRng,
    ticks: u64,
    pieces_locked: u64,
    lines_cleared: u64,
    over: bool,
}

impl GameCore {
    pub fn new(catalog: Arc<PieceCatalog>, config: GameConfig) -> Self {
        let kinds = catalog.kinds();

        Self {
            board: Board::new(),
            catalog,
            kinds,
            config,
            active: None,
            rng: XorShiftRng::seed_from_u64(config.seed),
            ticks: 0,
            pieces_locked: 0,
            lines_cleared: 0,
            over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scripted setups; placement rules are not checked.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn catalog(&self) -> &Arc<PieceCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }

    pub fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    /// Advances the game by exactly one step.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.over {
            return Ok(TickOutcome::GameOver);
        }

        let outcome = match self.config.mode {
            TickMode::Falling => self.step_falling()?,
            TickMode::Pattern => self.step_pattern()?,
        };

        self.ticks += 1;
        trace!("Tick {}: {:?}", self.ticks, outcome);

        Ok(outcome)
    }

    fn step_pattern(&mut self) -> Result<TickOutcome> {
        let phase = (self.ticks % u64::from(MAX_COLOR)) as usize;

        self.board
            .repaint(|x, y| ((x + y + phase) % usize::from(MAX_COLOR)) as u8 + 1)?;

        Ok(TickOutcome::Recolored)
    }

    fn step_falling(&mut self) -> Result<TickOutcome> {
        let piece = match self.active.take() {
            None => return self.spawn(),
            Some(piece) => piece,
        };

        if let Some(fallen) = piece.shifted(0, 1).filter(|fallen| self.board.fits(fallen)) {
            self.active = Some(fallen);
            return Ok(TickOutcome::Fell);
        }

        self.board.lock(&piece)?;
        self.pieces_locked += 1;

        let cleared = self.board.clear_full_rows();
        self.lines_cleared += cleared as u64;

        if cleared > 0 {
            debug!("{} cleared {} rows", piece.kind(), cleared);
        }

        Ok(TickOutcome::Locked { cleared })
    }

    fn spawn(&mut self) -> Result<TickOutcome> {
        let kind = *self
            .kinds
            .choose(&mut self.rng)
            .ok_or_else(|| Error::Catalog("no pieces to spawn".to_string()))?;

        let mut piece = self.catalog.spawn(kind)?;
        let (x, y) = self.config.spawn;
        piece.set_position(x, y);

        if !self.board.fits(&piece) {
            info!(
                "Game over after {} pieces, {} lines",
                self.pieces_locked, self.lines_cleared
            );
            self.over = true;
            return Ok(TickOutcome::GameOver);
        }

        self.active = Some(piece);

        Ok(TickOutcome::Spawned(kind))
    }

    /// Places `kind` as the active piece at the spawn anchor, replacing any
    /// current one. Returns `false` (and leaves no active piece) if it doesn't fit.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> Result<bool> {
        let mut piece = self.catalog.spawn(kind)?;
        let (x, y) = self.config.spawn;
        piece.set_position(x, y);

        let fits = self.board.fits(&piece);
        self.active = fits.then_some(piece);

        Ok(fits)
    }

    /// Moves the active piece sideways if the target is free and on the board.
    pub fn shift(&mut self, dx: i32) -> bool {
        self.try_update(|piece| piece.shifted(dx, 0))
    }

    pub fn rotate(&mut self) -> bool {
        self.try_update(|piece| {
            let mut rotated = piece.clone();
            rotated.rotate();
            Some(rotated)
        })
    }

    pub fn rotate_back(&mut self) -> bool {
        self.try_update(|piece| {
            let mut rotated = piece.clone();
            rotated.rotate_back();
            Some(rotated)
        })
    }

    fn try_update<F: FnOnce(&Tetromino) -> Option<Tetromino>>(&mut self, update: F) -> bool {
        if self.over {
            return false;
        }

        let candidate = match self.active.as_ref().and_then(update) {
            Some(piece) => piece,
            None => return false,
        };

        if self.board.fits(&candidate) {
            self.active = Some(candidate);
            true
        } else {
            false
        }
    }

    /// The board with the active piece drawn in.
    pub fn composite(&self) -> Result<Board> {
        let mut board = self.board.clone();

        if let Some(piece) = &self.active {
            board.lock(piece)?;
        }

        Ok(board)
    }

    /// Starts a new session with the same catalog and seed.
    pub fn reset(&mut self) {
        self.board.reset();
        self.active = None;
        self.rng = XorShiftRng::seed_from_u64(self.config.seed);
        self.ticks = 0;
        self.pieces_locked = 0;
        self.lines_cleared = 0;
        self.over = false;
    }
}
