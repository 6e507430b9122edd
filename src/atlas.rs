//! Tile atlas: slices per-style sprite sheets into block tiles.
//!
//! A sheet is a vertical strip of square tiles, one per block color. Tile `n`
//! (1-based) covers rows `[(n - 1) * size, n * size)` where `size` is the sheet
//! width. Sheets are decoded on first use and every `(style, tile)` region is
//! computed once; later lookups are served from the cache.

use core::fmt;
use core::str::FromStr;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, RgbaImage, SubImage};
use log::debug;

use crate::error::{Error, Result};
use crate::sheet::SheetLoader;

/// Number of tiles in a sheet, one per piece color.
pub const TILE_COUNT: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    Style1,
    Style2,
    Style3,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Style1, Style::Style2, Style::Style3];

    pub fn name(self) -> &'static str {
        match self {
            Style::Style1 => "style1",
            Style::Style2 => "style2",
            Style::Style3 => "style3",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::Style1
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or(format!("unknown style: {}", s))
    }
}

/// A square region of a decoded sheet.
#[derive(Debug)]
pub struct TileRegion {
    sheet: Arc<DynamicImage>,
    x: u32,
    y: u32,
    size: u32,
}

impl TileRegion {
    fn slice(sheet: Arc<DynamicImage>, tile: u8) -> Option<Self> {
        let (width, height) = sheet.dimensions();
        let size = width;
        let y = u32::from(tile).checked_sub(1)?.checked_mul(size)?;

        if size == 0 || y.checked_add(size)? > height {
            return None;
        }

        Some(Self { sheet, x: 0, y, size })
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.size
    }

    pub fn height(&self) -> u32 {
        self.size
    }

    /// The sheet this region was cut from.
    pub fn sheet(&self) -> &Arc<DynamicImage> {
        &self.sheet
    }

    pub fn view(&self) -> SubImage<&DynamicImage> {
        self.sheet.view(self.x, self.y, self.size, self.size)
    }

    pub fn to_image(&self) -> RgbaImage {
        self.view().to_image()
    }
}

pub struct TileAtlas<L = Box<dyn SheetLoader>> {
    loader: L,
    sheets: HashMap<Style, Arc<DynamicImage>>,
    tiles: HashMap<(Style, u8), TileRegion>,
}

impl<L: SheetLoader> TileAtlas<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sheets: HashMap::new(),
            tiles: HashMap::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The region for block color `tile` (`1..=7`) in `style`'s sheet.
    pub fn tile(&mut self, style: Style, tile: u8) -> Result<&TileRegion> {
        if !(1..=TILE_COUNT).contains(&tile) {
            return Err(Error::NotFound { style, tile });
        }

        match self.tiles.entry((style, tile)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let sheet = Self::load_sheet(&mut self.sheets, &self.loader, style)?;
                let region =
                    TileRegion::slice(sheet, tile).ok_or(Error::NotFound { style, tile })?;

                debug!(
                    "Cached {} tile {} at ({}, {}) size {}",
                    style, tile, region.x, region.y, region.size
                );

                Ok(entry.insert(region))
            }
        }
    }

    /// Decodes `style`'s sheet now instead of on the first lookup.
    pub fn preload(&mut self, style: Style) -> Result<()> {
        Self::load_sheet(&mut self.sheets, &self.loader, style).map(|_| ())
    }

    /// Edge length of `style`'s tiles, decoding the sheet if needed.
    pub fn tile_size(&mut self, style: Style) -> Result<u32> {
        Self::load_sheet(&mut self.sheets, &self.loader, style).map(|sheet| sheet.width())
    }

    pub fn loaded_styles(&self) -> Vec<Style> {
        let mut styles: Vec<Style> = self.sheets.keys().copied().collect();
        styles.sort();
        styles
    }

    pub fn cached_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Drops every decoded sheet and cached region.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.sheets.clear();
    }

    fn load_sheet(
        sheets: &mut HashMap<Style, Arc<DynamicImage>>,
        loader: &L,
        style: Style,
    ) -> Result<Arc<DynamicImage>> {
        if let Some(sheet) = sheets.get(&style) {
            return Ok(Arc::clone(sheet));
        }

        let image = loader.load(style)?;
        let (width, height) = image.dimensions();

        if width == 0 || height < width {
            return Err(Error::AssetLoad {
                style,
                reason: format!("{}x{} sheet holds no square tiles", width, height),
            });
        }

        debug!("Loaded {} sheet ({}x{})", style, width, height);

        let sheet = Arc::new(image);
        sheets.insert(style, Arc::clone(&sheet));

        Ok(sheet)
    }
}
