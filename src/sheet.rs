use image::io::Reader as ImageReader;
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use std::path::PathBuf;

use crate::atlas::{Style, TILE_COUNT};
use crate::error::{Error, Result};

/// Source of decoded sprite sheets, one per style.
pub trait SheetLoader {
    fn load(&self, style: Style) -> Result<DynamicImage>;
}

impl SheetLoader for Box<dyn SheetLoader> {
    fn load(&self, style: Style) -> Result<DynamicImage> {
        self.as_ref().load(style)
    }
}

/// Reads `<dir>/<style>.png`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, style: Style) -> PathBuf {
        self.dir.join(format!("{}.png", style))
    }
}

impl SheetLoader for DirectoryLoader {
    fn load(&self, style: Style) -> Result<DynamicImage> {
        let path = self.path(style);
        let asset_error = |reason: String| Error::AssetLoad { style, reason };

        debug!("Decoding {}", path.display());

        let image = ImageReader::open(&path)
            .map_err(|e| asset_error(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| asset_error(format!("{}: {}", path.display(), e)))?;

        Ok(image)
    }
}

const PALETTES: [[[u8; 3]; TILE_COUNT as usize]; 3] = [
    [
        [0x00, 0xd8, 0xe8],
        [0x20, 0x40, 0xe0],
        [0xf0, 0x90, 0x10],
        [0xf0, 0xd8, 0x10],
        [0x30, 0xc8, 0x40],
        [0xa0, 0x30, 0xd0],
        [0xe0, 0x28, 0x28],
    ],
    [
        [0x7f, 0xdb, 0xda],
        [0x6c, 0x8e, 0xbf],
        [0xff, 0xb3, 0x47],
        [0xfd, 0xfd, 0x96],
        [0x77, 0xdd, 0x77],
        [0xc3, 0xb1, 0xe1],
        [0xff, 0x69, 0x61],
    ],
    [
        [0xe0, 0xe0, 0xe0],
        [0x40, 0x40, 0x40],
        [0xa0, 0xa0, 0xa0],
        [0xf8, 0xf8, 0xf8],
        [0x80, 0x80, 0x80],
        [0x60, 0x60, 0x60],
        [0xc0, 0xc0, 0xc0],
    ],
];

/// Draws flat-colored sheets in memory, so no asset files are needed.
#[derive(Debug, Clone, Copy)]
pub struct PaletteLoader {
    tile_size: u32,
}

impl PaletteLoader {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

impl Default for PaletteLoader {
    fn default() -> Self {
        Self::new(32)
    }
}

impl SheetLoader for PaletteLoader {
    fn load(&self, style: Style) -> Result<DynamicImage> {
        let size = self.tile_size;
        let border = (size / 8).max(1);
        let palette = &PALETTES[style.index()];

        let height = size
            .checked_mul(u32::from(TILE_COUNT))
            .ok_or_else(|| Error::AssetLoad {
                style,
                reason: format!("{} px tiles don't fit in one sheet", size),
            })?;

        let sheet = RgbaImage::from_fn(size, height, |x, y| {
            let [r, g, b] = palette[(y / size) as usize];
            let (ty, edge) = (y % size, size - border);

            if x < border || x >= edge || ty < border || ty >= edge {
                Rgba([r / 2, g / 2, b / 2, 0xff])
            } else {
                Rgba([r, g, b, 0xff])
            }
        });

        Ok(DynamicImage::ImageRgba8(sheet))
    }
}
