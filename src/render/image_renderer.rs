use super::{RenderEvent, Renderer};
use crate::atlas::{Style, TileAtlas};
use crate::board::EMPTY;
use crate::game::GameCore;
use crate::sheet::SheetLoader;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;

const BACKGROUND: Rgba<u8> = Rgba([0x20, 0x20, 0x20, 0xff]);
const PLAYFIELD: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);
const PLACEHOLDER: Rgba<u8> = Rgba([0xff, 0x00, 0xff, 0xff]);

/// Composites the board into an image and saves the last frame to disk
pub struct ImageRenderer {
    output_path: Option<PathBuf>,
    style: Style,
    cell_size: u32,
    margin: u32,
    scaled: HashMap<(Style, u8), RgbaImage>,
    canvas: Option<RgbaImage>,
    frames: usize,
}

impl ImageRenderer {
    pub fn new(output_path: Option<PathBuf>, style: Style, cell_size: u32) -> Self {
        Self {
            output_path,
            style,
            cell_size: cell_size.max(1),
            margin: 0,
            scaled: HashMap::new(),
            canvas: None,
            frames: 0,
        }
    }

    /// Border of background color around the playfield, in pixels
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.canvas.as_ref()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The tile for `color`, scaled to the cell size. Failed lookups get a flat
    /// placeholder so one bad asset doesn't stop the frame.
    fn cell_image<L: SheetLoader>(&mut self, atlas: &mut TileAtlas<L>, color: u8) -> &RgbaImage {
        let (style, size) = (self.style, self.cell_size);

        self.scaled.entry((style, color)).or_insert_with(|| match atlas.tile(style, color) {
            Ok(region) => imageops::resize(&*region.view(), size, size, FilterType::Nearest),
            Err(e) => {
                warn!("Drawing placeholder for color {}: {}", color, e);
                RgbaImage::from_pixel(size, size, PLACEHOLDER)
            }
        })
    }
}

/// Pixel size of a `columns` x `rows` board, or `None` if it overflows.
fn canvas_size(columns: u32, rows: u32, cell: u32, margin: u32) -> Option<(u32, u32)> {
    let border = margin.checked_mul(2)?;
    let width = columns.checked_mul(cell)?.checked_add(border)?;
    let height = rows.checked_mul(cell)?.checked_add(border)?;

    Some((width, height))
}

impl<L: SheetLoader> Renderer<L> for ImageRenderer {
    type Error = String;

    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        if let RenderEvent::Completed = event {
            info!("Rendered {} frames", self.frames);
        }

        Ok(())
    }

    fn draw(&mut self, game: &GameCore, atlas: &mut TileAtlas<L>) -> Result<(), Self::Error> {
        let board = game.composite().map_err(|e| e.to_string())?;
        let cell = self.cell_size;
        let margin = self.margin;

        let (width, height) = canvas_size(board.width() as u32, board.height() as u32, cell, margin)
            .ok_or_else(|| format!("Canvas for {} px cells with {} px margin is too large", cell, margin))?;

        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let inside_x = x >= margin && x < margin + board.width() as u32 * cell;
            let inside_y = y >= margin && y < margin + board.height() as u32 * cell;

            if inside_x && inside_y {
                *pixel = PLAYFIELD;
            }
        }

        for (x, y, color) in &board {
            if color == EMPTY {
                continue;
            }

            let tile = self.cell_image(atlas, color);

            imageops::overlay(
                &mut canvas,
                tile,
                i64::from(margin + x as u32 * cell),
                i64::from(margin + y as u32 * cell),
            );
        }

        self.canvas = Some(canvas);
        self.frames += 1;

        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Self::Error> {
        if let (Some(path), Some(image)) = (&self.output_path, &self.canvas) {
            image
                .save(path)
                .map_err(|e| format!("Failed to save image: {}", e))?;

            info!("Saved {}", path.display());
        }

        Ok(())
    }
}
