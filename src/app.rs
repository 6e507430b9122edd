use crate::cli::{AppConfig, SheetSource};

use blockfall::render::{ImageRenderer, RenderEvent, Renderer};
use blockfall::sheet::{DirectoryLoader, PaletteLoader, SheetLoader};
use blockfall::{GameCore, TickOutcome, TileAtlas};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::sync::Arc;
use std::time::Duration;

pub struct BlockfallApp {
    config: AppConfig,
}

impl BlockfallApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let AppConfig {
            sheets,
            catalog,
            game,
            ticks,
            renderer: render_config,
        } = self.config;

        let loader: Box<dyn SheetLoader> = match sheets {
            SheetSource::Directory(dir) => {
                info!("Loading sheets from {}", dir.display());
                Box::new(DirectoryLoader::new(dir))
            }
            SheetSource::Palette(size) => {
                info!("Using generated {}px sheets", size);
                Box::new(PaletteLoader::new(size))
            }
        };

        let mut atlas = TileAtlas::new(loader);

        // Decode up front so a missing sheet fails before the loop starts
        atlas.preload(render_config.style)?;

        info!(
            "Catalog: {} pieces, mode {}, seed {}",
            catalog.kinds().len(),
            game.mode,
            game.seed
        );

        let mut core = GameCore::new(Arc::new(catalog), game);

        let mut renderers: Vec<Box<dyn Renderer<Box<dyn SheetLoader>, Error = String>>> = Vec::new();

        let image_renderer = ImageRenderer::new(
            render_config.output_path.clone(),
            render_config.style,
            render_config.cell_size,
        )
        .with_margin(render_config.margin);
        renderers.push(Box::new(image_renderer));

        for renderer in &mut renderers {
            renderer.initialize(&mut atlas)?;
            renderer.handle_event(&RenderEvent::Started)?;
            renderer.draw(&core, &mut atlas)?;
        }

        // Progress bar
        let progress = ProgressBar::new(ticks);
        progress.enable_steady_tick(Duration::from_millis(200));
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len} {per_sec:>12}")?
                .progress_chars("#>-"),
        );

        // Main loop: one tick, then one draw pass
        for _ in 0..ticks {
            if renderers.iter_mut().any(|r| r.should_quit()) {
                break;
            }

            let outcome = core.tick()?;

            if render_config.debug {
                info!(
                    "tick {} {:?}: {} cells occupied, {} lines, {} tiles cached",
                    core.ticks(),
                    outcome,
                    core.board().occupied(),
                    core.lines_cleared(),
                    atlas.cached_tiles()
                );
            }

            let event = RenderEvent::Ticked(outcome);

            for renderer in &mut renderers {
                renderer.handle_event(&event)?;
                renderer.draw(&core, &mut atlas)?;
            }

            progress.inc(1);

            if outcome == TickOutcome::GameOver {
                break;
            }
        }

        progress.finish();

        for renderer in &mut renderers {
            renderer.handle_event(&RenderEvent::Completed)?;
            renderer.finalize()?;
        }

        info!(
            "Finished after {} ticks: {} pieces locked, {} lines cleared{}",
            core.ticks(),
            core.pieces_locked(),
            core.lines_cleared(),
            if core.is_over() { ", game over" } else { "" }
        );

        Ok(())
    }
}
