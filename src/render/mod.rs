pub mod events;

pub mod image_renderer;

pub use events::RenderEvent;
pub use image_renderer::ImageRenderer;

use crate::atlas::TileAtlas;
use crate::game::GameCore;
use crate::sheet::SheetLoader;

/// Consumer of board state; reads cells and asks the atlas for their tiles.
pub trait Renderer<L: SheetLoader> {
    type Error;

    /// Called once before the first tick
    fn initialize(&mut self, atlas: &mut TileAtlas<L>) -> Result<(), Self::Error> {
        let _ = atlas;
        Ok(())
    }

    /// Handle an event from the tick loop
    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }

    /// Draw the current game state
    fn draw(&mut self, game: &GameCore, atlas: &mut TileAtlas<L>) -> Result<(), Self::Error>;

    /// Check if the renderer wants the loop to stop
    fn should_quit(&mut self) -> bool {
        false
    }

    /// Finalize rendering (e.g., save to file)
    fn finalize(&mut self) -> Result<(), Self::Error>;
}
