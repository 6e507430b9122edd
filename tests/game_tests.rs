use std::sync::Arc;

use blockfall::board::{BOARD_HEIGHT, BOARD_WIDTH, EMPTY};
use blockfall::render::{ImageRenderer, Renderer};
use blockfall::sheet::PaletteLoader;
use blockfall::{
    GameConfig, GameCore, PieceCatalog, PieceKind, Shape, Style, TickMode, TickOutcome, TileAtlas,
};

/// Catalog with only the O piece, so spawns are predictable.
fn o_only() -> Arc<PieceCatalog> {
    let square = Shape::from_offsets([(1, 0), (2, 0), (1, 1), (2, 1)]);

    Arc::new(PieceCatalog::new([(PieceKind::O, vec![square])]).unwrap())
}

fn falling(catalog: Arc<PieceCatalog>) -> GameCore {
    GameCore::new(catalog, GameConfig::default())
}

#[test]
fn test_first_tick_spawns() {
    let mut game = falling(o_only());

    assert!(game.active().is_none());
    assert_eq!(game.tick().unwrap(), TickOutcome::Spawned(PieceKind::O));

    let piece = game.active().unwrap();
    assert_eq!(piece.position(), (3, 0));
    assert_eq!(piece.cells().collect::<Vec<_>>(), vec![(4, 0), (5, 0), (4, 1), (5, 1)]);

    // The board itself holds only locked blocks
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.composite().unwrap().occupied(), 4);
}

#[test]
fn test_piece_falls_and_locks_on_floor() {
    let mut game = falling(o_only());

    game.tick().unwrap();

    // Rows 0-1 down to rows 18-19 takes 18 falls
    for _ in 0..18 {
        assert_eq!(game.tick().unwrap(), TickOutcome::Fell);
    }

    assert_eq!(game.tick().unwrap(), TickOutcome::Locked { cleared: 0 });
    assert!(game.active().is_none());
    assert_eq!(game.pieces_locked(), 1);

    let color = PieceKind::O.color();
    for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
        assert_eq!(game.board().get(x, y).unwrap(), color);
    }

    assert_eq!(game.ticks(), 20);
}

#[test]
fn test_pieces_stack() {
    let mut game = falling(o_only());

    while game.pieces_locked() < 2 {
        game.tick().unwrap();
    }

    assert_eq!(game.board().get(4, 16).unwrap(), PieceKind::O.color());
    assert_eq!(game.board().occupied(), 8);
}

#[test]
fn test_full_row_clears_on_lock() {
    let mut game = falling(o_only());

    // Fill the bottom two rows except where the square lands
    for y in [18, 19] {
        for x in 0..BOARD_WIDTH as i32 {
            if x != 4 && x != 5 {
                game.board_mut().set(x, y, 1).unwrap();
            }
        }
    }
    game.board_mut().set(0, 17, 2).unwrap();

    let outcome = loop {
        match game.tick().unwrap() {
            TickOutcome::Locked { cleared } => break cleared,
            TickOutcome::GameOver => panic!("unexpected game over"),
            _ => {}
        }
    };

    assert_eq!(outcome, 2);
    assert_eq!(game.lines_cleared(), 2);
    assert_eq!(game.board().occupied(), 1);
    assert_eq!(game.board().get(0, 19).unwrap(), 2);
}

#[test]
fn test_blocked_spawn_ends_game() {
    let mut game = falling(o_only());
    game.board_mut().set(4, 0, 3).unwrap();

    assert_eq!(game.tick().unwrap(), TickOutcome::GameOver);
    assert!(game.is_over());

    let before = game.board().clone();
    for _ in 0..5 {
        assert_eq!(game.tick().unwrap(), TickOutcome::GameOver);
    }
    assert_eq!(game.board(), &before);
    assert!(!game.shift(1));

    game.reset();
    assert!(!game.is_over());
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.tick().unwrap(), TickOutcome::Spawned(PieceKind::O));
}

#[test]
fn test_game_runs_to_game_over() {
    let mut game = GameCore::new(
        Arc::new(PieceCatalog::standard()),
        GameConfig {
            seed: 7,
            ..GameConfig::default()
        },
    );

    let mut ticks = 0;
    while !game.is_over() && ticks < 10_000 {
        game.tick().unwrap();
        ticks += 1;

        // Locked cells never leave the board or hold a non-color
        assert!(game
            .board()
            .cells()
            .all(|(x, y, color)| x < BOARD_WIDTH && y < BOARD_HEIGHT && color <= 7));
    }

    assert!(game.is_over());
    assert!(game.pieces_locked() > 0);
}

#[test]
fn test_same_seed_same_game() {
    let run = |seed| {
        let mut game = GameCore::new(
            Arc::new(PieceCatalog::standard()),
            GameConfig {
                seed,
                ..GameConfig::default()
            },
        );

        (0..300)
            .map(|_| game.tick().unwrap())
            .filter_map(|outcome| match outcome {
                TickOutcome::Spawned(kind) => Some(kind),
                _ => None,
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn test_shift_and_rotate() {
    let mut game = GameCore::new(Arc::new(PieceCatalog::standard()), GameConfig::default());

    // Nothing to move before the first spawn
    assert!(!game.shift(1));
    assert!(!game.rotate());

    assert!(game.spawn_kind(PieceKind::I).unwrap());
    assert_eq!(game.active().unwrap().position(), (3, 0));

    assert!(game.shift(-1));
    assert_eq!(game.active().unwrap().position(), (2, 0));

    // Horizontal I sits in columns 2..=5; shifting past the wall fails
    assert!(game.shift(-2));
    assert!(!game.shift(-1));
    assert_eq!(game.active().unwrap().position(), (0, 0));

    assert!(game.rotate());
    assert_eq!(game.active().unwrap().rotation(), 1);
    assert!(game.rotate_back());
    assert_eq!(game.active().unwrap().rotation(), 0);
}

#[test]
fn test_huge_shift_is_rejected() {
    let mut game = GameCore::new(Arc::new(PieceCatalog::standard()), GameConfig::default());
    assert!(game.spawn_kind(PieceKind::I).unwrap());

    assert!(!game.shift(i32::MAX));
    assert!(!game.shift(i32::MIN));
    assert_eq!(game.active().unwrap().position(), (3, 0));

    // The piece is still live after the rejected moves
    assert_eq!(game.tick().unwrap(), TickOutcome::Fell);
}

#[test]
fn test_rotation_blocked_by_wall() {
    let mut game = GameCore::new(Arc::new(PieceCatalog::standard()), GameConfig::default());
    assert!(game.spawn_kind(PieceKind::I).unwrap());

    // Vertical I (east orientation) occupies box column 2
    assert!(game.rotate());
    assert!(game.shift(4));
    assert_eq!(game.active().unwrap().cells().next(), Some((9, 0)));

    // Back to horizontal would need columns 7..=10
    assert!(!game.rotate_back());
    assert_eq!(game.active().unwrap().rotation(), 1);
}

#[test]
fn test_pattern_mode() {
    let mut game = GameCore::new(
        o_only(),
        GameConfig {
            mode: TickMode::Pattern,
            ..GameConfig::default()
        },
    );

    assert_eq!(game.tick().unwrap(), TickOutcome::Recolored);
    assert_eq!(game.board().occupied(), BOARD_WIDTH * BOARD_HEIGHT);
    assert_eq!(game.board().get(0, 0).unwrap(), 1);
    assert_eq!(game.board().get(2, 1).unwrap(), 4);

    game.tick().unwrap();
    assert_eq!(game.board().get(0, 0).unwrap(), 2);
    assert!(game.active().is_none());
}

#[test]
fn test_render_single_block() {
    let mut game = falling(o_only());
    game.board_mut().set(3, 5, 2).unwrap();

    let occupied: Vec<_> = game.board().cells().filter(|&(_, _, c)| c != EMPTY).collect();
    assert_eq!(occupied, vec![(3, 5, 2)]);

    let mut atlas = TileAtlas::new(PaletteLoader::new(8));
    let mut renderer = ImageRenderer::new(None, Style::Style1, 4);

    renderer.draw(&game, &mut atlas).unwrap();

    let frame = renderer.image().unwrap();
    assert_eq!(frame.dimensions(), (40, 80));

    // The block's cell is drawn from tile 2, everything else is playfield black
    let expected = {
        let tile = atlas.tile(Style::Style1, 2).unwrap().to_image();
        image::imageops::resize(&tile, 4, 4, image::imageops::FilterType::Nearest)
    };
    for dy in 0..4 {
        for dx in 0..4 {
            assert_eq!(frame.get_pixel(12 + dx, 20 + dy), expected.get_pixel(dx, dy));
        }
    }
    assert_eq!(frame.get_pixel(0, 0), &image::Rgba([0, 0, 0, 0xff]));
    assert_eq!(atlas.cached_tiles(), 1);
}

#[test]
fn test_render_oversized_canvas_is_an_error() {
    let game = falling(o_only());
    let mut atlas = TileAtlas::new(PaletteLoader::new(8));

    let mut huge_cells = ImageRenderer::new(None, Style::Style1, u32::MAX / 4);
    assert!(huge_cells.draw(&game, &mut atlas).is_err());

    let mut huge_margin = ImageRenderer::new(None, Style::Style1, 4).with_margin(u32::MAX);
    assert!(huge_margin.draw(&game, &mut atlas).is_err());

    assert!(huge_margin.image().is_none());
    assert_eq!(huge_margin.frames(), 0);
}

#[test]
fn test_render_invalid_style_uses_placeholder() {
    use blockfall::sheet::SheetLoader;
    use blockfall::{Error, Result};
    use image::DynamicImage;

    struct Missing;

    impl SheetLoader for Missing {
        fn load(&self, style: Style) -> Result<DynamicImage> {
            Err(Error::AssetLoad {
                style,
                reason: "no such file".to_string(),
            })
        }
    }

    let mut game = falling(o_only());
    game.board_mut().set(0, 0, 1).unwrap();

    let mut atlas = TileAtlas::new(Missing);
    let mut renderer = ImageRenderer::new(None, Style::Style2, 2);

    assert!(renderer.draw(&game, &mut atlas).is_ok());
    assert_eq!(renderer.frames(), 1);
    assert_eq!(
        renderer.image().unwrap().get_pixel(0, 0),
        &image::Rgba([0xff, 0x00, 0xff, 0xff])
    );
}
