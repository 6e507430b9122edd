use std::sync::Arc;

use blockfall::board::{Board, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};
use blockfall::{Error, PieceCatalog, PieceKind, Shape, Tetromino};

fn piece(kind: PieceKind, offsets: [(u8, u8); 4], x: i32, y: i32) -> Tetromino {
    let rotations: Arc<[Shape]> = Arc::from(vec![Shape::from_offsets(offsets)]);
    let mut piece = Tetromino::new(kind, rotations).unwrap();
    piece.set_position(x, y);
    piece
}

#[test]
fn test_new_board_is_empty() {
    let board = Board::new();

    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert_eq!(board.occupied(), 0);

    for y in 0..BOARD_HEIGHT as i32 {
        for x in 0..BOARD_WIDTH as i32 {
            assert_eq!(board.get(x, y).unwrap(), EMPTY);
        }
    }
}

#[test]
fn test_set_get_round_trip() {
    let mut board = Board::new();

    for y in 0..BOARD_HEIGHT as i32 {
        for x in 0..BOARD_WIDTH as i32 {
            let color = ((x + y) % 8) as u8;
            board.set(x, y, color).unwrap();
            assert_eq!(board.get(x, y).unwrap(), color);
        }
    }
}

#[test]
fn test_out_of_bounds() {
    let mut board = Board::new();
    let outside = [(-1, 0), (0, -1), (10, 0), (0, 20), (10, 20), (-5, 30), (i32::MIN, i32::MAX)];

    for (x, y) in outside {
        assert!(
            matches!(board.get(x, y), Err(Error::OutOfBounds { .. })),
            "get({}, {}) should fail",
            x,
            y
        );
        assert!(
            matches!(board.set(x, y, 1), Err(Error::OutOfBounds { .. })),
            "set({}, {}) should fail",
            x,
            y
        );
    }

    assert_eq!(board.occupied(), 0);
}

#[test]
fn test_set_rejects_non_color() {
    let mut board = Board::new();

    assert!(matches!(board.set(0, 0, 8), Err(Error::InvalidColor(8))));
    assert_eq!(board.get(0, 0).unwrap(), EMPTY);
}

#[test]
fn test_cells_single_block() {
    let mut board = Board::new();
    board.set(3, 5, 2).unwrap();

    let occupied: Vec<_> = board.cells().filter(|&(_, _, color)| color != EMPTY).collect();
    assert_eq!(occupied, vec![(3, 5, 2)]);

    // The traversal covers every cell, row-major, and can be repeated
    let all: Vec<_> = board.cells().collect();
    assert_eq!(all.len(), BOARD_WIDTH * BOARD_HEIGHT);
    assert_eq!(all[0], (0, 0, 0));
    assert_eq!(all[1], (1, 0, 0));
    assert_eq!(all[BOARD_WIDTH], (0, 1, 0));
    assert_eq!(all[5 * BOARD_WIDTH + 3], (3, 5, 2));
    assert_eq!(board.cells().count(), all.len());
    assert_eq!((&board).into_iter().count(), all.len());
}

#[test]
fn test_fits_and_lock() {
    let mut board = Board::new();
    let square = piece(PieceKind::O, [(0, 0), (1, 0), (0, 1), (1, 1)], 4, 18);

    assert!(board.fits(&square));
    board.lock(&square).unwrap();

    assert_eq!(board.occupied(), 4);
    assert_eq!(board.get(4, 18).unwrap(), PieceKind::O.color());
    assert_eq!(board.get(5, 19).unwrap(), PieceKind::O.color());
    assert!(!board.fits(&square));
}

#[test]
fn test_lock_is_all_or_nothing() {
    let mut board = Board::new();
    // Bottom half hangs below the floor
    let square = piece(PieceKind::O, [(0, 0), (1, 0), (0, 1), (1, 1)], 0, 19);

    assert!(!board.fits(&square));
    assert!(matches!(board.lock(&square), Err(Error::OutOfBounds { .. })));
    assert_eq!(board.occupied(), 0);
}

#[test]
fn test_shape_box_may_hang_off_board() {
    let board = Board::new();
    // Filled cells sit in the box's right column, the box starts at x = -1
    let bar = piece(PieceKind::I, [(1, 0), (1, 1), (1, 2), (1, 3)], -1, 0);

    assert!(board.fits(&bar));
    assert_eq!(bar.cells().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_clear_full_rows() {
    let mut board = Board::new();

    for x in 0..BOARD_WIDTH as i32 {
        board.set(x, 19, 1).unwrap();
        board.set(x, 17, 2).unwrap();
    }
    board.set(0, 18, 3).unwrap();
    board.set(9, 16, 4).unwrap();

    assert!(board.is_row_full(19));
    assert!(!board.is_row_full(18));
    assert_eq!(board.clear_full_rows(), 2);

    // Rows above the cleared ones drop by the number of full rows below them
    assert_eq!(board.get(0, 19).unwrap(), 3);
    assert_eq!(board.get(9, 18).unwrap(), 4);
    assert_eq!(board.occupied(), 2);

    assert_eq!(board.clear_full_rows(), 0);
}

#[test]
fn test_repaint_and_reset() {
    let mut board = Board::new();

    board.repaint(|x, y| ((x + y) % 7) as u8 + 1).unwrap();
    assert_eq!(board.occupied(), BOARD_WIDTH * BOARD_HEIGHT);
    assert_eq!(board.get(2, 3).unwrap(), 6);

    // A bad color leaves the board as it was
    let before = board.clone();
    assert!(matches!(board.repaint(|_, _| 9), Err(Error::InvalidColor(9))));
    assert_eq!(board, before);

    board.reset();
    assert_eq!(board.occupied(), 0);
}

#[test]
fn test_catalog_pieces_fit_at_spawn() {
    let board = Board::new();
    let catalog = PieceCatalog::standard();

    for kind in catalog.kinds() {
        let mut piece = catalog.spawn(kind).unwrap();
        piece.set_position(3, 0);

        for _ in 0..piece.rotation_count() {
            assert!(board.fits(&piece), "{} rotation {}", kind, piece.rotation());
            piece.rotate();
        }
    }
}
