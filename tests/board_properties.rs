use rand::SeedableRng;
use rand::rngs::StdRng;
use xtmines::{Board, CellIcon, ConfigError, Difficulty, GameSession, GameStatus};

fn board(rows: &[&str]) -> Board {
    let grid: Vec<Vec<bool>> = rows.iter().map(|r| r.chars().map(|c| c == '*').collect()).collect();
    Board::from_layout(&grid).unwrap()
}

fn mines_in(b: &Board) -> usize {
    b.cells().filter(|(_, c)| c.is_mine).count()
}

#[test]
fn generation_places_exact_mine_count() {
    let mut rng = StdRng::seed_from_u64(2024);
    for rows in 1..=6usize {
        for columns in 1..=6 {
            let cells = rows * columns;
            for mines in [0, cells / 3, cells.saturating_sub(1), cells] {
                let b = Board::generate(rows, columns, mines, &mut rng).unwrap();
                assert_eq!(mines_in(&b), mines, "{rows}x{columns} with {mines}");
            }
        }
    }
}

#[test]
fn every_safe_cell_counts_its_bounded_neighbours() {
    let mut rng = StdRng::seed_from_u64(5);
    let b = Board::generate(16, 30, 99, &mut rng).unwrap();
    for ((x, y), cell) in b.cells() {
        if cell.is_mine {
            assert_eq!(cell.adjacent_mines, None);
            continue;
        }
        let mut expected = 0;
        for dx in -1isize..=1 {
            for dy in -1isize..=1 {
                if (dx, dy) == (0, 0) {
                    continue;
                }
                if b.cell(x as isize + dx, y as isize + dy).is_some_and(|c| c.is_mine) {
                    expected += 1;
                }
            }
        }
        assert_eq!(cell.adjacent_mines, Some(expected), "cell ({x},{y})");
    }
}

#[test]
fn centre_of_three_by_three_sees_both_corner_mines() {
    let b = board(&["*..", "...", "..*"]);
    assert_eq!(b.cell(1, 1).unwrap().adjacent_mines, Some(2));
}

#[test]
fn zero_region_opens_with_its_border_only() {
    let mut b = board(&[
        ".....",
        ".....",
        "**.**",
        ".....",
    ]);
    let out = b.reveal(0, 4);
    // row 0 is all zeros, row 1 its numbered border
    for y in 0..5 {
        assert!(b.cell(0, y).unwrap().is_revealed);
        assert!(b.cell(1, y).unwrap().is_revealed);
        assert!(b.cell(1, y).unwrap().adjacent_mines.unwrap() > 0);
    }
    // the gap at (2,2) is a number too, so nothing leaks below the wall
    assert!(!b.cell(2, 2).unwrap().is_revealed);
    for y in 0..5 {
        assert!(!b.cell(3, y).unwrap().is_revealed);
    }
    assert_eq!(out.revealed.len(), 10);
    assert!(!b.is_finished());
}

#[test]
fn out_of_bounds_reveal_does_nothing() {
    let mut b = board(&["*.", ".."]);
    for (x, y) in [(-1, -1), (-1, 0), (0, 2), (2, 0), (isize::MAX, 0), (0, isize::MIN)] {
        let out = b.reveal(x, y);
        assert!(out.revealed.is_empty());
        assert!(!out.triggered_mine);
    }
    assert!(b.cells().all(|(_, c)| !c.is_revealed));
}

#[test]
fn hitting_a_mine_finishes_and_uncovers_every_mine() {
    let mut s = GameSession::start(Difficulty::Medium, StdRng::seed_from_u64(11)).unwrap();
    let ((mx, my), _) = s.board().cells().find(|(_, c)| c.is_mine).unwrap();
    let out = s.on_left_click(mx as isize, my as isize);
    assert!(out.triggered_mine);
    assert!(s.is_game_finished());
    assert_eq!(s.status(), GameStatus::Lost);
    let mut exploded = 0;
    for ((x, y), c) in s.board().cells() {
        if c.is_mine {
            assert!(c.is_revealed);
            let icon = s.render_state(x as isize, y as isize).unwrap().icon();
            if icon == CellIcon::MineExploded {
                exploded += 1;
            }
        }
    }
    assert_eq!(exploded, 1);
}

#[test]
fn flag_twice_restores_cell_and_counter() {
    let mut s = GameSession::start(Difficulty::Easy, StdRng::seed_from_u64(3)).unwrap();
    let before = s.remaining_flag_count();
    s.on_right_click(4, 4);
    assert_eq!(s.remaining_flag_count(), before - 1);
    assert!(s.render_state(4, 4).unwrap().flagged);
    s.on_right_click(4, 4);
    assert_eq!(s.remaining_flag_count(), before);
    assert!(!s.render_state(4, 4).unwrap().flagged);
}

#[test]
fn victory_exactly_on_last_safe_cell() {
    // numbered cells everywhere so each reveal opens one cell
    let mut b = board(&["*.*", ".*.", "*.*"]);
    let safe = [(0, 1), (1, 0), (1, 2), (2, 1)];
    for &(x, y) in &safe[..3] {
        let out = b.reveal(x, y);
        assert_eq!(out.revealed.len(), 1);
        assert!(!out.won);
        assert!(!b.check_victory());
        assert!(!b.is_finished());
    }
    let (x, y) = safe[3];
    let out = b.reveal(x, y);
    assert!(out.won);
    assert!(b.check_victory());
    assert!(b.is_finished());
    assert!(b.is_won());
}

#[test]
fn unknown_difficulty_builds_nothing() {
    let res = GameSession::start_named("Insane", StdRng::seed_from_u64(0));
    match res {
        Err(ConfigError::UnknownDifficulty(name)) => assert_eq!(name, "Insane"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("session should not exist"),
    }
}

#[test]
fn oversized_mine_count_is_a_configuration_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = Board::generate(2, 2, 5, &mut rng).unwrap_err();
    assert_eq!(err, ConfigError::TooManyMines { mines: 5, cells: 4 });
    assert!(err.to_string().contains("too many mines"));
}

#[test]
fn full_board_reveal_always_loses() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut b = Board::generate(3, 3, 9, &mut rng).unwrap();
    assert!(b.check_victory());
    let out = b.reveal(1, 1);
    assert!(out.triggered_mine);
    assert!(b.is_finished() && !b.is_won());
}
