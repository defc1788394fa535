//! Integration tests for gomoku-solver.
//!
//! These exercise the public API end to end: board primitives, the pattern
//! classifier, the ranker, rollouts, and the alpha-beta solver.

use fastrand::Rng;

use gomoku_solver::board::{Board, Cell, Color, Point};
use gomoku_solver::patterns::{Tier, classify};
use gomoku_solver::playout::rollout;
use gomoku_solver::ranker::Ranker;
use gomoku_solver::search::{SearchConfig, Solver, Verdict};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Parse `"b d4"`-style tokens and place them, then set the side to move.
fn setpos(size: usize, stones: &[(&str, &str)], to_move: Color) -> Board {
    let mut board = Board::new(size).unwrap();
    for &(color, vertex) in stones {
        let color = Color::parse(color).unwrap();
        let pt = board.parse_point(vertex).unwrap();
        board.play(pt, color).unwrap();
    }
    board.set_current_player(to_move);
    board
}

fn seeded_solver() -> Solver {
    Solver::new(SearchConfig {
        seed: Some(2024),
        ..SearchConfig::default()
    })
}

fn cells(board: &Board) -> Vec<Cell> {
    (0..board.len()).map(|pt| board.get_color(pt)).collect()
}

// =============================================================================
// Terminal detection
// =============================================================================

#[test]
fn test_every_line_of_five_is_detected() {
    let size = 9;
    let probe = Board::new(size).unwrap();
    let steps = probe.line_steps();
    for (dir, &step) in steps.iter().enumerate() {
        for start in probe.empty_points() {
            let line: Vec<Point> = (0..5).map(|i| start + i * step).collect();
            if !line.iter().all(|&p| probe.is_on_board(p)) {
                continue;
            }
            for color in [Color::Black, Color::White] {
                let mut board = Board::new(size).unwrap();
                for &p in &line {
                    board.place(p, color).unwrap();
                }
                assert_eq!(
                    board.check_terminal(),
                    Some(color),
                    "direction {dir} from {}",
                    board.format_point(start)
                );
                // Breaking the line in the middle clears the win
                board.remove(line[2]);
                assert_eq!(board.check_terminal(), None);
            }
        }
    }
}

#[test]
fn test_broken_lines_are_not_terminal() {
    let board = setpos(
        9,
        &[("b", "a1"), ("b", "b1"), ("b", "c1"), ("w", "d1"), ("b", "e1"), ("b", "f1")],
        Color::White,
    );
    assert_eq!(board.check_terminal(), None);
}

// =============================================================================
// Undo discipline
// =============================================================================

#[test]
fn test_place_remove_is_identity() {
    let mut board = setpos(7, &[("b", "d4"), ("w", "e5")], Color::Black);
    let before = cells(&board);
    for pt in board.empty_points() {
        board.place(pt, Color::Black).unwrap();
        board.remove(pt);
        assert_eq!(cells(&board), before);
    }
}

#[test]
fn test_rollout_conserves_board() {
    let mut rng = Rng::with_seed(99);
    let mut board = setpos(9, &[("b", "e5"), ("w", "d4"), ("b", "f6")], Color::White);
    let before = cells(&board);
    let empty = board.count_empty();
    for _ in 0..25 {
        rollout(&mut board, Color::White, &mut rng);
        assert_eq!(board.count_empty(), empty);
        assert_eq!(cells(&board), before);
    }
}

#[test]
fn test_solve_restores_board() {
    let mut board = setpos(
        7,
        &[
            ("b", "c2"),
            ("w", "d4"),
            ("b", "c3"),
            ("w", "e4"),
            ("b", "c4"),
            ("b", "c5"),
        ],
        Color::White,
    );
    let before = board.clone();
    seeded_solver().solve(&mut board);
    assert_eq!(board, before);
}

// =============================================================================
// Classifier and ranker
// =============================================================================

#[test]
fn test_four_in_a_row_open_end_is_win_tier() {
    let board = setpos(
        9,
        &[("b", "b5"), ("b", "c5"), ("b", "d5"), ("b", "e5")],
        Color::Black,
    );
    let tiers = classify(&board, Color::Black);
    assert!(tiers.contains(Tier::Win, board.parse_point("f5").unwrap()));
    assert!(tiers.contains(Tier::Win, board.parse_point("a5").unwrap()));
}

#[test]
fn test_win_tier_beats_open_three() {
    // f5 completes the row and also extends the f6/f7 pair
    let mut board = setpos(
        9,
        &[
            ("b", "b5"),
            ("b", "c5"),
            ("b", "d5"),
            ("b", "e5"),
            ("b", "f6"),
            ("b", "f7"),
            ("w", "a5"),
        ],
        Color::Black,
    );
    let f5 = board.parse_point("f5").unwrap();
    let mut rng = Rng::with_seed(1);
    let ranked = Ranker::default().rank(&mut board, &mut rng);
    assert_eq!(ranked.weight_of(f5), Some(4.0));
    assert_eq!(ranked.best().map(|m| m.point), Some(f5));
}

#[test]
fn test_win_point_keeps_win_weight_over_open_four() {
    // f6/f7/f8 alone: f5 makes an open four
    let mut board = setpos(9, &[("b", "f6"), ("b", "f7"), ("b", "f8")], Color::Black);
    let f5 = board.parse_point("f5").unwrap();
    let mut rng = Rng::with_seed(1);
    let ranked = Ranker::default().rank(&mut board, &mut rng);
    assert_eq!(ranked.weight_of(f5), Some(3.0));

    // With the row b5..e5, f5 also completes five
    for vertex in ["b5", "c5", "d5", "e5"] {
        board.play(board.parse_point(vertex).unwrap(), Color::Black).unwrap();
    }
    board.set_current_player(Color::Black);
    assert_eq!(classify(&board, Color::Black).tier_of(f5), Some(Tier::Win));
    let ranked = Ranker::default().rank(&mut board, &mut rng);
    assert_eq!(ranked.weight_of(f5), Some(4.0));
    assert_eq!(ranked.best().map(|m| m.point), Some(f5));
}

// =============================================================================
// Alpha-beta solver
// =============================================================================

#[test]
fn test_solve_win_in_one_small_board() {
    let mut board = setpos(
        5,
        &[
            ("b", "a2"),
            ("b", "b2"),
            ("b", "c2"),
            ("b", "d2"),
            ("w", "a4"),
            ("w", "b4"),
            ("w", "c4"),
        ],
        Color::Black,
    );
    let solution = seeded_solver().solve(&mut board);
    assert_eq!(solution.verdict, Verdict::Win(Color::Black));
    assert_eq!(solution.best_move, board.parse_point("e2"));
    assert_eq!(solution.display(&board).to_string(), "b e2");
}

#[test]
fn test_solve_blocks_and_draws_on_small_board() {
    // White must block e2; nothing is decided within two plies
    let mut board = setpos(
        5,
        &[
            ("b", "a2"),
            ("b", "b2"),
            ("b", "c2"),
            ("b", "d2"),
            ("w", "a3"),
            ("w", "b3"),
            ("w", "c1"),
        ],
        Color::White,
    );
    let mut solver = Solver::new(SearchConfig {
        max_depth: 2,
        seed: Some(5),
        ..SearchConfig::default()
    });
    let solution = solver.solve(&mut board);
    assert_eq!(solution.verdict, Verdict::Draw);
    assert_eq!(solution.best_move, board.parse_point("e2"));
}

#[test]
fn test_solve_full_board_is_draw() {
    let mut board = Board::new(3).unwrap();
    for (i, pt) in board.empty_points().into_iter().enumerate() {
        let color = if i % 2 == 0 { Color::Black } else { Color::White };
        board.place(pt, color).unwrap();
    }
    let solution = seeded_solver().solve(&mut board);
    assert_eq!(solution.verdict, Verdict::Draw);
    assert_eq!(solution.best_move, None);
    assert_eq!(solution.score, 0);
}

#[test]
fn test_solve_reports_loss_without_move() {
    let mut board = setpos(
        9,
        &[
            ("w", "c5"),
            ("w", "d5"),
            ("w", "e5"),
            ("w", "f5"),
            ("b", "a1"),
            ("b", "j9"),
        ],
        Color::Black,
    );
    let solution = seeded_solver().solve(&mut board);
    assert_eq!(solution.verdict, Verdict::Win(Color::White));
    assert_eq!(solution.best_move, None);
    assert_eq!(solution.display(&board).to_string(), "w");
}

#[test]
fn test_solve_open_three_is_winning() {
    let mut board = setpos(
        9,
        &[("b", "c5"), ("b", "d5"), ("b", "e5"), ("w", "a1"), ("w", "a9")],
        Color::Black,
    );
    let solution = seeded_solver().solve(&mut board);
    assert_eq!(solution.verdict, Verdict::Win(Color::Black));
    let mv = solution.best_move.unwrap();
    let coord = board.format_point(mv);
    assert!(coord == "b5" || coord == "f5", "unexpected move {coord}");
}

#[test]
fn test_solve_finds_double_four_from_quiet_position() {
    // No tactical shape on the board, but e5 makes two fours at once
    let stones = [
        ("b", "a5"),
        ("b", "b5"),
        ("b", "c5"),
        ("b", "e7"),
        ("b", "e8"),
        ("b", "e9"),
        ("w", "d6"),
    ];
    for seed in 0..3 {
        let mut board = setpos(9, &stones, Color::Black);
        let before = board.clone();
        let mut rng = Rng::with_seed(seed);
        assert!(!Ranker::default().rank(&mut board, &mut rng).has_tactics());

        let mut solver = Solver::new(SearchConfig {
            max_depth: 3,
            seed: Some(seed),
            ..SearchConfig::default()
        });
        let solution = solver.solve(&mut board);
        assert_eq!(solution.verdict, Verdict::Win(Color::Black), "seed {seed}");
        assert_eq!(solution.best_move, board.parse_point("e5"));
        assert_eq!(solution.display(&board).to_string(), "b e5");
        assert_eq!(board, before);
    }
}
