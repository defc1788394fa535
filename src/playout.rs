//! Random playouts (random game completion).
//!
//! A playout fills the remaining empty points in a random order with
//! alternating colors until someone completes five or the board is full.
//! Every stone it places is removed again before returning, so the caller's
//! board is left exactly as it was.

use fastrand::Rng;
use tracing::trace;

use crate::board::{Board, Color, Point};

/// Play one random game to the end and report the winner.
///
/// `first` moves first. Returns `None` when the board fills up without five.
pub fn rollout(board: &mut Board, first: Color, rng: &mut Rng) -> Option<Color> {
    if let Some(winner) = board.check_terminal() {
        return Some(winner);
    }

    let mut empty_points = board.empty_points();
    rng.shuffle(&mut empty_points);

    let mut color = first;
    let mut winner = None;
    let mut played = 0;
    for &pt in &empty_points {
        board.set_stone(pt, color);
        played += 1;
        // Only the new stone can have completed a line
        if board.completes_five(pt) {
            winner = Some(color);
            break;
        }
        color = color.opponent();
    }

    for &pt in &empty_points[..played] {
        board.remove(pt);
    }
    winner
}

/// Fraction of `n` rollouts won by `color` after it plays at `point`.
///
/// A move that completes five scores 1.0 without any rollouts.
pub fn win_rate(board: &mut Board, point: Point, color: Color, n: usize, rng: &mut Rng) -> f64 {
    let mut child = board.place_scoped(point, color);
    if child.completes_five(point) {
        return 1.0;
    }
    if n == 0 || child.count_empty() == 0 {
        return 0.0;
    }
    let wins = (0..n)
        .filter(|_| rollout(&mut child, color.opponent(), rng) == Some(color))
        .count();
    wins as f64 / n as f64
}

/// Flat Monte Carlo move choice for the side to move.
///
/// Every empty point is tried in a random order and scored by its win rate over
/// `simulations` rollouts. Returns the best point with its win rate, or `None`
/// on a full board.
pub fn simulate_moves(board: &mut Board, simulations: usize, rng: &mut Rng) -> Option<(Point, f64)> {
    let color = board.current_player();
    let mut candidates = board.empty_points();
    rng.shuffle(&mut candidates);

    let mut best: Option<(Point, f64)> = None;
    for pt in candidates {
        let rate = win_rate(board, pt, color, simulations, rng);
        trace!(point = %board.format_point(pt), rate, "simulated move");
        if best.is_none_or(|(_, r)| rate > r) {
            best = Some((pt, rate));
        }
    }
    best
}
