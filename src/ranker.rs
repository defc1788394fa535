//! Heuristic move ranking.
//!
//! The ranker turns the classifier's tiers for both sides into a single
//! weighted move list for the side to move. Weights come from a [`Weights`]
//! table and are layered from low to high, so a point always ends up with the
//! weight of the strongest shape it belongs to.
//!
//! When a position has no tactical move at all, every empty point is scored by
//! random rollouts instead and the list is ordered by win rate.

use std::collections::BTreeMap;

use fastrand::Rng;
use tracing::debug;

use crate::board::{Board, Cell, Color, Point};
use crate::constants::{ROLLOUTS_PER_MOVE, Weights};
use crate::patterns::{Tier, classify};
use crate::playout::win_rate;

/// A candidate move with its heuristic weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedMove {
    pub point: Point,
    pub weight: f64,
    /// Rollout win rate, present only when the position had no tactics
    pub win_rate: Option<f64>,
}

/// Candidate moves in descending priority order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankedMoves {
    moves: Vec<RankedMove>,
    threshold: f64,
}

impl RankedMoves {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedMove> {
        self.moves.iter()
    }

    /// The highest-priority move.
    pub fn best(&self) -> Option<&RankedMove> {
        self.moves.first()
    }

    /// Moves whose weight reaches the tactical threshold, in order.
    pub fn tactical(&self) -> impl Iterator<Item = &RankedMove> {
        self.moves.iter().filter(|m| m.weight >= self.threshold)
    }

    pub fn has_tactics(&self) -> bool {
        self.tactical().next().is_some()
    }

    pub fn weight_of(&self, point: Point) -> Option<f64> {
        self.moves.iter().find(|m| m.point == point).map(|m| m.weight)
    }
}

/// Weighted move generator for the side to move.
#[derive(Clone, Debug)]
pub struct Ranker {
    pub weights: Weights,
    /// Rollouts per empty point when there are no tactical moves
    pub rollouts_per_move: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(Weights::default(), ROLLOUTS_PER_MOVE)
    }
}

impl Ranker {
    pub fn new(weights: Weights, rollouts_per_move: usize) -> Self {
        Self {
            weights,
            rollouts_per_move,
        }
    }

    /// Rank the empty points of `board` for its side to move.
    ///
    /// The board is only borrowed mutably for rollouts and is unchanged on
    /// return.
    pub fn rank(&self, board: &mut Board, rng: &mut Rng) -> RankedMoves {
        let color = board.current_player();
        let map = self.weight_map(board, color);
        let threshold = self.weights.tactical_threshold;

        let mut moves: Vec<RankedMove> = if map.values().any(|&w| w >= threshold) {
            map.into_iter()
                .map(|(point, weight)| RankedMove {
                    point,
                    weight,
                    win_rate: None,
                })
                .collect()
        } else {
            debug!(empty = board.count_empty(), "no tactical moves, scoring by rollout");
            board
                .empty_points()
                .into_iter()
                .map(|point| RankedMove {
                    point,
                    weight: map.get(&point).copied().unwrap_or(0.0),
                    win_rate: Some(win_rate(board, point, color, self.rollouts_per_move, rng)),
                })
                .collect()
        };

        // Stable sort: equal keys keep ascending point order
        moves.sort_by(|a, b| {
            let rate = |m: &RankedMove| m.win_rate.unwrap_or(0.0);
            rate(b)
                .total_cmp(&rate(a))
                .then(b.weight.total_cmp(&a.weight))
        });
        RankedMoves { moves, threshold }
    }

    /// Proximity seed plus tactical overlays, keyed by point.
    fn weight_map(&self, board: &Board, color: Color) -> BTreeMap<Point, f64> {
        let w = &self.weights;
        let opp = color.opponent();
        let own = classify(board, color);
        let theirs = classify(board, opp);

        let mut map = BTreeMap::new();
        let empty = board.empty_points();
        for (side, weight) in [(opp, w.opp_adjacent), (color, w.own_adjacent)] {
            for &pt in &empty {
                let touches = board
                    .adjacent_points(pt)
                    .any(|nb| board.get_color(nb) == Cell::Stone(side));
                if touches {
                    map.insert(pt, weight);
                }
            }
        }

        let overlays = [
            (
                w.opp_open_two,
                vec![own.get(Tier::BlockOpenThree), theirs.get(Tier::MakeOpenThree)],
            ),
            (w.own_open_two, vec![own.get(Tier::MakeOpenThree)]),
            (
                w.opp_open_three,
                vec![own.get(Tier::BlockOpenFour), theirs.get(Tier::MakeOpenFour)],
            ),
            (w.own_open_three, vec![own.get(Tier::MakeOpenFour)]),
            (
                w.opp_win_threat,
                vec![own.get(Tier::BlockWin), theirs.get(Tier::Win)],
            ),
            (w.own_win, vec![own.get(Tier::Win)]),
        ];
        for (weight, sets) in overlays {
            for set in sets {
                for &pt in set {
                    map.insert(pt, weight);
                }
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_all(board: &mut Board, color: Color, points: &[(usize, usize)]) {
        for &(r, c) in points {
            let pt = board.point(r, c);
            board.place(pt, color).unwrap();
        }
    }

    #[test]
    fn test_full_board_ranks_nothing() {
        let mut rng = Rng::with_seed(1);
        let mut b = Board::new(3).unwrap();
        for pt in b.empty_points() {
            b.set_stone(pt, Color::White);
        }
        assert!(Ranker::default().rank(&mut b, &mut rng).is_empty());
    }

    #[test]
    fn test_win_ranks_first() {
        let mut rng = Rng::with_seed(1);
        let mut b = Board::new(9).unwrap();
        place_all(&mut b, Color::Black, &[(5, 1), (5, 2), (5, 3), (5, 4)]);
        place_all(&mut b, Color::White, &[(1, 9), (2, 9), (3, 9)]);
        b.set_current_player(Color::Black);
        let ranked = Ranker::default().rank(&mut b, &mut rng);
        let best = ranked.best().unwrap();
        assert_eq!(best.point, b.point(5, 5));
        assert_eq!(best.weight, 4.0);
        assert!(ranked.has_tactics());
    }

    #[test]
    fn test_block_outranks_own_three() {
        let mut rng = Rng::with_seed(1);
        let mut b = Board::new(9).unwrap();
        place_all(&mut b, Color::White, &[(2, 2), (2, 3), (2, 4), (2, 5)]);
        place_all(&mut b, Color::Black, &[(6, 3), (6, 4), (6, 5)]);
        b.set_current_player(Color::Black);
        let ranked = Ranker::default().rank(&mut b, &mut rng);
        let top: Vec<Point> = ranked.iter().take(2).map(|m| m.point).collect();
        assert_eq!(top, vec![b.point(2, 1), b.point(2, 6)]);
        assert_eq!(ranked.weight_of(b.point(2, 6)), Some(3.5));
        assert_eq!(ranked.weight_of(b.point(6, 6)), Some(3.0));
    }

    #[test]
    fn test_win_point_never_demoted() {
        let mut rng = Rng::with_seed(1);
        let mut b = Board::new(9).unwrap();
        // (5,5) ends a horizontal four and extends a vertical two
        place_all(&mut b, Color::Black, &[(5, 1), (5, 2), (5, 3), (5, 4)]);
        place_all(&mut b, Color::Black, &[(6, 5), (7, 5)]);
        b.set_current_player(Color::Black);
        let ranked = Ranker::default().rank(&mut b, &mut rng);
        assert_eq!(ranked.weight_of(b.point(5, 5)), Some(4.0));
    }

    #[test]
    fn test_proximity_weights() {
        let mut rng = Rng::with_seed(1);
        let mut b = Board::new(9).unwrap();
        place_all(&mut b, Color::Black, &[(5, 5), (5, 6)]);
        place_all(&mut b, Color::White, &[(2, 2)]);
        b.set_current_player(Color::Black);
        let ranked = Ranker::default().rank(&mut b, &mut rng);
        assert!(ranked.has_tactics());
        assert_eq!(ranked.weight_of(b.point(1, 1)), Some(0.5));
        assert_eq!(ranked.weight_of(b.point(4, 5)), Some(1.0));
        assert_eq!(ranked.weight_of(b.point(5, 4)), Some(2.0));
        // Far from every stone
        assert_eq!(ranked.weight_of(b.point(9, 9)), None);
    }

    #[test]
    fn test_quiet_position_scored_by_rollout() {
        let mut rng = Rng::with_seed(4);
        let mut b = Board::new(7).unwrap();
        place_all(&mut b, Color::Black, &[(4, 4)]);
        let before = b.clone();
        let ranked = Ranker::default().rank(&mut b, &mut rng);
        assert_eq!(b, before);
        assert!(!ranked.has_tactics());
        assert_eq!(ranked.len(), 48);
        assert!(ranked.iter().all(|m| m.win_rate.is_some()));
        let rates: Vec<f64> = ranked.iter().map(|m| m.win_rate.unwrap()).collect();
        assert!(rates.windows(2).all(|w| w[0] >= w[1]));
    }
}
