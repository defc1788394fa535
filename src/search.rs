//! Depth-bounded alpha-beta search.
//!
//! The search is a negamax over the candidate moves produced by the
//! [`Ranker`]: every node returns -1, 0, or +1 from the point of view of the
//! side to move there. Zero means either a real draw or "ran out of depth";
//! the two are not told apart.
//!
//! The search works on the caller's board in place. Each candidate is played
//! through [`Board::place_scoped`], whose guard removes the stone again when
//! it goes out of scope, so cutoffs and early returns cannot leave stones
//! behind.

use std::cmp::Ordering;
use std::fmt;

use fastrand::Rng;
use tracing::{debug, info, trace};

use crate::board::{Board, Color, Point};
use crate::constants::{MAX_DEPTH, ROLLOUTS_PER_MOVE, Weights};
use crate::ranker::{RankedMoves, Ranker};

/// Search parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Depth at which a node scores 0
    pub max_depth: usize,
    pub weights: Weights,
    pub rollouts_per_move: usize,
    /// Optional cap on the candidates tried at a node with no tactical move;
    /// `None` searches all of them
    pub quiet_breadth: Option<usize>,
    /// Seed for rollouts; `None` seeds from the system
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            weights: Weights::default(),
            rollouts_per_move: ROLLOUTS_PER_MOVE,
            quiet_breadth: None,
            seed: None,
        }
    }
}

/// Outcome of a solved position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The given color wins with best play within the search depth
    Win(Color),
    /// Draw, or undecided at the depth limit
    Draw,
}

/// Result of [`Solver::solve`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub verdict: Verdict,
    /// Recommended move; `None` when the side to move is lost, the board is
    /// full, or the game was already decided
    pub best_move: Option<Point>,
    /// Root value from the side to move's point of view
    pub score: i32,
}

impl Solution {
    /// Text form used by the command front-end: `b d4`, `draw d4`, or `w`.
    pub fn display<'a>(&'a self, board: &'a Board) -> impl fmt::Display + 'a {
        SolutionDisplay {
            solution: self,
            board,
        }
    }
}

struct SolutionDisplay<'a> {
    solution: &'a Solution,
    board: &'a Board,
}

impl fmt::Display for SolutionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.solution.verdict {
            Verdict::Win(color) => write!(f, "{color}")?,
            Verdict::Draw => write!(f, "draw")?,
        }
        if let Some(pt) = self.solution.best_move {
            write!(f, " {}", self.board.format_point(pt))?;
        }
        Ok(())
    }
}

/// Alpha-beta solver. Holds no position state between calls.
pub struct Solver {
    config: SearchConfig,
    ranker: Ranker,
    rng: Rng,
    /// Root move that proved a win during the current search
    winning_move: Option<Point>,
    nodes: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Solver {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let ranker = Ranker::new(config.weights, config.rollouts_per_move);
        Self {
            config,
            ranker,
            rng,
            winning_move: None,
            nodes: 0,
        }
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Ranked candidate moves for the side to move.
    pub fn rank(&mut self, board: &mut Board) -> RankedMoves {
        self.ranker.rank(board, &mut self.rng)
    }

    /// Search the position for the side to move.
    ///
    /// The board is modified during the search and restored before returning.
    pub fn solve(&mut self, board: &mut Board) -> Solution {
        let color = board.current_player();
        self.winning_move = None;
        self.nodes = 0;
        debug!(
            color = %color,
            empty = board.count_empty(),
            max_depth = self.config.max_depth,
            "search started"
        );

        let score = self.alphabeta(board, color, -1, 1, 0);
        let solution = match score.cmp(&0) {
            Ordering::Greater => Solution {
                verdict: Verdict::Win(color),
                best_move: self.winning_move,
                score,
            },
            Ordering::Equal => Solution {
                verdict: Verdict::Draw,
                best_move: self.rank(board).best().map(|m| m.point),
                score,
            },
            Ordering::Less => Solution {
                verdict: Verdict::Win(color.opponent()),
                best_move: None,
                score,
            },
        };
        info!(
            nodes = self.nodes,
            result = %solution.display(board),
            "search finished"
        );
        solution
    }

    fn alphabeta(&mut self, board: &mut Board, color: Color, alpha: i32, beta: i32, depth: usize) -> i32 {
        self.nodes += 1;
        // The previous move may have ended the game
        if let Some(winner) = board.check_terminal() {
            return if winner == color { 1 } else { -1 };
        }
        if depth == self.config.max_depth || board.count_empty() == 0 {
            return 0;
        }

        let mut alpha = alpha;
        for mv in self.candidates(board) {
            let value = {
                let mut child = board.place_scoped(mv, color);
                -self.alphabeta(&mut child, color.opponent(), -beta, -alpha, depth + 1)
            };
            if depth == 0 && value == 1 {
                self.winning_move = Some(mv);
            }
            if value > alpha {
                alpha = value;
            }
            if value >= beta {
                trace!(depth, point = %board.format_point(mv), "beta cutoff");
                return beta;
            }
        }
        alpha
    }

    /// Moves to search at a node, best first.
    ///
    /// Tactical moves alone when there are any, otherwise every ranked quiet
    /// move (up to `quiet_breadth` if set), otherwise every empty point.
    fn candidates(&mut self, board: &mut Board) -> Vec<Point> {
        let ranked = self.rank(board);
        let tactical: Vec<Point> = ranked.tactical().map(|m| m.point).collect();
        if !tactical.is_empty() {
            return tactical;
        }
        let limit = self.config.quiet_breadth.unwrap_or(usize::MAX);
        let quiet: Vec<Point> = ranked.iter().take(limit).map(|m| m.point).collect();
        if !quiet.is_empty() {
            return quiet;
        }
        board.empty_points()
    }
}
