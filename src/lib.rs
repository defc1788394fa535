//! Gomoku-Solver: a five-in-a-row move-search engine.
//!
//! Given a position, the engine decides whether the side to move can force a
//! win, a draw, or is lost, and recommends a move.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, search parameters, and heuristic weights
//! - [`board`] - Padded 1D board with placement, undo, and five-in-a-row detection
//! - [`patterns`] - Line template classifier producing prioritized move tiers
//! - [`ranker`] - Weighted move ordering built from both sides' tiers
//! - [`playout`] - Random rollouts for quiet positions
//! - [`search`] - Depth-bounded alpha-beta solver
//! - [`gtp`] - GTP-style text front-end
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use gomoku_solver::board::{Board, Color};
//! use gomoku_solver::search::{Solver, Verdict};
//!
//! let mut board = Board::new(7).unwrap();
//! for col in 1..=4 {
//!     let pt = board.point(4, col);
//!     board.play(pt, Color::Black).unwrap();
//! }
//! board.set_current_player(Color::Black);
//!
//! let solution = Solver::default().solve(&mut board);
//! assert_eq!(solution.verdict, Verdict::Win(Color::Black));
//! assert_eq!(solution.best_move, Some(board.point(4, 5)));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod gtp;
pub mod patterns;
pub mod playout;
pub mod ranker;
pub mod search;
