//! Constants for board geometry, search limits, and heuristic weights.
//!
//! The board uses a 1D array representation with padding for boundary detection.
//! Unlike a compile-time sized board, the side length is chosen at runtime and
//! only bounded by [`MIN_SIZE`] and [`MAX_SIZE`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest accepted board side length.
pub const MIN_SIZE: usize = 2;

/// Largest accepted board side length (GTP column letters A-Z without I).
pub const MAX_SIZE: usize = 25;

/// Default board side length for new games.
pub const DEFAULT_SIZE: usize = 7;

/// Number of stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Column letters used for coordinates. `I` is skipped.
pub const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Search Parameters
// =============================================================================

/// Depth at which alpha-beta stops and reports an unknown (0) value.
pub const MAX_DEPTH: usize = 5;

/// Rollouts used to score each empty point when a position has no tactics.
pub const ROLLOUTS_PER_MOVE: usize = 1;

// =============================================================================
// Pattern Scanning
// =============================================================================

/// Longest marker string built when walking a line.
pub const PATTERN_MAX_LEN: usize = 9;

/// Scan directions as (dx, dy): horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

// =============================================================================
// Ranker Weights
// =============================================================================

/// Weights the ranker assigns to each kind of candidate move.
///
/// Overlays are written in ascending order, so the table must stay sorted for
/// higher tiers to win over lower ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Empty point next to an opponent stone.
    pub opp_adjacent: f64,
    /// Empty point next to one of our stones.
    pub own_adjacent: f64,
    /// Stops the opponent from turning a two into an open three.
    pub opp_open_two: f64,
    /// Turns one of our twos into an open three.
    pub own_open_two: f64,
    /// Stops the opponent from making an open four.
    pub opp_open_three: f64,
    /// Turns one of our threes into an open four.
    pub own_open_three: f64,
    /// Blocks an opponent five.
    pub opp_win_threat: f64,
    /// Completes our own five.
    pub own_win: f64,
    /// Weight at or above which a move counts as tactical.
    pub tactical_threshold: f64,
}

/// The default weight table.
pub const DEFAULT_WEIGHTS: Weights = Weights {
    opp_adjacent: 0.5,
    own_adjacent: 1.0,
    opp_open_two: 1.5,
    own_open_two: 2.0,
    opp_open_three: 2.5,
    own_open_three: 3.0,
    opp_win_threat: 3.5,
    own_win: 4.0,
    tactical_threshold: 2.0,
};

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}
