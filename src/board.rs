//! Padded five-in-a-row board.
//!
//! The board is stored as a 1D array with a border of padding cells, so that
//! walking along a row, column, or diagonal never needs a bounds check:
//!
//! - Row 0 and the row after `size` are padding
//! - Column 0 of every row is padding (it doubles as the right edge of the
//!   previous row)
//! - `point(row, col) = row * NS + col` with `NS = size + 1`
//!
//! Only stone placement and removal are implemented. There is no capture,
//! liberty, or ko logic; stones stay where they are put until removed.

use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::constants::{COLUMN_LETTERS, MAX_SIZE, MIN_SIZE, WIN_LENGTH};
use crate::error::{BoardError, MoveError};

/// A point on the board, represented as an index into the 1D cell array.
pub type Point = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single letter used by the command front-end (`b` or `w`).
    pub fn letter(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }

    /// Parse `b`, `black`, `w`, or `white` (any case).
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Contents of a single cell of the padded array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Stone(Color),
    Border,
}

/// A five-in-a-row position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Row stride (`size + 1`)
    ns: usize,
    cells: Vec<Cell>,
    /// On-board orthogonal neighbors of every point (empty for padding)
    neighbors: Vec<Vec<Point>>,
    current_player: Color,
}

impl Board {
    /// Create an empty board with Black to move.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        let ns = size + 1;
        let maxpoint = size * size + 3 * ns;
        let mut board = Board {
            size,
            ns,
            cells: vec![Cell::Border; maxpoint],
            neighbors: Vec::new(),
            current_player: Color::Black,
        };
        for row in 1..=size {
            let start = board.row_start(row);
            board.cells[start..start + size].fill(Cell::Empty);
        }
        board.neighbors = (0..maxpoint)
            .map(|pt| {
                if board.cells[pt] == Cell::Border {
                    Vec::new()
                } else {
                    [pt - 1, pt + 1, pt - ns, pt + ns]
                        .into_iter()
                        .filter(|&nb| board.cells[nb] != Cell::Border)
                        .collect()
                }
            })
            .collect();
        Ok(board)
    }

    /// Remove every stone and give the move back to Black.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            if let Cell::Stone(_) = cell {
                *cell = Cell::Empty;
            }
        }
        self.current_player = Color::Black;
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance between vertically adjacent points.
    #[inline]
    pub fn stride(&self) -> usize {
        self.ns
    }

    /// Length of the padded cell array.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn set_current_player(&mut self, color: Color) {
        self.current_player = color;
    }

    fn row_start(&self, row: usize) -> Point {
        row * self.ns + 1
    }

    /// Cell at `point`; anything outside the array reads as border.
    #[inline]
    pub fn get_color(&self, point: Point) -> Cell {
        self.cells.get(point).copied().unwrap_or(Cell::Border)
    }

    #[inline]
    pub fn is_on_board(&self, point: Point) -> bool {
        !matches!(self.get_color(point), Cell::Border)
    }

    /// Point for a 1-based (row, col) pair.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point {
        row * self.ns + col
    }

    /// 1-based (row, col) of an on-board point.
    pub fn coord(&self, point: Point) -> Option<(usize, usize)> {
        if !self.is_on_board(point) {
            return None;
        }
        Some((point / self.ns, point % self.ns))
    }

    /// Whether a stone may be placed at `point`.
    #[inline]
    pub fn is_legal(&self, point: Point) -> bool {
        self.get_color(point) == Cell::Empty
    }

    /// Place a stone and hand the move to the opponent of `color`.
    pub fn place(&mut self, point: Point, color: Color) -> Result<(), MoveError> {
        match self.get_color(point) {
            Cell::Empty => {
                self.cells[point] = Cell::Stone(color);
                self.current_player = color.opponent();
                Ok(())
            }
            Cell::Stone(_) => Err(MoveError::Occupied(point)),
            Cell::Border => Err(MoveError::OffBoard(point)),
        }
    }

    /// Legality-checked move entry point for callers outside the search.
    pub fn play(&mut self, point: Point, color: Color) -> Result<(), MoveError> {
        self.place(point, color)?;
        debug!(
            color = %color,
            point = %self.format_point(point),
            "stone played"
        );
        Ok(())
    }

    /// Pass the turn without placing a stone.
    pub fn play_pass(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Reset `point` to empty. The caller restores the side to move.
    #[inline]
    pub fn remove(&mut self, point: Point) {
        debug_assert!(self.is_on_board(point), "remove on padding point {point}");
        self.cells[point] = Cell::Empty;
    }

    /// Unchecked placement used by search and rollouts.
    ///
    /// Candidates always come from the empty-point set, so the target is empty.
    #[inline]
    pub(crate) fn set_stone(&mut self, point: Point, color: Color) {
        debug_assert_eq!(self.cells[point], Cell::Empty);
        self.cells[point] = Cell::Stone(color);
    }

    /// Place `color` at `point` for the lifetime of the returned guard.
    ///
    /// Dropping the guard removes the stone and restores the side to move, so
    /// every exit path of the caller undoes the placement.
    pub fn place_scoped(&mut self, point: Point, color: Color) -> Placement<'_> {
        let player = self.current_player;
        self.set_stone(point, color);
        self.current_player = color.opponent();
        Placement {
            board: self,
            point,
            player,
        }
    }

    /// Precomputed on-board orthogonal neighbors.
    #[inline]
    pub fn neighbors(&self, point: Point) -> &[Point] {
        self.neighbors.get(point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// On-board diagonal neighbors.
    pub fn diagonal_neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        let ns = self.ns;
        let diagonals = if self.is_on_board(point) {
            [point - ns - 1, point - ns + 1, point + ns - 1, point + ns + 1]
        } else {
            [usize::MAX; 4]
        };
        diagonals.into_iter().filter(|&d| self.is_on_board(d))
    }

    /// All on-board points in the 8-neighborhood of `point`.
    pub fn adjacent_points(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.neighbors(point)
            .iter()
            .copied()
            .chain(self.diagonal_neighbors(point))
    }

    /// Array offsets of the four line directions: horizontal, vertical,
    /// diagonal, and anti-diagonal.
    #[inline]
    pub fn line_steps(&self) -> [usize; 4] {
        [1, self.ns, self.ns + 1, self.ns - 1]
    }

    /// Whether the stone at `point` is part of five in a row along `step`.
    ///
    /// Counting stops as soon as five stones are seen, so longer lines count too.
    pub fn is_line_of_five(&self, point: Point, step: usize) -> bool {
        let color = match self.get_color(point) {
            Cell::Stone(c) => Cell::Stone(c),
            _ => return false,
        };
        let mut count = 1;
        let mut p = point;
        while count < WIN_LENGTH {
            p += step;
            if self.get_color(p) != color {
                break;
            }
            count += 1;
        }
        p = point;
        while count < WIN_LENGTH {
            match p.checked_sub(step) {
                Some(prev) if self.get_color(prev) == color => {
                    p = prev;
                    count += 1;
                }
                _ => break,
            }
        }
        count == WIN_LENGTH
    }

    /// Whether the stone at `point` completes five in any direction.
    pub fn completes_five(&self, point: Point) -> bool {
        self.line_steps()
            .into_iter()
            .any(|step| self.is_line_of_five(point, step))
    }

    /// The color with five in a row, if any.
    ///
    /// Black stones are scanned before White stones.
    pub fn check_terminal(&self) -> Option<Color> {
        [Color::Black, Color::White].into_iter().find(|&color| {
            self.points_where(Cell::Stone(color))
                .any(|pt| self.completes_five(pt))
        })
    }

    fn points_where(&self, cell: Cell) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == cell)
            .map(|(pt, _)| pt)
    }

    /// All empty points in ascending order.
    pub fn empty_points(&self) -> Vec<Point> {
        self.points_where(Cell::Empty).collect()
    }

    pub fn count_empty(&self) -> usize {
        self.points_where(Cell::Empty).count()
    }

    /// Parse a coordinate such as `d4` (column letter, 1-based row number).
    pub fn parse_point(&self, s: &str) -> Option<Point> {
        let mut chars = s.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let col = COLUMN_LETTERS.find(letter)? + 1;
        let row: usize = chars.as_str().parse().ok()?;
        if !(1..=self.size).contains(&row) || col > self.size {
            return None;
        }
        Some(self.point(row, col))
    }

    /// Convert an on-board point to a coordinate such as `d4`.
    pub fn format_point(&self, point: Point) -> String {
        match self.coord(point) {
            Some((row, col)) => {
                let letter = COLUMN_LETTERS.as_bytes()[col - 1] as char;
                format!("{}{row}", letter.to_ascii_lowercase())
            }
            None => "pass".into(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.size {
                let ch = match self.get_color(self.point(row, col)) {
                    Cell::Stone(Color::Black) => 'X',
                    Cell::Stone(Color::White) => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for letter in COLUMN_LETTERS.chars().take(self.size) {
            write!(f, "{letter} ")?;
        }
        writeln!(f)
    }
}

/// A stone placed by [`Board::place_scoped`], removed again on drop.
pub struct Placement<'a> {
    board: &'a mut Board,
    point: Point,
    player: Color,
}

impl Placement<'_> {
    pub fn point(&self) -> Point {
        self.point
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.remove(self.point);
        self.board.current_player = self.player;
    }
}
