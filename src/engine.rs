//! Board model for the combo-four game.
//!
//! This module defines the game's fundamental components:
//! - `Player`: the seat identifiers that can own a piece.
//! - `Phase` and `Cell`: the tagged cell state (empty, settled piece, piece pending removal).
//! - `Board`: the grid, with placement, gravity, marked-cell clearing and terminal rendering.
//!
//! The board holds no game rules; alignment detection lives in `detector` and move
//! resolution in `game`.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows in the standard board.
pub const DEFAULT_HEIGHT: usize = 8;
/// Number of columns in the standard board.
pub const DEFAULT_WIDTH: usize = 7;

/// Identifies who owns a piece.
///
/// `Ai` is a seat driven by the computer opponent; it follows exactly the same rules
/// as the two human seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Player1,
    Player2,
    Ai,
}

impl Player {
    /// Every seat identifier, in canonical order.
    pub const ALL: [Player; 3] = [Player::Player1, Player::Player2, Player::Ai];

    /// The identifier used by the room store and the presentation layer.
    ///
    /// ```
    /// use combo_four::engine::Player;
    /// assert_eq!(Player::Player1.id(), "player1");
    /// assert_eq!(Player::from_id("ai"), Some(Player::Ai));
    /// assert_eq!(Player::from_id("nobody"), None);
    /// ```
    pub fn id(&self) -> &'static str {
        match self {
            Player::Player1 => "player1",
            Player::Player2 => "player2",
            Player::Ai => "ai",
        }
    }

    /// Parses an identifier produced by [`Player::id`].
    pub fn from_id(id: &str) -> Option<Player> {
        Player::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Character used for a settled piece in text grids.
    pub fn to_char(&self) -> char {
        match self {
            Player::Player1 => 'X',
            Player::Player2 => 'O',
            Player::Ai => 'A',
        }
    }

    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Player::Player1 => "41",
            Player::Player2 => "43",
            Player::Ai => "44",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Lifecycle tag of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// A resting piece. Only settled pieces take part in alignments.
    Settled,
    /// Part of a resolved alignment, waiting to be cleared.
    MarkedForRemoval,
}

/// State of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied { owner: Player, phase: Phase },
}

impl Cell {
    /// A resting piece owned by `owner`.
    pub fn settled(owner: Player) -> Self {
        Cell::Occupied {
            owner,
            phase: Phase::Settled,
        }
    }

    /// A piece owned by `owner` that is pending removal.
    pub fn marked(owner: Player) -> Self {
        Cell::Occupied {
            owner,
            phase: Phase::MarkedForRemoval,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Owner of the piece, whatever its phase.
    pub fn owner(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { owner, .. } => Some(*owner),
        }
    }

    /// Owner of the piece if it is settled. Detection only ever looks at this.
    pub fn settled_owner(&self) -> Option<Player> {
        match self {
            Cell::Occupied {
                owner,
                phase: Phase::Settled,
            } => Some(*owner),
            _ => None,
        }
    }

    /// Converts the cell to its character representation.
    ///
    /// Settled pieces use the owner's upper-case letter, marked pieces the lower-case one.
    ///
    /// ```
    /// use combo_four::engine::{Cell, Player};
    /// assert_eq!(Cell::Empty.to_char(), '.');
    /// assert_eq!(Cell::settled(Player::Player2).to_char(), 'O');
    /// assert_eq!(Cell::marked(Player::Player1).to_char(), 'x');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied {
                owner,
                phase: Phase::Settled,
            } => owner.to_char(),
            Cell::Occupied {
                owner,
                phase: Phase::MarkedForRemoval,
            } => owner.to_char().to_ascii_lowercase(),
        }
    }

    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Cell::Empty => "40",
            Cell::Occupied { owner, .. } => owner.to_ansi_color_code(),
        }
    }
}

/// The game grid.
///
/// Row 0 is the top, row `height - 1` the bottom. Every operation that moves pieces keeps
/// the gravity invariant: the occupied cells of a column form a contiguous run that starts
/// at the bottom row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of the standard 8x7 size.
    ///
    /// ```
    /// use combo_four::engine::{Board, Cell, DEFAULT_HEIGHT, DEFAULT_WIDTH};
    /// let board = Board::new_empty();
    /// assert_eq!((board.height(), board.width()), (DEFAULT_HEIGHT, DEFAULT_WIDTH));
    /// assert_eq!(board.get_cell(0, 0), Cell::Empty);
    /// ```
    pub fn new_empty() -> Self {
        Board::with_size(DEFAULT_HEIGHT, DEFAULT_WIDTH)
    }

    /// Creates an empty board with the given number of rows and columns.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn with_size(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "board dimensions must be non-zero");
        Board {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        }
    }

    /// Builds a standard-size board by dropping `pieces` pieces into random columns,
    /// alternating `Player1` and `Player2`.
    ///
    /// No alignment is resolved, so the result may contain completed lines. The same seed
    /// always yields the same board. Useful for reproducible openings and property sweeps.
    pub fn new_random_with_seed(seed: u64, pieces: usize) -> Self {
        let mut board = Board::new_empty();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut player = Player::Player1;

        for _ in 0..pieces {
            let open = board.open_columns();
            if open.is_empty() {
                break;
            }
            let col = open[rng.gen_range(0..open.len())];
            board.place(col, player);
            player = if player == Player::Player1 {
                Player::Player2
            } else {
                Player::Player1
            };
        }
        board
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the cell at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board.
    pub fn get_cell(&self, r: usize, c: usize) -> Cell {
        assert!(r < self.height && c < self.width, "cell ({r}, {c}) out of bounds");
        self.cells[r * self.width + c]
    }

    /// Overwrites the cell at row `r`, column `c`.
    ///
    /// This bypasses gravity; callers are responsible for keeping the invariant.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board.
    pub fn set_cell(&mut self, r: usize, c: usize, cell: Cell) {
        assert!(r < self.height && c < self.width, "cell ({r}, {c}) out of bounds");
        self.cells[r * self.width + c] = cell;
    }

    /// Signed bounds check used by the directional scans.
    pub fn contains(&self, r: isize, c: isize) -> bool {
        r >= 0 && c >= 0 && (r as usize) < self.height && (c as usize) < self.width
    }

    /// True iff the topmost cell of `col` is occupied. Columns outside the board count
    /// as full, so nothing can ever be placed there.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.width || !self.get_cell(0, col).is_empty()
    }

    /// Row a piece dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.width {
            return None;
        }
        (0..self.height)
            .rev()
            .find(|&r| self.get_cell(r, col).is_empty())
    }

    /// Drops a settled piece for `player` into `col`.
    ///
    /// Returns the landing row, or `None` (leaving the board untouched) when the column is
    /// full or outside the board.
    ///
    /// ```
    /// use combo_four::engine::{Board, Cell, Player};
    /// let mut board = Board::new_empty();
    /// assert_eq!(board.place(3, Player::Player1), Some(7));
    /// assert_eq!(board.place(3, Player::Player2), Some(6));
    /// assert_eq!(board.get_cell(7, 3), Cell::settled(Player::Player1));
    /// ```
    pub fn place(&mut self, col: usize, player: Player) -> Option<usize> {
        let row = self.landing_row(col)?;
        self.set_cell(row, col, Cell::settled(player));
        Some(row)
    }

    /// Non-full columns, left to right.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&c| !self.is_column_full(c)).collect()
    }

    /// True when every column is full.
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|c| self.is_column_full(c))
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Sets every listed cell to the `MarkedForRemoval` phase, keeping its owner.
    /// Empty cells in the list are ignored.
    pub fn mark_for_removal(&mut self, coords: &[(usize, usize)]) {
        for &(r, c) in coords {
            if let Some(owner) = self.get_cell(r, c).owner() {
                self.set_cell(r, c, Cell::marked(owner));
            }
        }
    }

    /// Empties every marked cell and returns how many were cleared.
    pub fn clear_marked(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut() {
            if let Cell::Occupied {
                phase: Phase::MarkedForRemoval,
                ..
            } = cell
            {
                *cell = Cell::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Compacts every column downwards, keeping the vertical order of its pieces.
    ///
    /// Idempotent: a second application leaves the board unchanged.
    pub fn apply_gravity(&mut self) {
        for c in 0..self.width {
            let mut empty_slot = self.height - 1;
            for r_check in (0..self.height).rev() {
                let cell = self.get_cell(r_check, c);
                if !cell.is_empty() {
                    if r_check != empty_slot {
                        self.set_cell(empty_slot, c, cell);
                        self.set_cell(r_check, c, Cell::Empty);
                    }
                    empty_slot = empty_slot.saturating_sub(1);
                }
            }
        }
    }

    /// First column (left to right) whose pieces are not a bottom-anchored run.
    pub fn gravity_violation(&self) -> Option<usize> {
        (0..self.width).find(|&c| {
            let mut seen_empty = false;
            for r in (0..self.height).rev() {
                if self.get_cell(r, c).is_empty() {
                    seen_empty = true;
                } else if seen_empty {
                    return true;
                }
            }
            false
        })
    }

    /// Generates a terminal rendering of the board with an optional highlighted cell.
    ///
    /// Pieces are drawn with ANSI background colours, marked pieces show `**` and the
    /// highlighted cell shows `..`.
    pub fn to_string_with_highlight(&self, pos: Option<(usize, usize)>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..self.width {
            output.push_str(&format!("{:<2}", c_idx));
        }
        output.push('\n');

        for r_idx in 0..self.height {
            output.push_str(&format!("{:<2}", r_idx));

            for c_idx in 0..self.width {
                let cell = self.get_cell(r_idx, c_idx);
                let is_highlight = pos == Some((r_idx, c_idx));
                let content = if is_highlight {
                    ".."
                } else if matches!(
                    cell,
                    Cell::Occupied {
                        phase: Phase::MarkedForRemoval,
                        ..
                    }
                ) {
                    "**"
                } else {
                    "  "
                };
                output.push_str(&format!(
                    "\x1b[1;{};m{}\x1b[m",
                    cell.to_ansi_color_code(),
                    content
                ));
            }
            if r_idx < self.height - 1 {
                output.push('\n');
            }
        }

        output
    }

    /// Plain-text grid, one line per row, using [`Cell::to_char`].
    pub fn to_plain_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|r| (0..self.width).map(|c| self.get_cell(r, c).to_char()).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}
