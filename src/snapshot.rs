//! Persisted board representation.
//!
//! A snapshot is a 2D array (top row first) where each cell is either `null` or an
//! `{ "owner": ..., "phase": ... }` record:
//!
//! ```json
//! [[null, null], [{"owner": "player1", "phase": "settled"}, null]]
//! ```
//!
//! Ingestion is defensive about individual cells: an unknown owner or phase is logged and
//! read as an empty cell. Structural faults (wrong dimensions, ragged rows, a gap beneath
//! a piece) are rejected instead.
use serde::{Deserialize, Serialize};

use crate::engine::{Board, Cell, Phase, Player};
use crate::error::SnapshotError;
use crate::game::Game;

const SETTLED: &str = "settled";
const MARKED_FOR_REMOVAL: &str = "marked-for-removal";

/// One occupied cell as stored. Both fields are optional so that partial records still
/// deserialize and can be normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceRecord {
    pub owner: Option<String>,
    pub phase: Option<String>,
}

impl PieceRecord {
    fn from_cell(cell: Cell) -> Option<PieceRecord> {
        match cell {
            Cell::Empty => None,
            Cell::Occupied { owner, phase } => Some(PieceRecord {
                owner: Some(owner.id().to_string()),
                phase: Some(
                    match phase {
                        Phase::Settled => SETTLED,
                        Phase::MarkedForRemoval => MARKED_FOR_REMOVAL,
                    }
                    .to_string(),
                ),
            }),
        }
    }

    /// The cell this record stands for, or `None` if the record is malformed.
    /// A record without a phase is a settled piece.
    fn to_cell(&self) -> Option<Cell> {
        let owner = Player::from_id(self.owner.as_deref()?)?;
        let phase = match self.phase.as_deref() {
            None | Some(SETTLED) => Phase::Settled,
            Some(MARKED_FOR_REMOVAL) => Phase::MarkedForRemoval,
            Some(_) => return None,
        };
        Some(Cell::Occupied { owner, phase })
    }
}

/// Serializable copy of a board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot {
    pub cells: Vec<Vec<Option<PieceRecord>>>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        let cells = (0..board.height())
            .map(|r| {
                (0..board.width())
                    .map(|c| PieceRecord::from_cell(board.get_cell(r, c)))
                    .collect()
            })
            .collect();
        BoardSnapshot { cells }
    }

    /// (rows, columns of the first row) as stored.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cells.len(), self.cells.first().map_or(0, Vec::len))
    }

    /// Rebuilds a `height` x `width` board.
    ///
    /// Malformed cells become `Empty` with a warning. The result must satisfy gravity.
    ///
    /// # Examples
    /// ```
    /// use combo_four::engine::{Board, Player};
    /// use combo_four::snapshot::BoardSnapshot;
    ///
    /// let mut board = Board::new_empty();
    /// board.place(2, Player::Ai);
    /// let json = BoardSnapshot::from_board(&board).to_json().unwrap();
    ///
    /// let restored = BoardSnapshot::from_json(&json).unwrap().to_board(8, 7).unwrap();
    /// assert_eq!(restored, board);
    /// ```
    pub fn to_board(&self, height: usize, width: usize) -> Result<Board, SnapshotError> {
        let (found_height, found_width) = self.dimensions();
        if height == 0 || width == 0 || found_height != height {
            return Err(SnapshotError::Dimensions {
                height,
                width,
                found_height,
                found_width,
            });
        }

        let mut board = Board::with_size(height, width);
        for (r, row) in self.cells.iter().enumerate() {
            if row.len() != width {
                return Err(SnapshotError::RaggedRow {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            for (c, record) in row.iter().enumerate() {
                let Some(record) = record else {
                    continue;
                };
                match record.to_cell() {
                    Some(cell) => board.set_cell(r, c, cell),
                    None => log::warn!(
                        "snapshot cell ({}, {}) has malformed record {:?}, reading it as empty",
                        r,
                        c,
                        record
                    ),
                }
            }
        }

        if let Some(column) = board.gravity_violation() {
            return Err(SnapshotError::GravityViolation { column });
        }
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Game {
    /// Persisted form of the current board.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(self.board())
    }
}
