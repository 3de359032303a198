//! Connect-four detection.
//!
//! An alignment is exactly four consecutive settled pieces of one owner along one of four
//! directions. The scan walks the board row-major and, for every piece of the player that no
//! alignment in that direction covers yet, extends both ways to the full run and reports the
//! four-cell window starting at that piece (or the last four cells of the run when fewer
//! than four remain after it). Windows may overlap: a run of 5 yields two alignments and all
//! five cells are removed, a run of 8 yields two disjoint ones. Alignments along different
//! directions are reported independently even when they share cells.
use crate::engine::{Board, Player};
use std::collections::BTreeSet;

/// Length of a scoring line.
pub const ALIGNMENT_LEN: usize = 4;

/// Scan directions, expressed as (row, column) steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDownRight,
        Direction::DiagonalDownLeft,
    ];

    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }

    fn index(&self) -> usize {
        match self {
            Direction::Horizontal => 0,
            Direction::Vertical => 1,
            Direction::DiagonalDownRight => 2,
            Direction::DiagonalDownLeft => 3,
        }
    }
}

/// Four same-owner cells in a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub player: Player,
    pub direction: Direction,
    /// Cells in scan direction order.
    pub cells: [(usize, usize); ALIGNMENT_LEN],
}

fn owned_by(board: &Board, r: isize, c: isize, player: Player) -> bool {
    board.contains(r, c) && board.get_cell(r as usize, c as usize).settled_owner() == Some(player)
}

/// Finds every alignment of `player` on `board`.
///
/// The result is ordered by the scan: row-major over starting cells, and for each cell
/// horizontal, vertical, down-right, down-left.
///
/// ```
/// use combo_four::detector::{find_alignments, Direction};
/// use combo_four::engine::Player;
/// use combo_four::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["XXXXO"]).unwrap();
/// let found = find_alignments(&board, Player::Player1);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].direction, Direction::Horizontal);
/// assert_eq!(found[0].cells, [(7, 0), (7, 1), (7, 2), (7, 3)]);
/// assert!(find_alignments(&board, Player::Player2).is_empty());
/// ```
pub fn find_alignments(board: &Board, player: Player) -> Vec<Alignment> {
    let width = board.width();
    let mut covered = vec![[false; 4]; board.height() * width];
    let mut found = Vec::new();

    for r in 0..board.height() {
        for c in 0..width {
            if board.get_cell(r, c).settled_owner() != Some(player) {
                continue;
            }
            for direction in Direction::ALL {
                let d = direction.index();
                if covered[r * width + c][d] {
                    continue;
                }
                let run = run_through(board, (r, c), direction, player);
                if run.len() < ALIGNMENT_LEN {
                    continue;
                }

                let Some(at) = run.iter().position(|&cell| cell == (r, c)) else {
                    continue;
                };
                let start = at.min(run.len() - ALIGNMENT_LEN);
                let window = &run[start..start + ALIGNMENT_LEN];
                for &(ar, ac) in window {
                    covered[ar * width + ac][d] = true;
                }
                found.push(Alignment {
                    player,
                    direction,
                    cells: [window[0], window[1], window[2], window[3]],
                });
            }
        }
    }
    found
}

/// True iff [`find_alignments`] would report at least one alignment.
///
/// Checks windows directly without allocating, since the search calls it at every node.
pub fn has_alignment(board: &Board, player: Player) -> bool {
    for r in 0..board.height() {
        for c in 0..board.width() {
            if board.get_cell(r, c).settled_owner() != Some(player) {
                continue;
            }
            for direction in Direction::ALL {
                let (dr, dc) = direction.delta();
                let complete = (1..ALIGNMENT_LEN as isize).all(|i| {
                    owned_by(board, r as isize + dr * i, c as isize + dc * i, player)
                });
                if complete {
                    return true;
                }
            }
        }
    }
    false
}

/// Union of the cells of `alignments`. Cells shared between alignments appear once.
pub fn removal_set(alignments: &[Alignment]) -> BTreeSet<(usize, usize)> {
    alignments
        .iter()
        .flat_map(|a| a.cells.iter().copied())
        .collect()
}

/// The maximal run of `player`'s settled pieces through `(r, c)` along `direction`,
/// in scan direction order. Empty if the cell is not a settled piece of `player`.
pub fn run_through(
    board: &Board,
    (r, c): (usize, usize),
    direction: Direction,
    player: Player,
) -> Vec<(usize, usize)> {
    let (r, c) = (r as isize, c as isize);
    if !owned_by(board, r, c, player) {
        return Vec::new();
    }
    let (dr, dc) = direction.delta();
    let (mut sr, mut sc) = (r, c);
    while owned_by(board, sr - dr, sc - dc, player) {
        sr -= dr;
        sc -= dc;
    }
    let mut run = Vec::new();
    while owned_by(board, sr, sc, player) {
        run.push((sr as usize, sc as usize));
        sr += dr;
        sc += dc;
    }
    run
}
