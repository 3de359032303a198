use crate::engine::{Board, Cell, Player, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Parses an array of string slices into a standard-size `Board`.
///
/// See [`board_from_str_array_with_size`] for the format.
///
/// # Examples
/// ```
/// use combo_four::utils::board_from_str_array;
/// use combo_four::engine::{Cell, Player, DEFAULT_HEIGHT};
///
/// let board = board_from_str_array(&[
///     "O",     // second row from the bottom
///     "XXa",   // bottom row
/// ]).unwrap();
/// let bottom = DEFAULT_HEIGHT - 1;
/// assert_eq!(board.get_cell(bottom, 0), Cell::settled(Player::Player1));
/// assert_eq!(board.get_cell(bottom, 2), Cell::marked(Player::Ai));
/// assert_eq!(board.get_cell(bottom - 1, 0), Cell::settled(Player::Player2));
/// assert_eq!(board.get_cell(bottom - 1, 1), Cell::Empty);
///
/// assert!(board_from_str_array(&["X?O"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, String> {
    board_from_str_array_with_size(s, DEFAULT_HEIGHT, DEFAULT_WIDTH)
}

/// Parses rows of text into a `height` x `width` board.
///
/// The rows are listed top to bottom, but they are anchored to the *bottom* of the board:
/// with fewer than `height` rows, the missing rows are empty rows at the top. A row shorter
/// than `width` is padded with empty cells on the right.
///
/// Valid characters:
/// - `'.'`: empty
/// - `'X'`, `'O'`, `'A'`: settled piece of `player1`, `player2`, `ai`
/// - `'x'`, `'o'`, `'a'`: the same owners, marked for removal
///
/// No gravity check is done here; boards with floating pieces can be written on purpose.
///
/// # Returns
/// * `Err(String)` if there are more rows than `height`, a row is longer than `width`,
///   or a character is not recognized.
pub fn board_from_str_array_with_size(
    s: &[&str],
    height: usize,
    width: usize,
) -> Result<Board, String> {
    if s.len() > height {
        return Err(format!(
            "Invalid number of rows. Expected at most {}, found {}",
            height,
            s.len()
        ));
    }

    let mut board = Board::with_size(height, width);
    let top_offset = height - s.len();

    for (i, row_str) in s.iter().enumerate() {
        let r = top_offset + i;
        if row_str.chars().count() > width {
            return Err(format!(
                "Row {} is too long. Expected at most {} characters, found {}",
                i,
                width,
                row_str.chars().count()
            ));
        }

        for (c, ch) in row_str.chars().enumerate() {
            let cell = cell_from_char(ch).ok_or_else(|| {
                format!("Unrecognized character '{}' in row {} col {}", ch, i, c)
            })?;
            board.set_cell(r, c, cell);
        }
    }
    Ok(board)
}

/// Inverse of [`Cell::to_char`].
pub fn cell_from_char(ch: char) -> Option<Cell> {
    let cell = match ch {
        '.' => Cell::Empty,
        'X' => Cell::settled(Player::Player1),
        'O' => Cell::settled(Player::Player2),
        'A' => Cell::settled(Player::Ai),
        'x' => Cell::marked(Player::Player1),
        'o' => Cell::marked(Player::Player2),
        'a' => Cell::marked(Player::Ai),
        _ => return None,
    };
    Some(cell)
}

/// Parses a board file in the text-grid format.
///
/// Blank lines and surrounding whitespace are ignored. The grid must have exactly as many
/// lines as the board has rows and every line must be exactly as wide as the board.
pub fn board_from_text(content: &str, height: usize, width: usize) -> Result<Board, String> {
    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if lines.len() != height {
        return Err(format!(
            "Expected {} lines in board file, found {}",
            height,
            lines.len()
        ));
    }
    for (i, line) in lines.iter().enumerate() {
        if line.chars().count() != width {
            return Err(format!(
                "Line {} has {} characters (expected {})",
                i + 1,
                line.chars().count(),
                width
            ));
        }
    }

    board_from_str_array_with_size(&lines, height, width)
}
