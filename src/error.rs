use crate::engine::Player;
use std::path::PathBuf;

/// Why a column cannot take a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("column is full")]
    ColumnFull,

    #[error("column is outside the board (width {width})")]
    OutOfRange { width: usize },
}

/// Rejections of a move request. None of them changes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid move in column {column}: {reason}")]
    InvalidMove { column: usize, reason: InvalidMove },

    #[error("game is already over")]
    GameAlreadyOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Player),

    #[error("{0} has no seat in this game")]
    NotSeated(Player),
}

/// Errors that can occur when loading a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised while ingesting a persisted board.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is {found_height}x{found_width}, expected {height}x{width}")]
    Dimensions {
        height: usize,
        width: usize,
        found_height: usize,
        found_width: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column {column} has a gap beneath a piece")]
    GravityViolation { column: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        let err = MoveError::InvalidMove {
            column: 3,
            reason: InvalidMove::ColumnFull,
        };
        assert_eq!(err.to_string(), "invalid move in column 3: column is full");

        let err = MoveError::InvalidMove {
            column: 9,
            reason: InvalidMove::OutOfRange { width: 7 },
        };
        assert_eq!(
            err.to_string(),
            "invalid move in column 9: column is outside the board (width 7)"
        );
        assert_eq!(
            MoveError::NotYourTurn(Player::Player2).to_string(),
            "it is not player2's turn"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("win_threshold must be 1, 3 or 5".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: win_threshold must be 1, 3 or 5"
        );
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::GravityViolation { column: 2 };
        assert_eq!(err.to_string(), "column 2 has a gap beneath a piece");
    }
}
