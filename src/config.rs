use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::ConfigError;
use crate::solver::Difficulty;

/// Win thresholds a session may be configured with.
pub const ALLOWED_WIN_THRESHOLDS: [u32; 3] = [1, 3, 5];
/// Per-move time limits (seconds) a session may be configured with, besides none.
pub const ALLOWED_TIME_LIMITS_SECS: [u64; 2] = [30, 60];
/// Smallest board side on which an alignment fits.
pub const MIN_BOARD_SIDE: usize = 4;

/// Session parameters, read once when a game is created.
///
/// ```
/// use combo_four::config::SessionConfig;
/// use combo_four::solver::Difficulty;
///
/// let config = SessionConfig::from_toml_str(
///     "win_threshold = 5\ntime_limit_secs = 30\nai_difficulty = \"deep\"\n",
/// ).unwrap();
/// assert_eq!(config.win_threshold, 5);
/// assert_eq!(config.ai_difficulty, Some(Difficulty::Deep));
/// assert_eq!(config.width, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub height: usize,
    pub width: usize,
    /// Score at which a player wins.
    pub win_threshold: u32,
    /// Per-move time limit; `None` disables the clock.
    pub time_limit_secs: Option<u64>,
    /// When set, the second seat is the computer opponent at this difficulty.
    pub ai_difficulty: Option<Difficulty>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            win_threshold: 3,
            time_limit_secs: None,
            ai_difficulty: None,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALLOWED_WIN_THRESHOLDS.contains(&self.win_threshold) {
            return Err(ConfigError::Validation(format!(
                "win_threshold must be one of {:?}, got {}",
                ALLOWED_WIN_THRESHOLDS, self.win_threshold
            )));
        }
        if let Some(secs) = self.time_limit_secs {
            if !ALLOWED_TIME_LIMITS_SECS.contains(&secs) {
                return Err(ConfigError::Validation(format!(
                    "time_limit_secs must be one of {:?} or unset, got {}",
                    ALLOWED_TIME_LIMITS_SECS, secs
                )));
            }
        }
        if self.height < MIN_BOARD_SIDE || self.width < MIN_BOARD_SIDE {
            return Err(ConfigError::Validation(format!(
                "board must be at least {0}x{0}, got {1}x{2}",
                MIN_BOARD_SIDE, self.height, self.width
            )));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }

    pub fn with_win_threshold(mut self, win_threshold: u32) -> Self {
        self.win_threshold = win_threshold;
        self
    }

    pub fn with_time_limit_secs(mut self, time_limit_secs: Option<u64>) -> Self {
        self.time_limit_secs = time_limit_secs;
        self
    }

    pub fn against_ai(mut self, difficulty: Difficulty) -> Self {
        self.ai_difficulty = Some(difficulty);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.height, 8);
        assert_eq!(config.width, 7);
        assert_eq!(config.win_threshold, 3);
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = SessionConfig::from_toml_str("win_threshold = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("win_threshold"));
    }

    #[test]
    fn test_rejects_bad_time_limit() {
        let err = SessionConfig::from_toml_str("time_limit_secs = 45").unwrap_err();
        assert!(err.to_string().contains("time_limit_secs"));

        let config = SessionConfig::from_toml_str("time_limit_secs = 60").unwrap();
        assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_rejects_tiny_board() {
        let err = SessionConfig::from_toml_str("height = 3").unwrap_err();
        assert!(err.to_string().contains("at least 4x4"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SessionConfig::from_toml_str("win_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_difficulty_names() {
        for (name, difficulty) in [
            ("random", Difficulty::Random),
            ("greedy", Difficulty::Greedy),
            ("shallow", Difficulty::Shallow),
            ("deep", Difficulty::Deep),
        ] {
            let config =
                SessionConfig::from_toml_str(&format!("ai_difficulty = \"{name}\"")).unwrap();
            assert_eq!(config.ai_difficulty, Some(difficulty));
        }
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_win_threshold(1)
            .with_time_limit_secs(Some(30))
            .against_ai(Difficulty::Shallow);
        assert!(config.validate().is_ok());
        assert_eq!(config.ai_difficulty, Some(Difficulty::Shallow));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            SessionConfig::load_or_default(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = SessionConfig::load(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
