//! Error types for the simulation and its drivers.

use std::fmt;

/// Errors returned by simulation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The run has ended; nothing advances until reset.
    GameOver {
        /// Final score of the finished run.
        score: u32,
        /// Level reached by the finished run.
        level: u32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::GameOver { score, level } => {
                write!(f, "game is over (score {score}, level {level})")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Errors loading settings from disk.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(std::io::Error),
    /// The settings file is not valid settings JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
