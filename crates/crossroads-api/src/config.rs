//! Environment-driven server configuration.

use std::path::PathBuf;
use std::time::Duration;

use crossroads_session::application::advance_scheduler::AdvanceMode;

use crate::error::AppError;

/// Default pause before a deferred advance fires in timed mode.
const DEFAULT_ADVANCE_DELAY_MS: u64 = 2000;

/// Server configuration read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind, `HOST` (default `0.0.0.0`).
    pub host: String,
    /// Port to bind, `PORT` (default `3000`).
    pub port: u16,
    /// Advance mode, `ADVANCE_MODE` = `manual` | `timed` (default `manual`);
    /// `ADVANCE_DELAY_MS` sets the timed pause.
    pub advance_mode: AdvanceMode,
    /// Optional YAML deck file, `DECK_PATH`; the built-in deck otherwise.
    pub deck_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for unparseable values or an unknown
    /// advance mode.
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        let delay_ms: u64 = std::env::var("ADVANCE_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_ADVANCE_DELAY_MS.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("ADVANCE_DELAY_MS must be a valid u64: {e}")))?;

        let advance_mode = match std::env::var("ADVANCE_MODE")
            .unwrap_or_else(|_| "manual".to_string())
            .as_str()
        {
            "manual" => AdvanceMode::Manual,
            "timed" => AdvanceMode::Timed(Duration::from_millis(delay_ms)),
            other => {
                return Err(AppError::Config(format!(
                    "ADVANCE_MODE must be 'manual' or 'timed', got '{other}'"
                )));
            }
        };

        let deck_path = std::env::var("DECK_PATH").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            advance_mode,
            deck_path,
        })
    }
}
