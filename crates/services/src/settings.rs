use std::env;
use std::time::Duration;

use quiz_core::model::{DEFAULT_MAX_LEVEL, Level};

use crate::error::SettingsError;

/// Tunables shared by every session of a `GameService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    max_level: Level,
    hint_timeout: Duration,
    session_ttl: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_level: Level::new(DEFAULT_MAX_LEVEL).unwrap_or(Level::FIRST),
            hint_timeout: Duration::from_secs(10),
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl GameSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if `max_level` is zero or a duration is zero.
    pub fn new(
        max_level: u32,
        hint_timeout: Duration,
        session_ttl: Duration,
    ) -> Result<Self, SettingsError> {
        let max_level = Level::new(max_level).map_err(|_| SettingsError::InvalidMaxLevel)?;
        if hint_timeout.is_zero() {
            return Err(SettingsError::InvalidHintTimeout);
        }
        if session_ttl.is_zero() {
            return Err(SettingsError::InvalidSessionTtl);
        }
        Ok(Self {
            max_level,
            hint_timeout,
            session_ttl,
        })
    }

    /// Reads `QUIZ_MAX_LEVEL`, `QUIZ_HINT_TIMEOUT_SECS` and `QUIZ_SESSION_TTL_SECS`,
    /// falling back to the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidEnv` for values that do not parse, or the
    /// validation errors of [`GameSettings::new`].
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let max_level = env_u64("QUIZ_MAX_LEVEL")?
            .map(|v| u32::try_from(v).map_err(|_| SettingsError::InvalidMaxLevel))
            .transpose()?
            .unwrap_or(defaults.max_level.value());
        let hint_timeout = env_u64("QUIZ_HINT_TIMEOUT_SECS")?
            .map_or(defaults.hint_timeout, Duration::from_secs);
        let session_ttl = env_u64("QUIZ_SESSION_TTL_SECS")?
            .map_or(defaults.session_ttl, Duration::from_secs);
        Self::new(max_level, hint_timeout, session_ttl)
    }

    #[must_use]
    pub fn with_max_level(mut self, max_level: Level) -> Self {
        self.max_level = max_level;
        self
    }

    /// Override the hint timeout. A zero duration is ignored and the current value kept,
    /// since a zero timeout would turn every AI support into a fallback.
    #[must_use]
    pub fn with_hint_timeout(mut self, hint_timeout: Duration) -> Self {
        if !hint_timeout.is_zero() {
            self.hint_timeout = hint_timeout;
        }
        self
    }

    #[must_use]
    pub fn max_level(&self) -> Level {
        self.max_level
    }

    #[must_use]
    pub fn hint_timeout(&self) -> Duration {
        self.hint_timeout
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

fn env_u64(var: &'static str) -> Result<Option<u64>, SettingsError> {
    match env::var(var) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SettingsError::InvalidEnv { var, raw }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_game() {
        let settings = GameSettings::default();
        assert_eq!(settings.max_level().value(), 8);
        assert_eq!(settings.hint_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn new_rejects_zero_values() {
        let ttl = Duration::from_secs(60);
        assert_eq!(
            GameSettings::new(0, Duration::from_secs(1), ttl),
            Err(SettingsError::InvalidMaxLevel)
        );
        assert_eq!(
            GameSettings::new(8, Duration::ZERO, ttl),
            Err(SettingsError::InvalidHintTimeout)
        );
        assert_eq!(
            GameSettings::new(8, Duration::from_secs(1), Duration::ZERO),
            Err(SettingsError::InvalidSessionTtl)
        );
    }

    #[test]
    fn zero_hint_timeout_override_is_ignored() {
        let settings = GameSettings::default().with_hint_timeout(Duration::ZERO);
        assert_eq!(settings.hint_timeout(), Duration::from_secs(10));
    }
}
