use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Настройки движка. Читаются из JSON, отсутствующие поля – по умолчанию.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Верхняя граница max_players для CreateTable.
    pub max_seats: u8,
    /// Сколько готовых игроков нужно для StartHand (не меньше 2).
    pub min_players_to_start: usize,
    /// Тасовать колоду детерминированно от hand root (реплей, тесты).
    pub seeded_decks: bool,
    /// Снимать снапшот каждые N событий потока. `None` – не снимать.
    pub snapshot_every: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_seats: 10,
            min_players_to_start: 2,
            seeded_decks: false,
            snapshot_every: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse engine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid engine config: {0}")]
    Invalid(String),
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_seats < 2 {
            return Err(ConfigError::Invalid(format!(
                "max_seats must be at least 2, got {}",
                self.max_seats
            )));
        }
        if self.min_players_to_start < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_players_to_start must be at least 2, got {}",
                self.min_players_to_start
            )));
        }
        if self.min_players_to_start > usize::from(self.max_seats) {
            return Err(ConfigError::Invalid(
                "min_players_to_start exceeds max_seats".to_string(),
            ));
        }
        if self.snapshot_every == Some(0) {
            return Err(ConfigError::Invalid("snapshot_every must be positive".to_string()));
        }
        Ok(())
    }
}
