//! Main application configuration
//!
//! This module defines the configuration structures for the crosstable
//! binary, including TOML file loading, environment variable overrides and
//! validation.

use crate::rating::elo::EloConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub elo: EloConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "crosstable".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// A player seeded into the simulated tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPlayer {
    pub id: String,
    pub rating: f64,
}

/// Settings for the bundled tournament simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub tournament_name: String,
    pub rounds: u32,
    pub players: Vec<SeedPlayer>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let ratings = [
            1850.0, 1720.0, 1650.0, 1540.0, 1430.0, 1310.0, 1200.0, 1080.0,
        ];
        Self {
            tournament_name: "Crosstable Open".to_string(),
            rounds: 3,
            players: ratings
                .iter()
                .enumerate()
                .map(|(i, rating)| SeedPlayer {
                    id: format!("player{}", i + 1),
                    rating: *rating,
                })
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to
    /// defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(threshold) = env::var("ELO_MASTER_THRESHOLD") {
            config.elo.master_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_MASTER_THRESHOLD value: {}", threshold))?;
        }
        if let Ok(rounds) = env::var("SIMULATION_ROUNDS") {
            config.simulation.rounds = rounds
                .parse()
                .map_err(|_| anyhow!("Invalid SIMULATION_ROUNDS value: {}", rounds))?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.elo.validate()?;

    // Validate simulation settings
    if config.simulation.rounds == 0 {
        return Err(anyhow!("Simulation must have at least one round"));
    }
    if config.simulation.players.is_empty() || config.simulation.players.len() % 2 != 0 {
        return Err(anyhow!(
            "Simulation needs an even, non-zero player count (got {})",
            config.simulation.players.len()
        ));
    }

    Ok(())
}
