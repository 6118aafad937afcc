use std::fmt;

use serde::Deserialize;

use fighters_core::archetype::Archetype;

/// Fastest pace the loop accepts, in ticks per second.
pub const MAX_TICK_RATE: f32 = 1000.0;

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Top-level runner configuration, loaded from `fighters.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Ticks per second. `None` uses the simulation's own rate.
    pub tick_rate: Option<f32>,
    pub archetype: Archetype,
    pub stats_path: String,
    /// Stop a match after this many simulated ticks. `None` plays until the player falls.
    pub max_ticks: Option<u64>,
    /// Matches to play back to back.
    pub match_count: u32,
    pub log_format: LogFormat,
    /// Log a HUD line every this many ticks.
    pub hud_interval: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_rate: None,
            archetype: Archetype::Gunner,
            stats_path: "brawl_stats.json".to_string(),
            max_ticks: None,
            match_count: 1,
            log_format: LogFormat::Pretty,
            hud_interval: 60,
        }
    }
}

/// Fatal misconfiguration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidTickRate(f32),
    ZeroMatches,
    ZeroHudInterval,
    EmptyStatsPath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTickRate(rate) => {
                write!(f, "tick_rate must be in (0, {MAX_TICK_RATE}], got {rate}")
            },
            ConfigError::ZeroMatches => write!(f, "match_count must be > 0"),
            ConfigError::ZeroHudInterval => write!(f, "hud_interval must be > 0"),
            ConfigError::EmptyStatsPath => write!(f, "stats_path must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunnerConfig {
    /// Load config from `fighters.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("fighters.toml") {
            Ok(content) => match toml::from_str::<RunnerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from fighters.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse fighters.toml: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No fighters.toml found, using defaults");
                RunnerConfig::default()
            },
        };
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FIGHTERS_STATS_PATH")
            && !path.is_empty()
        {
            self.stats_path = path;
        }
        if let Ok(val) = std::env::var("FIGHTERS_ARCHETYPE") {
            match val.parse::<Archetype>() {
                Ok(archetype) => self.archetype = archetype,
                Err(e) => tracing::warn!("Ignoring FIGHTERS_ARCHETYPE: {e}"),
            }
        }
        if let Ok(val) = std::env::var("FIGHTERS_TICK_RATE")
            && let Ok(rate) = val.parse::<f32>()
        {
            self.tick_rate = Some(rate);
        }
    }

    /// Check for fatal misconfiguration.
    pub fn check(&self) -> Result<(), ConfigError> {
        if let Some(rate) = self.tick_rate
            && !(rate.is_finite() && rate > 0.0 && rate <= MAX_TICK_RATE)
        {
            return Err(ConfigError::InvalidTickRate(rate));
        }
        if self.match_count == 0 {
            return Err(ConfigError::ZeroMatches);
        }
        if self.hud_interval == 0 {
            return Err(ConfigError::ZeroHudInterval);
        }
        if self.stats_path.trim().is_empty() {
            return Err(ConfigError::EmptyStatsPath);
        }
        Ok(())
    }

    /// Validate configuration, exiting on fatal errors and logging warnings for the rest.
    pub fn validate(&self) {
        if let Err(e) = self.check() {
            tracing::error!("{e}");
            std::process::exit(1);
        }
        if self.max_ticks == Some(0) {
            tracing::warn!("max_ticks is 0, matches will end immediately");
        }
    }
}
