use serde::{Deserialize, Serialize};

use fighters_core::geometry::Bounds;

/// Data-driven configuration for the arena simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width.
    pub arena_width: f32,
    /// Arena height.
    pub arena_height: f32,
    /// Obstacle layout name (`classic`, `open`, or a JSON file in the arenas directory).
    pub layout: String,
    /// Distance past the arena edge at which bot and turret projectiles are destroyed.
    pub projectile_pad: f32,
    /// Bots alive at match start.
    pub initial_bots: usize,
    /// Bots ignore anything at or beyond this distance.
    pub bot_visibility: f32,
    /// Multiplier applied to the player's distance when bots pick a target (< 1 = preferred).
    pub player_priority: f32,
    /// Replacement bots must spawn strictly farther than this from the player.
    pub spawn_safe_distance: f32,
    /// Random placement attempts per replacement bot.
    pub spawn_attempts: u32,
    /// Spawn points stay this far from the arena edge.
    pub spawn_margin: f32,
    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            arena_width: 1000.0,
            arena_height: 700.0,
            layout: "classic".to_string(),
            projectile_pad: 50.0,
            initial_bots: 3,
            bot_visibility: 400.0,
            player_priority: 0.7,
            spawn_safe_distance: 150.0,
            spawn_attempts: 10,
            spawn_margin: 50.0,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("FIGHTERS_ARENA_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path, error = %e, "Failed to parse arena config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/arena.toml") {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "Failed to parse config/arena.toml"),
            }
        }
        Self::default()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.arena_width, self.arena_height)
    }

    /// Same config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_arena() {
        let cfg = ArenaConfig::default();
        assert_eq!(cfg.bounds(), Bounds::new(1000.0, 700.0));
        assert_eq!(cfg.initial_bots, 3);
        assert_eq!(cfg.spawn_attempts, 10);
        assert!((cfg.player_priority - 0.7).abs() < f32::EPSILON);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: ArenaConfig = toml::from_str(
            r#"
layout = "open"
initial_bots = 5
seed = 42
"#,
        )
        .unwrap();
        assert_eq!(cfg.layout, "open");
        assert_eq!(cfg.initial_bots, 5);
        assert_eq!(cfg.seed, Some(42));
        assert!((cfg.bot_visibility - 400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        unsafe {
            std::env::set_var("FIGHTERS_ARENA_CONFIG", "/nonexistent/arena.toml");
        }
        let cfg = ArenaConfig::load();
        assert!((cfg.arena_width - 1000.0).abs() < f32::EPSILON);
        unsafe {
            std::env::remove_var("FIGHTERS_ARENA_CONFIG");
        }
    }
}
