use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;

/// Unique identifier for a combatant within a match.
pub type EntityId = u64;

/// What dealt the killing blow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    Bullet,
    Turret,
    Mine,
}

/// Final result of a match, reported to the stats collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub kills: u32,
    pub archetype: Archetype,
    pub ticks: u64,
}

/// Events emitted by the simulation during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    PlayerHit {
        damage: i32,
        health: i32,
    },
    BotKilled {
        bot_id: EntityId,
        archetype: Archetype,
        cause: HitSource,
    },
    BotSpawned {
        bot_id: EntityId,
        archetype: Archetype,
        x: f32,
        y: f32,
    },
    /// No safe spawn point was found; the arena runs one bot short.
    SpawnFailed {
        attempts: u32,
    },
    MatchOver(MatchSummary),
}

impl MatchEvent {
    pub fn is_kill(&self) -> bool {
        matches!(self, MatchEvent::BotKilled { .. })
    }
}
