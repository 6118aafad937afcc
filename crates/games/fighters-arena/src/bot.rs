use rand::Rng;
use serde::{Deserialize, Serialize};

use fighters_core::archetype::{Archetype, Role};
use fighters_core::events::{EntityId, HitSource};
use fighters_core::geometry::{Bounds, Rect, angle_to, distance};

use crate::combatant::{Combatant, RosterEntry};
use crate::config::ArenaConfig;

/// Gunner closes in beyond this perceived distance.
const GUNNER_APPROACH_DIST: f32 = 180.0;
/// Gunner backs off inside this perceived distance.
const GUNNER_RETREAT_DIST: f32 = 150.0;
const GUNNER_RETREAT_SPEED: f32 = 0.7;
const GUNNER_FIRE_CHANCE_FAR: f32 = 0.08;
const GUNNER_FIRE_CHANCE_NEAR: f32 = 0.15;

/// Tank stops pushing once it is this close.
const TANK_APPROACH_DIST: f32 = 60.0;
const TANK_FIRE_CHANCE_FAR: f32 = 0.10;
const TANK_FIRE_CHANCE_NEAR: f32 = 0.20;

const MAGE_CHASE_WEIGHT: f32 = 0.6;
const MAGE_WANDER_WEIGHT: f32 = 0.4;
/// Ticks between zigzag heading changes while a mage is engaged.
const MAGE_ZIGZAG_TICKS: u32 = 40;
const MAGE_FIRE_CHANCE: f32 = 0.12;
const MAGE_SPECIAL_CHANCE: f32 = 0.015;

/// Per-tick special chance for every engaged bot.
const SPECIAL_CHANCE: f32 = 0.008;

const WANDER_MIN_TICKS: u32 = 30;
const WANDER_MAX_TICKS: u32 = 90;

/// Persistent AI memory for one bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotBrain {
    /// Ticks until the wander heading is re-rolled.
    pub wander_timer: u32,
    pub wander_heading: f32,
    /// Who the bot engaged on its last decision.
    pub target: Option<EntityId>,
}

/// One tick of bot output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BotDecision {
    pub move_x: f32,
    pub move_y: f32,
    /// New facing, if the bot is engaging.
    pub face: Option<f32>,
    pub fire: bool,
    /// Class ability used before moving (the mage's own trigger).
    pub special_before_move: bool,
    /// Shared ability trigger, used after moving.
    pub special: bool,
}

/// A computer-controlled combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub body: Combatant,
    pub brain: BotBrain,
    /// Source of the lethal hit, set when health first drops to zero.
    pub killed_by: Option<HitSource>,
}

impl Bot {
    /// Classes outside [`Archetype::BOT_POOL`] spawn as a gunner.
    pub fn new<R: Rng>(id: EntityId, archetype: Archetype, x: f32, y: f32, rng: &mut R) -> Self {
        let archetype = if Archetype::BOT_POOL.contains(&archetype) {
            archetype
        } else {
            tracing::debug!(%archetype, "Not a bot class, spawning a gunner");
            Archetype::Gunner
        };
        Self {
            body: Combatant::new(id, archetype, Role::Bot, x, y),
            brain: BotBrain {
                wander_timer: 0,
                wander_heading: rng.random_range(0.0..std::f32::consts::TAU),
                target: None,
            },
            killed_by: None,
        }
    }

    pub fn think<R: Rng>(
        &mut self,
        roster: &[RosterEntry],
        config: &ArenaConfig,
        rng: &mut R,
    ) -> BotDecision {
        decide(&self.body, &mut self.brain, roster, config, rng)
    }

    /// Apply a decision: face, fire, class special, move, then the shared special.
    pub fn act(&mut self, decision: BotDecision, obstacles: &[Rect], bounds: Bounds) {
        if let Some(direction) = decision.face {
            self.body.direction = direction;
        }
        if decision.fire {
            self.body.shoot();
        }
        if decision.special_before_move {
            self.body.special_attack();
        }
        self.body.move_by(decision.move_x, decision.move_y, obstacles, bounds);
        if decision.special {
            self.body.special_attack();
        }
    }
}

/// Pick the target a bot would engage and its perceived distance.
///
/// Only combatants strictly inside the visibility radius (true distance) count. The
/// player's distance is scaled by the priority factor so bots prefer the player over
/// an equally distant bot. Ties keep the earlier roster entry.
pub fn pick_target(
    me: &Combatant,
    roster: &[RosterEntry],
    config: &ArenaConfig,
) -> Option<(RosterEntry, f32)> {
    let mut best: Option<(RosterEntry, f32)> = None;
    for entry in roster {
        if entry.id == me.id {
            continue;
        }
        let d = distance(me.x, me.y, entry.x, entry.y);
        if d >= config.bot_visibility {
            continue;
        }
        let perceived = if entry.is_player {
            d * config.player_priority
        } else {
            d
        };
        if best.is_none_or(|(_, p)| perceived < p) {
            best = Some((*entry, perceived));
        }
    }
    best
}

/// Generate a bot decision from the current roster.
pub fn decide<R: Rng>(
    me: &Combatant,
    brain: &mut BotBrain,
    roster: &[RosterEntry],
    config: &ArenaConfig,
    rng: &mut R,
) -> BotDecision {
    let Some((target, perceived)) = pick_target(me, roster, config) else {
        brain.target = None;
        return wander(brain, rng);
    };
    brain.target = Some(target.id);

    let dir = angle_to(me.x, me.y, target.x, target.y);
    let (cos, sin) = (dir.cos(), dir.sin());
    let mut decision = BotDecision {
        face: Some(dir),
        ..BotDecision::default()
    };

    match me.archetype() {
        Archetype::Tank => {
            if perceived > TANK_APPROACH_DIST {
                decision.move_x = cos;
                decision.move_y = sin;
                decision.fire = rng.random::<f32>() < TANK_FIRE_CHANCE_FAR;
            } else {
                decision.fire = rng.random::<f32>() < TANK_FIRE_CHANCE_NEAR;
            }
        },
        Archetype::Mage => {
            if brain.wander_timer == 0 {
                brain.wander_heading = rng.random_range(0.0..std::f32::consts::TAU);
                brain.wander_timer = MAGE_ZIGZAG_TICKS;
            }
            decision.move_x =
                cos * MAGE_CHASE_WEIGHT + brain.wander_heading.cos() * MAGE_WANDER_WEIGHT;
            decision.move_y =
                sin * MAGE_CHASE_WEIGHT + brain.wander_heading.sin() * MAGE_WANDER_WEIGHT;
            decision.fire = rng.random::<f32>() < MAGE_FIRE_CHANCE;
            brain.wander_timer -= 1;
            decision.special_before_move = rng.random::<f32>() < MAGE_SPECIAL_CHANCE;
        },
        // Gunner. `Bot::new` keeps every bot inside the bot pool.
        _ => {
            if perceived > GUNNER_APPROACH_DIST {
                decision.move_x = cos;
                decision.move_y = sin;
                decision.fire = rng.random::<f32>() < GUNNER_FIRE_CHANCE_FAR;
            } else {
                if perceived < GUNNER_RETREAT_DIST {
                    decision.move_x = -cos * GUNNER_RETREAT_SPEED;
                    decision.move_y = -sin * GUNNER_RETREAT_SPEED;
                }
                decision.fire = rng.random::<f32>() < GUNNER_FIRE_CHANCE_NEAR;
            }
        },
    }

    decision.special = rng.random::<f32>() < SPECIAL_CHANCE;
    decision
}

fn wander<R: Rng>(brain: &mut BotBrain, rng: &mut R) -> BotDecision {
    if brain.wander_timer == 0 {
        brain.wander_heading = rng.random_range(0.0..std::f32::consts::TAU);
        brain.wander_timer = rng.random_range(WANDER_MIN_TICKS..=WANDER_MAX_TICKS);
    }
    brain.wander_timer -= 1;
    BotDecision {
        move_x: brain.wander_heading.cos(),
        move_y: brain.wander_heading.sin(),
        ..BotDecision::default()
    }
}
