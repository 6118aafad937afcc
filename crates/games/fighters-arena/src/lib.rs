pub mod arena;
pub mod bot;
pub mod collision;
pub mod combatant;
pub mod config;
pub mod projectile;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use fighters_core::archetype::{Archetype, Role};
use fighters_core::events::{EntityId, HitSource, MatchEvent, MatchSummary};
use fighters_core::geometry::{Bounds, Rect, distance};
use fighters_core::intent::Intent;
use fighters_core::simulation::{Simulation, SimulationMetadata};

use arena::ArenaLayout;
use bot::Bot;
use combatant::{Combatant, Loadout, RosterEntry};
use config::ArenaConfig;
use projectile::Projectile;

/// The human player's entity id. Bots are numbered from 1.
pub const PLAYER_ID: EntityId = 0;

/// Full match state. Serialized as the presentation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaState {
    pub tick: u64,
    pub bounds: Bounds,
    pub layout: String,
    pub obstacles: Vec<Rect>,
    pub player: Combatant,
    pub bots: Vec<Bot>,
    pub kills: u32,
    pub match_over: bool,
}

/// Single-player arena shooter: one human avatar against a respawning bot squad.
pub struct FightersArena {
    state: ArenaState,
    config: ArenaConfig,
    rng: StdRng,
    next_id: EntityId,
    paused: bool,
}

impl FightersArena {
    /// New match using the config from the environment or `config/arena.toml`.
    pub fn new(archetype: Archetype) -> Self {
        Self::with_config(archetype, ArenaConfig::load())
    }

    pub fn with_config(archetype: Archetype, config: ArenaConfig) -> Self {
        let layout = arena::load_layout(&config.layout, config.arena_width, config.arena_height);
        Self::with_layout(archetype, config, layout)
    }

    pub fn with_layout(archetype: Archetype, config: ArenaConfig, layout: ArenaLayout) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (px, py) = layout.player_spawn;
        let player = Combatant::new(PLAYER_ID, archetype, Role::Player, px, py);

        // Opening squad rotates through the bot classes starting after the player's own.
        let mut next_id = PLAYER_ID + 1;
        let mut bots = Vec::with_capacity(config.initial_bots);
        for (i, &(x, y)) in layout
            .bot_spawns
            .iter()
            .cycle()
            .take(config.initial_bots)
            .enumerate()
        {
            let pool = Archetype::BOT_POOL;
            let bot_archetype = pool[(archetype.index() as usize + i) % pool.len()];
            bots.push(Bot::new(next_id, bot_archetype, x, y, &mut rng));
            next_id += 1;
        }

        tracing::info!(
            %archetype,
            layout = %layout.name,
            bots = bots.len(),
            "Match started"
        );

        Self {
            state: ArenaState {
                tick: 0,
                bounds: config.bounds(),
                layout: layout.name,
                obstacles: layout.obstacles,
                player,
                bots,
                kills: 0,
                match_over: false,
            },
            config,
            rng,
            next_id,
            paused: false,
        }
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    /// Decode a snapshot produced by `serialize_state`.
    pub fn decode_snapshot(data: &[u8]) -> Option<ArenaState> {
        match rmp_serde::from_slice(data) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode arena snapshot");
                None
            },
        }
    }

    fn bot_roster(&self) -> SmallVec<[RosterEntry; 8]> {
        self.state
            .bots
            .iter()
            .map(|b| b.body.roster_entry())
            .collect()
    }

    fn step_player(&mut self, intent: &Intent) {
        let bounds = self.state.bounds;
        let targets = self.bot_roster();
        let player = &mut self.state.player;

        if let Some((ax, ay)) = intent.aim {
            player.face_towards(ax, ay);
        }
        if intent.fire {
            player.shoot();
        }
        if intent.special {
            player.special_attack();
        }
        if intent.mine {
            player.place_mine();
        }
        player.move_by(intent.move_x, intent.move_y, &self.state.obstacles, bounds);
        player.tick(&targets, bounds, self.config.projectile_pad);
    }

    fn step_bots(&mut self) {
        let bounds = self.state.bounds;
        let pad = self.config.projectile_pad;

        // Player first, then bots in order. Updated as each bot moves so later bots
        // see earlier bots' new positions.
        let mut roster: SmallVec<[RosterEntry; 8]> = SmallVec::new();
        roster.push(self.state.player.roster_entry());
        roster.extend(self.state.bots.iter().map(|b| b.body.roster_entry()));

        for (i, bot) in self.state.bots.iter_mut().enumerate() {
            bot.body.tick_cooldowns();
            let decision = bot.think(&roster, &self.config, &mut self.rng);
            bot.act(decision, &self.state.obstacles, bounds);
            bot.body.advance_projectiles(bounds, pad);
            roster[i + 1] = bot.body.roster_entry();
        }
    }

    /// Resolve every projectile collision for this tick.
    ///
    /// Order: player bullets vs bots, bot bullets vs player, turret bullets vs bots, then
    /// mines vs bots. Each projectile damages at most one target and is consumed, except
    /// mines which stay in place inert.
    fn resolve_combat(&mut self, events: &mut Vec<MatchEvent>) {
        let ArenaState { player, bots, .. } = &mut self.state;

        player
            .projectiles
            .retain(|p| !strike_first_bot(p, bots, HitSource::Bullet));

        for bot in bots.iter_mut().filter(|b| b.body.is_alive()) {
            bot.body.projectiles.retain(|p| {
                if !p.hits(player.x, player.y, player.radius()) {
                    return true;
                }
                let health = player.take_damage(p.damage);
                events.push(MatchEvent::PlayerHit {
                    damage: p.damage,
                    health,
                });
                false
            });
        }

        if let Loadout::Genius(kit) = &mut player.loadout {
            for turret in &mut kit.turrets {
                turret
                    .bullets
                    .retain(|p| !strike_first_bot(p, bots, HitSource::Turret));
            }
            for mine in kit.mines.iter_mut().filter(|m| m.is_armed()) {
                if strike_first_bot(mine, bots, HitSource::Mine) {
                    mine.disarm();
                }
            }
        }
    }

    /// Remove dead bots, credit kills and spawn replacements.
    fn reap_bots(&mut self, events: &mut Vec<MatchEvent>) {
        let mut fallen: SmallVec<[(EntityId, Archetype, HitSource); 4]> = SmallVec::new();
        self.state.bots.retain(|bot| {
            if bot.body.is_alive() {
                return true;
            }
            let cause = bot.killed_by.unwrap_or(HitSource::Bullet);
            fallen.push((bot.body.id, bot.body.archetype(), cause));
            false
        });

        for (bot_id, archetype, cause) in fallen {
            self.state.kills += 1;
            tracing::debug!(bot_id, %archetype, ?cause, kills = self.state.kills, "Bot killed");
            events.push(MatchEvent::BotKilled {
                bot_id,
                archetype,
                cause,
            });

            match self.spawn_replacement() {
                Some(bot) => {
                    events.push(MatchEvent::BotSpawned {
                        bot_id: bot.body.id,
                        archetype: bot.body.archetype(),
                        x: bot.body.x,
                        y: bot.body.y,
                    });
                    self.state.bots.push(bot);
                },
                None => {
                    tracing::debug!(
                        attempts = self.config.spawn_attempts,
                        "No safe spawn point found"
                    );
                    events.push(MatchEvent::SpawnFailed {
                        attempts: self.config.spawn_attempts,
                    });
                },
            }
        }
    }

    /// Roll random positions until one is far enough from the player.
    fn spawn_replacement(&mut self) -> Option<Bot> {
        let bounds = self.state.bounds;
        let margin = self.config.spawn_margin;
        let max_x = (bounds.width - margin).max(margin);
        let max_y = (bounds.height - margin).max(margin);
        let (px, py) = (self.state.player.x, self.state.player.y);

        for _ in 0..self.config.spawn_attempts {
            let x = self.rng.random_range(margin..=max_x);
            let y = self.rng.random_range(margin..=max_y);
            if distance(x, y, px, py) > self.config.spawn_safe_distance {
                let pool = Archetype::BOT_POOL;
                let archetype = pool[self.rng.random_range(0..pool.len())];
                let id = self.next_id;
                self.next_id += 1;
                return Some(Bot::new(id, archetype, x, y, &mut self.rng));
            }
        }
        None
    }
}

/// Damage the first live bot a projectile overlaps. Returns whether it landed.
fn strike_first_bot(projectile: &Projectile, bots: &mut [Bot], source: HitSource) -> bool {
    let Some(bot) = bots.iter_mut().find(|b| {
        b.body.is_alive() && projectile.hits(b.body.x, b.body.y, b.body.radius())
    }) else {
        return false;
    };
    if bot.body.take_damage(projectile.damage) <= 0 {
        bot.killed_by = Some(source);
    }
    true
}

impl Simulation for FightersArena {
    fn metadata(&self) -> SimulationMetadata {
        SimulationMetadata {
            name: "Super Fighters".to_string(),
            description: "Pick a class and hold out against endless bots. Kills unlock the Genius."
                .to_string(),
            arena_width: self.state.bounds.width,
            arena_height: self.state.bounds.height,
        }
    }

    fn update(&mut self, intent: &Intent) -> Vec<MatchEvent> {
        if self.paused || self.state.match_over {
            return Vec::new();
        }
        self.state.tick += 1;

        let intent = intent.sanitized();
        let mut events = Vec::new();

        self.step_player(&intent);
        self.step_bots();
        self.resolve_combat(&mut events);
        self.reap_bots(&mut events);

        if !self.state.player.is_alive() {
            self.state.match_over = true;
            let summary = self.summary();
            tracing::info!(
                kills = summary.kills,
                ticks = summary.ticks,
                archetype = %summary.archetype,
                "Match over"
            );
            events.push(MatchEvent::MatchOver(summary));
        }

        events
    }

    fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize arena state");
            Vec::new()
        })
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_match_over(&self) -> bool {
        self.state.match_over
    }

    fn summary(&self) -> MatchSummary {
        MatchSummary {
            kills: self.state.kills,
            archetype: self.state.player.archetype(),
            ticks: self.state.tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{LayoutKind, generate_layout};
    use crate::combatant::Turret;
    use crate::projectile::Motion;
    use fighters_core::archetype::Rgb;
    use fighters_core::test_helpers::{
        contract_finished_match_is_frozen, contract_pause_stops_updates,
        contract_snapshot_nonempty, contract_update_advances_state, run_ticks,
    };
    use proptest::prelude::*;

    fn seeded(archetype: Archetype, seed: u64) -> FightersArena {
        let config = ArenaConfig::seeded(seed);
        let layout = generate_layout(LayoutKind::Classic, 1000.0, 700.0);
        FightersArena::with_layout(archetype, config, layout)
    }

    /// Open arena with no bots; tests add the bots they need.
    fn empty_arena(archetype: Archetype) -> FightersArena {
        let config = ArenaConfig {
            initial_bots: 0,
            ..ArenaConfig::seeded(1)
        };
        let layout = generate_layout(LayoutKind::Open, 1000.0, 700.0);
        FightersArena::with_layout(archetype, config, layout)
    }

    fn add_bot(arena: &mut FightersArena, archetype: Archetype, x: f32, y: f32) -> usize {
        let id = arena.next_id;
        arena.next_id += 1;
        let bot = Bot::new(id, archetype, x, y, &mut arena.rng);
        arena.state.bots.push(bot);
        arena.state.bots.len() - 1
    }

    // ================================================================
    // Setup
    // ================================================================

    #[test]
    fn opening_squad_rotates_from_player_class() {
        let arena = seeded(Archetype::Gunner, 3);
        let kinds: Vec<_> = arena.state.bots.iter().map(|b| b.body.archetype()).collect();
        assert_eq!(kinds, vec![Archetype::Tank, Archetype::Mage, Archetype::Gunner]);
        assert_eq!((arena.state.player.x, arena.state.player.y), (500.0, 350.0));
        assert_eq!((arena.state.bots[0].body.x, arena.state.bots[0].body.y), (200.0, 200.0));
        assert_eq!(arena.state.obstacles.len(), 6);
    }

    #[test]
    fn genius_player_starts_with_empty_kit() {
        let arena = seeded(Archetype::Genius, 3);
        let kit = arena.state.player.loadout.genius().unwrap();
        assert!(kit.mines.is_empty());
        assert!(kit.turrets.is_empty());
        let kinds: Vec<_> = arena.state.bots.iter().map(|b| b.body.archetype()).collect();
        assert_eq!(kinds, vec![Archetype::Tank, Archetype::Mage, Archetype::Gunner]);
    }

    // ================================================================
    // Simulation contract
    // ================================================================

    #[test]
    fn contract_snapshot() {
        contract_snapshot_nonempty(&seeded(Archetype::Tank, 1));
    }

    #[test]
    fn contract_update() {
        contract_update_advances_state(&mut seeded(Archetype::Tank, 1));
    }

    #[test]
    fn contract_pause() {
        contract_pause_stops_updates(&mut seeded(Archetype::Mage, 1));
    }

    #[test]
    fn contract_frozen_after_death() {
        let mut arena = seeded(Archetype::Gunner, 1);
        arena.state.player.health = 0;
        arena.update(&Intent::idle());
        contract_finished_match_is_frozen(&mut arena);
    }

    #[test]
    fn snapshot_decodes() {
        let mut arena = seeded(Archetype::Genius, 9);
        run_ticks(&mut arena, 10, &Intent::idle());
        let state = FightersArena::decode_snapshot(&arena.serialize_state()).unwrap();
        assert_eq!(state.tick, 10);
        assert_eq!(state.bots.len(), arena.state.bots.len());
        assert!(FightersArena::decode_snapshot(&[0xc1]).is_none());
    }

    #[test]
    fn same_seed_same_match() {
        let mut a = seeded(Archetype::Tank, 42);
        let mut b = seeded(Archetype::Tank, 42);
        let intent = Intent::from_keys(false, false, true, false);
        for _ in 0..200 {
            a.update(&intent);
            b.update(&intent);
        }
        assert_eq!(a.serialize_state(), b.serialize_state());
    }

    // ================================================================
    // Player actions
    // ================================================================

    #[test]
    fn aim_applies_before_firing() {
        let mut arena = empty_arena(Archetype::Gunner);
        let intent = Intent {
            fire: true,
            ..Intent::idle().aiming_at(500.0, 0.0)
        };
        arena.update(&intent);
        let Motion::Straight { vx, vy } = arena.state.player.projectiles[0].motion else {
            panic!("primary fire is straight");
        };
        assert!(vx.abs() < 1e-4);
        assert!(vy < 0.0, "bullet must fly toward the aim point");
    }

    #[test]
    fn tank_shockwave_rings_out() {
        let mut arena = empty_arena(Archetype::Tank);
        arena.update(&Intent {
            special: true,
            ..Intent::idle()
        });
        let ring = &arena.state.player.projectiles;
        assert_eq!(ring.len(), 8);
        assert!(ring.iter().all(|p| p.damage == 10 && p.radius == 15.0));
        for p in ring {
            let d = distance(p.x, p.y, 500.0, 350.0);
            assert!((d - 5.0).abs() < 1e-3, "one tick at speed 5");
        }
        assert_eq!(arena.state.player.special_cooldown, 99);
    }

    #[test]
    fn mage_spinners_spiral_out_from_cast_point() {
        let mut arena = empty_arena(Archetype::Mage);
        arena.update(&Intent {
            special: true,
            ..Intent::idle()
        });
        run_ticks(&mut arena, 9, &Intent::idle());

        let spinners = &arena.state.player.projectiles;
        assert_eq!(spinners.len(), 3);
        for p in spinners {
            let Motion::Orbiting { orbit_radius, .. } = p.motion else {
                panic!("mage special spins");
            };
            assert!((orbit_radius - 5.0).abs() < 1e-4);
            assert!((distance(p.x, p.y, 500.0, 350.0) - 4.5).abs() < 1e-3);
        }
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut arena = empty_arena(Archetype::Gunner);
        arena.update(&Intent::from_keys(true, false, false, true));
        let moved = distance(arena.state.player.x, arena.state.player.y, 500.0, 350.0);
        assert!((moved - 5.0).abs() < 1e-2);
    }

    #[test]
    fn nan_intent_is_harmless() {
        let mut arena = empty_arena(Archetype::Gunner);
        arena.update(&Intent {
            move_x: f32::NAN,
            move_y: f32::INFINITY,
            aim: Some((f32::NAN, 0.0)),
            ..Intent::idle()
        });
        let p = &arena.state.player;
        assert!(p.x.is_finite() && p.y.is_finite() && p.direction.is_finite());
    }

    // ================================================================
    // Combat
    // ================================================================

    #[test]
    fn player_bullet_kill_respawns_a_bot() {
        let mut arena = empty_arena(Archetype::Gunner);
        let i = add_bot(&mut arena, Archetype::Tank, 600.0, 350.0);
        arena.state.bots[i].body.health = 1;

        let intent = Intent {
            fire: true,
            ..Intent::idle().aiming_at(600.0, 350.0)
        };
        let events = run_ticks(&mut arena, 30, &intent);

        let killed = events.iter().find(|e| e.is_kill()).expect("tank must die");
        assert!(matches!(
            killed,
            MatchEvent::BotKilled {
                cause: HitSource::Bullet,
                archetype: Archetype::Tank,
                ..
            }
        ));
        assert!(arena.state.kills >= 1);

        let (sx, sy) = events
            .iter()
            .find_map(|e| match e {
                MatchEvent::BotSpawned { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .expect("replacement spawned");
        assert!((50.0..=950.0).contains(&sx));
        assert!((50.0..=650.0).contains(&sy));
    }

    #[test]
    fn one_bullet_hits_one_bot() {
        let mut arena = empty_arena(Archetype::Gunner);
        arena.state.player.x = 100.0;
        arena.state.player.y = 100.0;
        // Two bots stacked on the same spot, far from the player so they just wander.
        let a = add_bot(&mut arena, Archetype::Tank, 800.0, 600.0);
        let b = add_bot(&mut arena, Archetype::Tank, 800.0, 600.0);
        arena
            .state
            .player
            .projectiles
            .push(Projectile::bullet(800.0, 600.0, 0.0, 0.0, 10, 6.0, Rgb::BLUE));

        arena.update(&Intent::idle());
        let damaged = [a, b]
            .iter()
            .filter(|&&i| arena.state.bots[i].body.health < 150)
            .count();
        assert_eq!(damaged, 1);
        assert!(arena.state.player.projectiles.is_empty());
    }

    #[test]
    fn tank_falls_to_eight_heavy_bullets() {
        let mut arena = empty_arena(Archetype::Gunner);
        arena.state.player.x = 100.0;
        arena.state.player.y = 100.0;
        let i = add_bot(&mut arena, Archetype::Tank, 800.0, 600.0);
        assert_eq!(arena.state.bots[i].body.health, 150);
        let tank_id = arena.state.bots[i].body.id;
        for _ in 0..8 {
            arena
                .state
                .player
                .projectiles
                .push(Projectile::bullet(800.0, 600.0, 0.0, 0.0, 20, 6.0, Rgb::BLUE));
        }

        let events = arena.update(&Intent::idle());
        assert!(events.iter().any(|e| matches!(
            e,
            MatchEvent::BotKilled { bot_id, .. } if *bot_id == tank_id
        )));
        assert_eq!(arena.state.kills, 1);
        assert!(arena.state.bots.iter().all(|b| b.body.id != tank_id));
        assert!(arena.state.player.projectiles.is_empty());
    }

    #[test]
    fn bot_bullets_hurt_the_player() {
        let mut arena = empty_arena(Archetype::Generic);
        let i = add_bot(&mut arena, Archetype::Gunner, 900.0, 650.0);
        let (px, py) = (arena.state.player.x, arena.state.player.y);
        arena.state.bots[i]
            .body
            .projectiles
            .push(Projectile::bullet(px, py, 0.0, 0.0, 10, 6.0, Rgb::YELLOW));

        let events = arena.update(&Intent::idle());
        assert!(events.contains(&MatchEvent::PlayerHit {
            damage: 10,
            health: 90,
        }));
        assert!(arena.state.bots[i].body.projectiles.is_empty());
    }

    #[test]
    fn player_death_ends_match_once() {
        let mut arena = empty_arena(Archetype::Mage);
        let i = add_bot(&mut arena, Archetype::Gunner, 900.0, 650.0);
        arena.state.player.health = 5;
        arena.state.kills = 4;
        let (px, py) = (arena.state.player.x, arena.state.player.y);
        arena.state.bots[i]
            .body
            .projectiles
            .push(Projectile::bullet(px, py, 0.0, 0.0, 10, 6.0, Rgb::YELLOW));

        let events = arena.update(&Intent::idle());
        let over: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, MatchEvent::MatchOver(_)))
            .collect();
        assert_eq!(
            over,
            vec![&MatchEvent::MatchOver(MatchSummary {
                kills: 4,
                archetype: Archetype::Mage,
                ticks: 1,
            })]
        );
        assert!(arena.is_match_over());
        assert!(arena.update(&Intent::idle()).is_empty());
    }

    #[test]
    fn mine_detonates_once_and_stays_inert() {
        let mut arena = empty_arena(Archetype::Genius);
        arena.state.player.x = 900.0;
        arena.state.player.y = 600.0;
        let i = add_bot(&mut arena, Archetype::Gunner, 200.0, 200.0);
        if let Loadout::Genius(kit) = &mut arena.state.player.loadout {
            kit.mines.push(Projectile::mine(200.0, 200.0, 18, Rgb::CYAN));
        }

        run_ticks(&mut arena, 5, &Intent::idle());
        assert_eq!(arena.state.bots[i].body.health, 82);
        let kit = arena.state.player.loadout.genius().unwrap();
        assert_eq!(kit.mines.len(), 1, "inert mines stay placed");
        assert!(!kit.mines[0].is_armed());
    }

    #[test]
    fn turret_kill_is_credited() {
        let mut arena = empty_arena(Archetype::Genius);
        arena.state.player.x = 900.0;
        arena.state.player.y = 600.0;
        let i = add_bot(&mut arena, Archetype::Gunner, 220.0, 200.0);
        arena.state.bots[i].body.health = 1;
        if let Loadout::Genius(kit) = &mut arena.state.player.loadout {
            kit.turrets.push(Turret::new(200.0, 200.0, 10, Rgb::CYAN));
        }

        let events = arena.update(&Intent::idle());
        assert!(events.iter().any(|e| matches!(
            e,
            MatchEvent::BotKilled {
                cause: HitSource::Turret,
                ..
            }
        )));
        assert_eq!(arena.state.kills, 1);
    }

    #[test]
    fn mine_placed_by_intent() {
        let mut arena = empty_arena(Archetype::Genius);
        arena.update(&Intent {
            mine: true,
            ..Intent::idle()
        });
        let kit = arena.state.player.loadout.genius().unwrap();
        assert_eq!(kit.mines.len(), 1);
        assert_eq!((kit.mines[0].x, kit.mines[0].y), (500.0, 350.0));
    }

    // ================================================================
    // Spawning
    // ================================================================

    #[test]
    fn replacements_spawn_away_from_player() {
        let mut arena = empty_arena(Archetype::Gunner);
        for _ in 0..500 {
            if let Some(bot) = arena.spawn_replacement() {
                let d = distance(bot.body.x, bot.body.y, 500.0, 350.0);
                assert!(d > 150.0, "spawned {d} from player");
                assert!(Archetype::BOT_POOL.contains(&bot.body.archetype()));
            }
        }
    }

    #[test]
    fn spawn_gives_up_when_no_room() {
        let mut arena = empty_arena(Archetype::Gunner);
        arena.config.spawn_safe_distance = 5000.0;
        assert!(arena.spawn_replacement().is_none());

        let i = add_bot(&mut arena, Archetype::Tank, 100.0, 100.0);
        arena.state.bots[i].body.health = 0;
        let events = arena.update(&Intent::idle());
        assert!(events.contains(&MatchEvent::SpawnFailed { attempts: 10 }));
        assert!(arena.state.bots.is_empty());
        assert_eq!(arena.state.kills, 1);
    }

    #[test]
    fn spawned_ids_are_unique() {
        let mut arena = seeded(Archetype::Gunner, 5);
        let mut ids: Vec<_> = arena.state.bots.iter().map(|b| b.body.id).collect();
        for _ in 0..20 {
            if let Some(bot) = arena.spawn_replacement() {
                ids.push(bot.body.id);
            }
        }
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
        assert!(!ids.contains(&PLAYER_ID));
    }

    // ================================================================
    // Properties
    // ================================================================

    fn arb_intent() -> impl Strategy<Value = Intent> {
        (
            -1.0f32..=1.0,
            -1.0f32..=1.0,
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            proptest::option::of((0.0f32..1000.0, 0.0f32..700.0)),
        )
            .prop_map(|(move_x, move_y, fire, special, mine, aim)| Intent {
                move_x,
                move_y,
                aim,
                fire,
                special,
                mine,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn combatants_stay_in_bounds(
            seed in any::<u64>(),
            archetype in 0u8..5,
            intents in proptest::collection::vec(arb_intent(), 1..150),
        ) {
            let archetype = Archetype::from_index(archetype).unwrap();
            let mut arena = seeded(archetype, seed);
            for intent in &intents {
                arena.update(intent);
                let bodies = std::iter::once(&arena.state.player)
                    .chain(arena.state.bots.iter().map(|b| &b.body));
                for c in bodies {
                    let r = c.radius();
                    prop_assert!(c.x >= r && c.x <= 1000.0 - r, "x={} r={}", c.x, r);
                    prop_assert!(c.y >= r && c.y <= 700.0 - r, "y={} r={}", c.y, r);
                    prop_assert!(c.fire_cooldown <= c.profile.fire_cooldown);
                    prop_assert!(c.special_cooldown <= c.profile.special_cooldown);
                }
                if arena.is_match_over() {
                    break;
                }
            }
        }

        #[test]
        fn kills_only_grow(
            seed in any::<u64>(),
            intents in proptest::collection::vec(arb_intent(), 1..150),
        ) {
            let mut arena = seeded(Archetype::Tank, seed);
            let mut last = 0;
            for intent in &intents {
                let events = arena.update(intent);
                let kill_events = events.iter().filter(|e| e.is_kill()).count() as u32;
                prop_assert_eq!(arena.state.kills, last + kill_events);
                last = arena.state.kills;
            }
        }
    }
}
