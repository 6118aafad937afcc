use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use fighters_core::archetype::{Archetype, Profile, Rgb, Role, scale_damage};
use fighters_core::events::EntityId;
use fighters_core::geometry::{Bounds, Rect, angle_to, distance};

use crate::collision::slide_move;
use crate::projectile::Projectile;

/// Gunner special: half-angle between the fan bullets, in radians.
pub const FAN_SPREAD: f32 = 0.2;
pub const FAN_SPEED_MULT: f32 = 1.5;
pub const FAN_DAMAGE_MULT: f32 = 0.7;

/// Tank special: bullets in the shockwave ring.
pub const SHOCKWAVE_BULLETS: usize = 8;
pub const SHOCKWAVE_SPEED: f32 = 5.0;
pub const SHOCKWAVE_DAMAGE_MULT: f32 = 0.5;
pub const SHOCKWAVE_RADIUS: f32 = 15.0;

/// Mage special: spinning bullets, evenly spaced.
pub const ORBIT_BULLETS: usize = 3;

pub const MAX_MINES: usize = 3;
pub const MINE_COOLDOWN: u32 = 30;
pub const MINE_DAMAGE_MULT: f32 = 1.5;

pub const MAX_TURRETS: usize = 2;
pub const TURRET_DAMAGE_MULT: f32 = 0.8;
pub const TURRET_RADIUS: f32 = 15.0;
pub const TURRET_HEALTH: i32 = 50;
pub const TURRET_FIRE_COOLDOWN: u32 = 60;
/// Turrets only fire at targets strictly closer than this.
pub const TURRET_RANGE: f32 = 300.0;
pub const TURRET_BULLET_SPEED: f32 = 5.0;
pub const TURRET_BULLET_RADIUS: f32 = 5.0;

/// Position snapshot of a combatant, used for targeting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub is_player: bool,
}

/// Stationary auto-firing emplacement deployed by the Genius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub damage: i32,
    pub color: Rgb,
    pub cooldown: u32,
    pub health: i32,
    pub max_health: i32,
    pub bullets: Vec<Projectile>,
}

impl Turret {
    pub fn new(x: f32, y: f32, damage: i32, color: Rgb) -> Self {
        Self {
            x,
            y,
            radius: TURRET_RADIUS,
            damage,
            color,
            cooldown: 0,
            health: TURRET_HEALTH,
            max_health: TURRET_HEALTH,
            bullets: Vec::new(),
        }
    }

    /// Cool down, fire at the nearest target in range, then move bullets.
    pub fn tick(&mut self, targets: &[RosterEntry], bounds: Bounds, pad: f32) {
        self.cooldown = self.cooldown.saturating_sub(1);

        if self.cooldown == 0
            && let Some(target) = self.nearest_in_range(targets)
        {
            let angle = angle_to(self.x, self.y, target.x, target.y);
            self.bullets.push(Projectile::bullet(
                self.x,
                self.y,
                angle,
                TURRET_BULLET_SPEED,
                self.damage,
                TURRET_BULLET_RADIUS,
                self.color,
            ));
            self.cooldown = TURRET_FIRE_COOLDOWN;
        }

        self.bullets.retain_mut(|b| {
            b.advance();
            !b.is_expired(bounds, pad)
        });
    }

    fn nearest_in_range(&self, targets: &[RosterEntry]) -> Option<RosterEntry> {
        let mut best: Option<(f32, RosterEntry)> = None;
        for target in targets {
            let d = distance(self.x, self.y, target.x, target.y);
            let best_d = best.map_or(TURRET_RANGE, |(bd, _)| bd);
            if d < best_d {
                best = Some((d, *target));
            }
        }
        best.map(|(_, t)| t)
    }
}

/// Genius-only deployables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeniusKit {
    /// Placed mines, including inert ones. Inert mines still count toward the cap.
    pub mines: Vec<Projectile>,
    pub turrets: Vec<Turret>,
    pub mine_cooldown: u32,
    pub turret_cooldown: u32,
}

impl GeniusKit {
    fn tick(&mut self, targets: &[RosterEntry], bounds: Bounds, pad: f32) {
        self.mine_cooldown = self.mine_cooldown.saturating_sub(1);
        self.turret_cooldown = self.turret_cooldown.saturating_sub(1);
        for turret in &mut self.turrets {
            turret.tick(targets, bounds, pad);
        }
        for mine in &mut self.mines {
            mine.advance();
        }
    }
}

/// Archetype-specific ability state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Loadout {
    Generic,
    Gunner,
    Tank,
    Mage,
    Genius(GeniusKit),
}

impl Loadout {
    pub fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Generic => Loadout::Generic,
            Archetype::Gunner => Loadout::Gunner,
            Archetype::Tank => Loadout::Tank,
            Archetype::Mage => Loadout::Mage,
            Archetype::Genius => Loadout::Genius(GeniusKit::default()),
        }
    }

    pub fn archetype(&self) -> Archetype {
        match self {
            Loadout::Generic => Archetype::Generic,
            Loadout::Gunner => Archetype::Gunner,
            Loadout::Tank => Archetype::Tank,
            Loadout::Mage => Archetype::Mage,
            Loadout::Genius(_) => Archetype::Genius,
        }
    }

    pub fn genius(&self) -> Option<&GeniusKit> {
        match self {
            Loadout::Genius(kit) => Some(kit),
            _ => None,
        }
    }
}

/// A circle-bodied fighter: the player's avatar or a bot's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub role: Role,
    pub x: f32,
    pub y: f32,
    /// Facing in radians.
    pub direction: f32,
    pub health: i32,
    pub fire_cooldown: u32,
    pub special_cooldown: u32,
    pub profile: Profile,
    pub projectiles: Vec<Projectile>,
    pub loadout: Loadout,
}

impl Combatant {
    pub fn new(id: EntityId, archetype: Archetype, role: Role, x: f32, y: f32) -> Self {
        let profile = archetype.profile(role);
        Self {
            id,
            role,
            x,
            y,
            direction: 0.0,
            health: profile.max_health,
            fire_cooldown: 0,
            special_cooldown: 0,
            profile,
            projectiles: Vec::new(),
            loadout: Loadout::for_archetype(archetype),
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.loadout.archetype()
    }

    pub fn radius(&self) -> f32 {
        self.profile.radius
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            id: self.id,
            x: self.x,
            y: self.y,
            is_player: self.role == Role::Player,
        }
    }

    /// Move by a direction vector scaled by speed, sliding along obstacles.
    pub fn move_by(&mut self, dir_x: f32, dir_y: f32, obstacles: &[Rect], bounds: Bounds) {
        let speed = self.profile.speed;
        let (x, y) = slide_move(
            self.x,
            self.y,
            self.radius(),
            dir_x * speed,
            dir_y * speed,
            obstacles,
            bounds,
        );
        self.x = x;
        self.y = y;
    }

    /// Face toward a point.
    pub fn face_towards(&mut self, x: f32, y: f32) {
        self.direction = angle_to(self.x, self.y, x, y);
    }

    /// Fire the primary weapon along the facing. Returns whether a bullet was spawned.
    pub fn shoot(&mut self) -> bool {
        if self.fire_cooldown > 0 {
            return false;
        }
        let p = self.profile;
        self.projectiles.push(Projectile::bullet(
            self.x,
            self.y,
            self.direction,
            p.bullet_speed,
            p.bullet_damage,
            p.bullet_radius,
            p.bullet_color,
        ));
        self.fire_cooldown = p.fire_cooldown;
        true
    }

    /// Use the archetype's special ability. Returns whether the ability was ready.
    ///
    /// The cooldown restarts whenever the ability was ready, even if nothing spawned
    /// (a Genius at the turret cap, or a Generic with no ability).
    pub fn special_attack(&mut self) -> bool {
        if self.special_cooldown > 0 {
            return false;
        }
        let volley = self.special_volley();
        self.projectiles.extend(volley);

        let (x, y) = (self.x, self.y);
        let damage = scale_damage(self.profile.bullet_damage, TURRET_DAMAGE_MULT);
        let cooldown = self.profile.special_cooldown;
        if let Loadout::Genius(kit) = &mut self.loadout
            && kit.turrets.len() < MAX_TURRETS
            && kit.turret_cooldown == 0
        {
            kit.turrets.push(Turret::new(x, y, damage, Rgb::CYAN));
            kit.turret_cooldown = cooldown;
            tracing::debug!(id = self.id, turrets = kit.turrets.len(), "Turret deployed");
        }

        self.special_cooldown = cooldown;
        true
    }

    fn special_volley(&self) -> SmallVec<[Projectile; 8]> {
        let p = self.profile;
        let (x, y, dir) = (self.x, self.y, self.direction);
        match self.loadout {
            Loadout::Gunner => [-FAN_SPREAD, 0.0, FAN_SPREAD]
                .into_iter()
                .map(|offset| {
                    Projectile::bullet(
                        x,
                        y,
                        dir + offset,
                        p.bullet_speed * FAN_SPEED_MULT,
                        scale_damage(p.bullet_damage, FAN_DAMAGE_MULT),
                        p.bullet_radius,
                        Rgb::YELLOW,
                    )
                })
                .collect(),
            Loadout::Tank => (0..SHOCKWAVE_BULLETS)
                .map(|i| {
                    let angle = std::f32::consts::TAU / SHOCKWAVE_BULLETS as f32 * i as f32;
                    Projectile::bullet(
                        x,
                        y,
                        angle,
                        SHOCKWAVE_SPEED,
                        scale_damage(p.bullet_damage, SHOCKWAVE_DAMAGE_MULT),
                        SHOCKWAVE_RADIUS,
                        Rgb::ORANGE,
                    )
                })
                .collect(),
            Loadout::Mage => (0..ORBIT_BULLETS)
                .map(|i| {
                    let angle = dir + std::f32::consts::TAU / ORBIT_BULLETS as f32 * i as f32;
                    Projectile::spinning(
                        x,
                        y,
                        angle,
                        p.bullet_damage,
                        p.bullet_radius,
                        Rgb::PURPLE,
                    )
                })
                .collect(),
            Loadout::Genius(_) | Loadout::Generic => SmallVec::new(),
        }
    }

    /// Drop a mine at the current position. Genius only.
    pub fn place_mine(&mut self) -> bool {
        let (x, y) = (self.x, self.y);
        let damage = scale_damage(self.profile.bullet_damage, MINE_DAMAGE_MULT);
        let Loadout::Genius(kit) = &mut self.loadout else {
            return false;
        };
        if kit.mines.len() >= MAX_MINES || kit.mine_cooldown > 0 {
            return false;
        }
        kit.mines.push(Projectile::mine(x, y, damage, Rgb::CYAN));
        kit.mine_cooldown = MINE_COOLDOWN;
        true
    }

    pub fn tick_cooldowns(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.special_cooldown = self.special_cooldown.saturating_sub(1);
    }

    /// Advance owned projectiles and drop the ones that left the arena.
    ///
    /// Player projectiles are culled as soon as they clear the edge by their own
    /// radius. Bot projectiles get the wider `pad`.
    pub fn advance_projectiles(&mut self, bounds: Bounds, pad: f32) {
        let role = self.role;
        self.projectiles.retain_mut(|p| {
            p.advance();
            let pad = match role {
                Role::Player => p.radius,
                Role::Bot => pad,
            };
            !p.is_expired(bounds, pad)
        });
    }

    /// Full per-tick update: cooldowns, deployables, then projectiles.
    pub fn tick(&mut self, targets: &[RosterEntry], bounds: Bounds, pad: f32) {
        self.tick_cooldowns();
        if let Loadout::Genius(kit) = &mut self.loadout {
            kit.tick(targets, bounds, pad);
        }
        self.advance_projectiles(bounds, pad);
    }

    /// Apply damage and return the remaining health.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health -= amount;
        self.health
    }
}
