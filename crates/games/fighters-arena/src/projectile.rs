use serde::{Deserialize, Serialize};

use fighters_core::archetype::Rgb;
use fighters_core::geometry::{Bounds, circles_overlap};

/// Radians added to an orbiting projectile's angle each tick.
pub const ORBIT_ANGULAR_SPEED: f32 = 0.1;
/// Orbit radius growth per tick.
pub const ORBIT_GROWTH: f32 = 0.5;
/// Mine collision radius.
pub const MINE_RADIUS: f32 = 10.0;
/// Ticks per mine blink cycle.
pub const MINE_BLINK_CYCLE: u8 = 30;

/// How a projectile moves each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Constant velocity.
    Straight { vx: f32, vy: f32 },
    /// Spirals outward around a fixed center.
    Orbiting {
        center_x: f32,
        center_y: f32,
        angle: f32,
        orbit_radius: f32,
    },
    /// Mine. Sits still until it detonates once, then stays inert.
    Stationary { armed: bool, blink_phase: u8 },
}

/// Damaging circle owned by a combatant or turret.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub damage: i32,
    pub color: Rgb,
    pub motion: Motion,
}

impl Projectile {
    /// Straight bullet leaving (x, y) along `angle`.
    pub fn bullet(
        x: f32,
        y: f32,
        angle: f32,
        speed: f32,
        damage: i32,
        radius: f32,
        color: Rgb,
    ) -> Self {
        Self {
            x,
            y,
            radius,
            damage,
            color,
            motion: Motion::Straight {
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
            },
        }
    }

    /// Spinning bullet that starts on its center with a zero orbit.
    pub fn spinning(
        center_x: f32,
        center_y: f32,
        start_angle: f32,
        damage: i32,
        radius: f32,
        color: Rgb,
    ) -> Self {
        Self {
            x: center_x,
            y: center_y,
            radius,
            damage,
            color,
            motion: Motion::Orbiting {
                center_x,
                center_y,
                angle: start_angle,
                orbit_radius: 0.0,
            },
        }
    }

    /// Armed mine at (x, y).
    pub fn mine(x: f32, y: f32, damage: i32, color: Rgb) -> Self {
        Self {
            x,
            y,
            radius: MINE_RADIUS,
            damage,
            color,
            motion: Motion::Stationary {
                armed: true,
                blink_phase: 0,
            },
        }
    }

    pub fn advance(&mut self) {
        match &mut self.motion {
            Motion::Straight { vx, vy } => {
                self.x += *vx;
                self.y += *vy;
            },
            Motion::Orbiting {
                center_x,
                center_y,
                angle,
                orbit_radius,
            } => {
                *angle += ORBIT_ANGULAR_SPEED;
                self.x = *center_x + angle.cos() * *orbit_radius;
                self.y = *center_y + angle.sin() * *orbit_radius;
                *orbit_radius += ORBIT_GROWTH;
            },
            Motion::Stationary { blink_phase, .. } => {
                *blink_phase = (*blink_phase + 1) % MINE_BLINK_CYCLE;
            },
        }
    }

    /// Bullets are always live; mines only until they detonate.
    pub fn is_armed(&self) -> bool {
        match self.motion {
            Motion::Stationary { armed, .. } => armed,
            _ => true,
        }
    }

    pub fn disarm(&mut self) {
        if let Motion::Stationary { armed, .. } = &mut self.motion {
            *armed = false;
        }
    }

    /// Whether the mine light is on this tick. Always true for bullets.
    pub fn is_lit(&self) -> bool {
        match self.motion {
            Motion::Stationary { blink_phase, .. } => blink_phase < MINE_BLINK_CYCLE / 2,
            _ => true,
        }
    }

    /// Moving projectiles expire once they leave the bounds expanded by `pad`. Mines never do.
    pub fn is_expired(&self, bounds: Bounds, pad: f32) -> bool {
        match self.motion {
            Motion::Stationary { .. } => false,
            _ => !bounds.contains_padded(self.x, self.y, pad),
        }
    }

    /// Whether this projectile can damage a circle at (x, y) with `radius` right now.
    pub fn hits(&self, x: f32, y: f32, radius: f32) -> bool {
        self.is_armed() && circles_overlap(self.x, self.y, self.radius, x, y, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 1000.0,
        height: 700.0,
    };

    #[test]
    fn bullet_moves_along_angle() {
        let mut b = Projectile::bullet(100.0, 100.0, 0.0, 8.0, 10, 6.0, Rgb::YELLOW);
        b.advance();
        assert!((b.x - 108.0).abs() < 1e-5);
        assert!((b.y - 100.0).abs() < 1e-5);
    }

    #[test]
    fn spinning_bullet_spirals_outward() {
        let mut p = Projectile::spinning(500.0, 350.0, 0.0, 15, 8.0, Rgb::PURPLE);

        // First tick: radius 0 so it stays on the center.
        p.advance();
        assert!((p.x - 500.0).abs() < 1e-5);
        assert!((p.y - 350.0).abs() < 1e-5);

        p.advance();
        let Motion::Orbiting {
            angle,
            orbit_radius,
            ..
        } = p.motion
        else {
            panic!("expected orbiting motion");
        };
        assert!((angle - 0.2).abs() < 1e-5);
        assert!((orbit_radius - 1.0).abs() < 1e-5);
        assert!((p.x - (500.0 + 0.2f32.cos() * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn orbit_radius_grows_every_tick() {
        let mut p = Projectile::spinning(0.0, 0.0, 1.0, 15, 8.0, Rgb::PURPLE);
        for _ in 0..100 {
            p.advance();
        }
        let Motion::Orbiting { orbit_radius, .. } = p.motion else {
            panic!("expected orbiting motion");
        };
        assert!((orbit_radius - 50.0).abs() < 1e-3);
    }

    #[test]
    fn bullet_expires_past_pad() {
        let mut b = Projectile::bullet(1045.0, 100.0, 0.0, 8.0, 10, 6.0, Rgb::YELLOW);
        assert!(!b.is_expired(BOUNDS, 50.0));
        b.advance();
        assert!(b.is_expired(BOUNDS, 50.0));
    }

    #[test]
    fn mines_never_expire() {
        let mut m = Projectile::mine(-500.0, -500.0, 18, Rgb::CYAN);
        for _ in 0..100 {
            m.advance();
        }
        assert!(!m.is_expired(BOUNDS, 0.0));
        assert_eq!((m.x, m.y), (-500.0, -500.0));
    }

    #[test]
    fn disarmed_mine_is_harmless() {
        let mut m = Projectile::mine(100.0, 100.0, 18, Rgb::CYAN);
        assert!(m.hits(105.0, 100.0, 25.0));
        m.disarm();
        assert!(!m.hits(105.0, 100.0, 25.0));
    }

    #[test]
    fn mine_blinks_on_a_cycle() {
        let mut m = Projectile::mine(0.0, 0.0, 18, Rgb::CYAN);
        assert!(m.is_lit());
        for _ in 0..15 {
            m.advance();
        }
        assert!(!m.is_lit());
        for _ in 0..15 {
            m.advance();
        }
        assert!(m.is_lit());
    }

    #[test]
    fn touching_is_not_a_hit() {
        let b = Projectile::bullet(0.0, 0.0, 0.0, 0.0, 10, 5.0, Rgb::YELLOW);
        assert!(!b.hits(30.0, 0.0, 25.0));
        assert!(b.hits(29.9, 0.0, 25.0));
    }
}
