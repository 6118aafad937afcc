use serde::{Deserialize, Serialize};

/// Scale applied to both axes when two movement keys are held at once (~1/sqrt(2)).
pub const DIAGONAL_SCALE: f32 = 0.7071;

/// Desired action for one combatant for one tick.
///
/// `move_x`/`move_y` are a direction in `[-1, 1]`, not a position. `fire`, `special` and
/// `mine` are one-shot requests consumed by the tick that sees them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub move_x: f32,
    pub move_y: f32,
    /// Point the avatar should face. `None` keeps the current facing.
    pub aim: Option<(f32, f32)>,
    pub fire: bool,
    pub special: bool,
    pub mine: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Build a movement intent from held direction keys, normalizing diagonals.
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool) -> Self {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if up {
            dy -= 1.0;
        }
        if down {
            dy += 1.0;
        }
        if left {
            dx -= 1.0;
        }
        if right {
            dx += 1.0;
        }
        if dx != 0.0 && dy != 0.0 {
            dx *= DIAGONAL_SCALE;
            dy *= DIAGONAL_SCALE;
        }
        Self {
            move_x: dx,
            move_y: dy,
            ..Self::default()
        }
    }

    pub fn aiming_at(mut self, x: f32, y: f32) -> Self {
        self.aim = Some((x, y));
        self
    }

    /// Zero out non-finite values and clamp the move vector into `[-1, 1]`.
    pub fn sanitized(mut self) -> Self {
        self.move_x = sanitize_axis(self.move_x);
        self.move_y = sanitize_axis(self.move_y);
        if let Some((x, y)) = self.aim
            && !(x.is_finite() && y.is_finite())
        {
            tracing::debug!("Dropped non-finite aim point");
            self.aim = None;
        }
        self
    }
}

fn sanitize_axis(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Collaborator that produces the latest intent snapshot, polled once per tick.
pub trait InputSource: Send {
    fn current_intent(&mut self) -> Intent;
}

/// Merges intents arriving between ticks.
///
/// Continuous values (movement, aim) are overwritten with the latest sample. Transient
/// flags are accumulated so a click seen between two ticks is not lost when a later
/// sample arrives without it.
#[derive(Debug, Clone, Default)]
pub struct IntentBuffer {
    latest: Intent,
}

impl IntentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, incoming: Intent) {
        let incoming = incoming.sanitized();
        self.latest.move_x = incoming.move_x;
        self.latest.move_y = incoming.move_y;
        if incoming.aim.is_some() {
            self.latest.aim = incoming.aim;
        }
        self.latest.fire |= incoming.fire;
        self.latest.special |= incoming.special;
        self.latest.mine |= incoming.mine;
    }

    /// Intent for the next tick. Clears one-shot flags, keeps held movement and aim.
    pub fn take(&mut self) -> Intent {
        let out = self.latest;
        self.latest.fire = false;
        self.latest.special = false;
        self.latest.mine = false;
        out
    }
}
