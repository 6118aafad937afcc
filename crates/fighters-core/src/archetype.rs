use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Character class. Determines stat constants and ability behavior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Default player class when nothing was selected. Has no special attack.
    #[default]
    Generic,
    Gunner,
    Tank,
    Mage,
    Genius,
}

/// Who drives a combatant. Selects the stat table and how far projectiles fly before culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Bot,
}

/// RGB color used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb {
        r: 231,
        g: 76,
        b: 60,
    };
    pub const BLUE: Rgb = Rgb {
        r: 52,
        g: 152,
        b: 219,
    };
    pub const GREEN: Rgb = Rgb {
        r: 46,
        g: 204,
        b: 113,
    };
    pub const YELLOW: Rgb = Rgb {
        r: 241,
        g: 196,
        b: 15,
    };
    pub const PURPLE: Rgb = Rgb {
        r: 155,
        g: 89,
        b: 182,
    };
    pub const ORANGE: Rgb = Rgb {
        r: 230,
        g: 126,
        b: 34,
    };
    pub const CYAN: Rgb = Rgb {
        r: 26,
        g: 188,
        b: 156,
    };
}

/// Fixed stat block for an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub radius: f32,
    pub speed: f32,
    pub max_health: i32,
    /// Primary fire cooldown in ticks.
    pub fire_cooldown: u32,
    /// Special ability cooldown in ticks.
    pub special_cooldown: u32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub bullet_radius: f32,
    pub bullet_color: Rgb,
    pub body_color: Rgb,
}

/// Special cooldown shared by every archetype.
pub const SPECIAL_COOLDOWN: u32 = 100;

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Generic,
        Archetype::Gunner,
        Archetype::Tank,
        Archetype::Mage,
        Archetype::Genius,
    ];

    /// Archetypes a bot can be spawned as.
    pub const BOT_POOL: [Archetype; 3] = [Archetype::Gunner, Archetype::Tank, Archetype::Mage];

    /// Numeric class id: Generic=0, Gunner=1, Tank=2, Mage=3, Genius=4.
    pub fn index(self) -> u8 {
        match self {
            Archetype::Generic => 0,
            Archetype::Gunner => 1,
            Archetype::Tank => 2,
            Archetype::Mage => 3,
            Archetype::Genius => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.index() == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Generic => "generic",
            Archetype::Gunner => "gunner",
            Archetype::Tank => "tank",
            Archetype::Mage => "mage",
            Archetype::Genius => "genius",
        }
    }

    /// Whether selecting this class requires the progression unlock.
    pub fn requires_unlock(self) -> bool {
        self == Archetype::Genius
    }

    /// Stat block for this archetype in the given role.
    pub fn profile(self, role: Role) -> Profile {
        let base = match self {
            Archetype::Gunner => Profile {
                radius: 25.0,
                speed: 5.0,
                max_health: 100,
                fire_cooldown: 15,
                special_cooldown: SPECIAL_COOLDOWN,
                bullet_speed: 8.0,
                bullet_damage: 10,
                bullet_radius: 6.0,
                bullet_color: Rgb::YELLOW,
                body_color: Rgb::RED,
            },
            Archetype::Tank => Profile {
                radius: 32.0,
                speed: 3.0,
                max_health: 150,
                fire_cooldown: 30,
                special_cooldown: SPECIAL_COOLDOWN,
                bullet_speed: 6.0,
                bullet_damage: 20,
                bullet_radius: 10.0,
                bullet_color: Rgb::ORANGE,
                body_color: Rgb::GREEN,
            },
            Archetype::Mage => Profile {
                radius: 25.0,
                speed: 4.0,
                max_health: 100,
                fire_cooldown: 25,
                special_cooldown: SPECIAL_COOLDOWN,
                bullet_speed: 7.0,
                bullet_damage: 15,
                bullet_radius: 8.0,
                bullet_color: Rgb::PURPLE,
                body_color: Rgb::PURPLE,
            },
            Archetype::Genius => Profile {
                radius: 25.0,
                speed: 4.0,
                max_health: 100,
                fire_cooldown: 20,
                special_cooldown: SPECIAL_COOLDOWN,
                bullet_speed: 6.0,
                bullet_damage: 12,
                bullet_radius: 7.0,
                bullet_color: Rgb::CYAN,
                body_color: Rgb::CYAN,
            },
            Archetype::Generic => Profile {
                radius: 25.0,
                speed: 4.0,
                max_health: 100,
                fire_cooldown: 20,
                special_cooldown: SPECIAL_COOLDOWN,
                bullet_speed: 7.0,
                bullet_damage: 12,
                bullet_radius: 7.0,
                bullet_color: Rgb::BLUE,
                body_color: Rgb::BLUE,
            },
        };

        match role {
            Role::Bot => base,
            // The player wears the character-select color and fires in it, except the
            // gunner whose bullets are blue.
            Role::Player => {
                let body_color = match self {
                    Archetype::Gunner | Archetype::Generic => Rgb::BLUE,
                    Archetype::Tank => Rgb::ORANGE,
                    Archetype::Mage => Rgb::PURPLE,
                    Archetype::Genius => Rgb::CYAN,
                };
                Profile {
                    body_color,
                    bullet_color: body_color,
                    ..base
                }
            },
        }
    }
}

/// Scale an integer damage value by a multiplier, rounding to the nearest point.
pub fn scale_damage(base: i32, factor: f32) -> i32 {
    (base as f32 * factor).round() as i32
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown archetype name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownArchetype(pub String);

impl fmt::Display for UnknownArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown archetype: {}", self.0)
    }
}

impl std::error::Error for UnknownArchetype {}

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Ok(index) = lowered.parse::<u8>() {
            return Self::from_index(index).ok_or_else(|| UnknownArchetype(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|a| a.name() == lowered)
            .ok_or_else(|| UnknownArchetype(s.to_string()))
    }
}
