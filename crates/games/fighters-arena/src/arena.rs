use serde::{Deserialize, Serialize};

use fighters_core::geometry::Rect;

/// Built-in layout presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Six walls: two platforms per side plus two center pillars.
    Classic,
    /// No obstacles.
    Open,
}

impl LayoutKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(LayoutKind::Classic),
            "open" => Some(LayoutKind::Open),
            _ => None,
        }
    }
}

/// Static obstacle set and spawn points for a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub name: String,
    pub obstacles: Vec<Rect>,
    pub player_spawn: (f32, f32),
    /// Starting positions for the opening bots, reused in order if more bots are requested.
    pub bot_spawns: Vec<(f32, f32)>,
}

/// Load a layout from a JSON file, returning `None` if the file is missing or invalid.
pub fn load_layout_from_file(path: &str) -> Option<ArenaLayout> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<ArenaLayout>(&content) {
            Ok(layout) if layout.bot_spawns.is_empty() => {
                tracing::warn!("Layout {path} has no bot spawns");
                None
            },
            Ok(layout) => Some(layout),
            Err(e) => {
                tracing::warn!("Failed to parse {path}: {e}");
                None
            },
        },
        Err(_) => None,
    }
}

/// Resolve a layout by name, preferring a JSON file from the arenas directory.
///
/// Checks env var `FIGHTERS_ARENAS_DIR` (default `config/arenas`) for `{name}.json`.
/// Falls back to the matching built-in preset, or `classic` for unknown names.
pub fn load_layout(name: &str, width: f32, height: f32) -> ArenaLayout {
    let dir =
        std::env::var("FIGHTERS_ARENAS_DIR").unwrap_or_else(|_| "config/arenas".to_string());
    let path = format!("{dir}/{name}.json");
    if let Some(layout) = load_layout_from_file(&path) {
        return layout;
    }
    let kind = LayoutKind::from_name(name).unwrap_or_else(|| {
        tracing::warn!(name, "Unknown layout, using classic");
        LayoutKind::Classic
    });
    generate_layout(kind, width, height)
}

/// Generate a built-in layout scaled to the arena dimensions.
pub fn generate_layout(kind: LayoutKind, width: f32, height: f32) -> ArenaLayout {
    let bot_spawns = vec![
        (200.0, 200.0),
        (width - 200.0, height - 200.0),
        (width - 200.0, 200.0),
    ];
    let player_spawn = (width / 2.0, height / 2.0);

    let (name, obstacles) = match kind {
        LayoutKind::Open => ("open", Vec::new()),
        LayoutKind::Classic => {
            let cx = width / 2.0;
            let obstacles = vec![
                // Upper platforms
                Rect::new(300.0, 300.0, 150.0, 30.0),
                Rect::new(width - 450.0, 300.0, 150.0, 30.0),
                // Lower platforms
                Rect::new(400.0, 500.0, 200.0, 30.0),
                Rect::new(width - 600.0, 500.0, 200.0, 30.0),
                // Center pillars
                Rect::new(cx - 100.0, 100.0, 30.0, 150.0),
                Rect::new(cx - 100.0, height - 250.0, 30.0, 150.0),
            ];
            ("classic", obstacles)
        },
    };

    ArenaLayout {
        name: name.to_string(),
        obstacles,
        player_spawn,
        bot_spawns,
    }
}
