use serde::{Deserialize, Serialize};

use crate::events::{MatchEvent, MatchSummary};
use crate::intent::Intent;

/// Contract between a match simulation and the runtime that paces it.
///
/// The runtime owns timing, input polling, presentation and stats; the simulation only
/// advances discrete ticks.
pub trait Simulation: Send {
    fn metadata(&self) -> SimulationMetadata;

    /// Ticks per second the runtime should pace at.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Advance exactly one tick with the human intent for that tick.
    fn update(&mut self, intent: &Intent) -> Vec<MatchEvent>;

    /// Read-only snapshot of the full state for presentation (MessagePack).
    fn serialize_state(&self) -> Vec<u8>;

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_match_over(&self) -> bool;

    /// Current tally. Final once `is_match_over` returns true.
    fn summary(&self) -> MatchSummary;
}

/// Descriptive data for menus and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub name: String,
    pub description: String,
    pub arena_width: f32,
    pub arena_height: f32,
}
