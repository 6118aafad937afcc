use tokio::sync::mpsc;

use fighters_arena::FightersArena;
use fighters_core::events::{MatchEvent, MatchSummary};

use crate::game_loop::{EndReason, MatchBroadcast};

/// Read-only consumer of match output.
pub trait Presenter {
    fn frame(&mut self, tick: u64, snapshot: &[u8]);

    fn events(&mut self, _tick: u64, _events: &[MatchEvent]) {}

    fn match_ended(&mut self, summary: &MatchSummary, reason: EndReason);
}

/// Feed broadcasts to a presenter until the match ends or the loop goes away.
/// Returns the final summary if the loop reported one.
pub async fn drive_presenter<P: Presenter + ?Sized>(
    rx: &mut mpsc::UnboundedReceiver<MatchBroadcast>,
    presenter: &mut P,
) -> Option<(MatchSummary, EndReason)> {
    while let Some(msg) = rx.recv().await {
        match msg {
            MatchBroadcast::Snapshot { tick, state } => presenter.frame(tick, &state),
            MatchBroadcast::Events { tick, events } => presenter.events(tick, &events),
            MatchBroadcast::MatchEnded { summary, reason } => {
                presenter.match_ended(&summary, reason);
                return Some((summary, reason));
            },
        }
    }
    None
}

/// Headless presenter that logs a HUD line at a fixed tick interval.
pub struct LogPresenter {
    hud_interval: u64,
    unlock_percent: u8,
}

impl LogPresenter {
    pub fn new(hud_interval: u64, unlock_percent: u8) -> Self {
        Self {
            hud_interval: hud_interval.max(1),
            unlock_percent,
        }
    }
}

impl Presenter for LogPresenter {
    fn frame(&mut self, tick: u64, snapshot: &[u8]) {
        if tick % self.hud_interval != 0 {
            return;
        }
        let Some(state) = FightersArena::decode_snapshot(snapshot) else {
            return;
        };
        let player = &state.player;
        tracing::info!(
            tick,
            health = player.health,
            max_health = player.profile.max_health,
            kills = state.kills,
            bots = state.bots.len(),
            projectiles = player.projectiles.len(),
            genius_unlock = self.unlock_percent,
            "HUD"
        );
    }

    fn events(&mut self, tick: u64, events: &[MatchEvent]) {
        for event in events {
            match event {
                MatchEvent::BotKilled {
                    bot_id,
                    archetype,
                    cause,
                } => tracing::info!(tick, bot_id, %archetype, ?cause, "Bot down"),
                MatchEvent::SpawnFailed { attempts } => {
                    tracing::debug!(tick, attempts, "Bot respawn skipped")
                },
                _ => {},
            }
        }
    }

    fn match_ended(&mut self, summary: &MatchSummary, reason: EndReason) {
        tracing::info!(
            kills = summary.kills,
            archetype = %summary.archetype,
            ticks = summary.ticks,
            ?reason,
            "Game over"
        );
    }
}
