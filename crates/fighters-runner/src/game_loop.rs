use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use fighters_core::events::{MatchEvent, MatchSummary};
use fighters_core::intent::{InputSource, Intent, IntentBuffer};
use fighters_core::simulation::Simulation;
use fighters_core::stats::StatsCollaborator;

/// Shortest period between ticks, however high the requested rate.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);
const FALLBACK_TICK_RATE: f32 = 60.0;

/// Commands sent from the front end to the match loop.
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// Intent sample from an event-driven input device. Merged with the polled source.
    Intent(Intent),
    Pause,
    Resume,
    Stop,
}

/// Why a match loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The player's health reached zero. The only outcome that records stats.
    PlayerDown,
    TickLimit,
    Stopped,
}

/// Messages from the match loop to the presentation layer.
#[derive(Debug, Clone)]
pub enum MatchBroadcast {
    /// Full state after a tick (MessagePack).
    Snapshot { tick: u64, state: Vec<u8> },
    /// Events produced by a tick. Only sent when non-empty.
    Events { tick: u64, events: Vec<MatchEvent> },
    /// The loop has exited.
    MatchEnded {
        summary: MatchSummary,
        reason: EndReason,
    },
}

/// Pacing settings for one match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchSessionConfig {
    /// Overrides the simulation's tick rate.
    pub tick_rate: Option<f32>,
    /// End the match after this many simulated ticks.
    pub max_ticks: Option<u64>,
}

/// Result handed back when a match task finishes. Returns the stats collaborator
/// to the caller so the next match can reuse it.
#[derive(Debug)]
pub struct MatchOutcome<S> {
    pub summary: MatchSummary,
    pub reason: EndReason,
    pub stats: S,
}

/// Spawn a match loop as a tokio task.
/// Returns the command sender, broadcast receiver and the task handle.
pub fn spawn_match_session<S>(
    mut sim: Box<dyn Simulation>,
    mut input: Box<dyn InputSource>,
    stats: S,
    config: MatchSessionConfig,
) -> (
    mpsc::UnboundedSender<MatchCommand>,
    mpsc::UnboundedReceiver<MatchBroadcast>,
    JoinHandle<MatchOutcome<S>>,
)
where
    S: StatsCollaborator + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut stats = stats;
        let reason = run_match_loop(
            &mut *sim,
            &mut *input,
            &mut stats,
            config,
            cmd_rx,
            &broadcast_tx,
        )
        .await;

        let summary = sim.summary();
        tracing::info!(
            ?reason,
            kills = summary.kills,
            ticks = summary.ticks,
            "Match loop finished"
        );
        let _ = broadcast_tx.send(MatchBroadcast::MatchEnded { summary, reason });
        MatchOutcome {
            summary,
            reason,
            stats,
        }
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Fixed-rate match loop. One simulation tick per interval tick.
async fn run_match_loop<S: StatsCollaborator>(
    sim: &mut dyn Simulation,
    input: &mut dyn InputSource,
    stats: &mut S,
    config: MatchSessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<MatchCommand>,
    broadcast_tx: &mpsc::UnboundedSender<MatchBroadcast>,
) -> EndReason {
    let tick_rate = config.tick_rate.unwrap_or_else(|| sim.tick_rate());
    let mut interval = tokio::time::interval(tick_interval(tick_rate));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let meta = sim.metadata();
    tracing::info!(game = %meta.name, tick_rate, "Match loop starting");

    // Initial frame so the presenter can draw before the first tick.
    let _ = broadcast_tx.send(MatchBroadcast::Snapshot {
        tick: 0,
        state: sim.serialize_state(),
    });

    let mut buffer = IntentBuffer::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                buffer.push(input.current_intent());
                let events = sim.update(&buffer.take());
                let tick = sim.summary().ticks;

                let _ = broadcast_tx.send(MatchBroadcast::Snapshot {
                    tick,
                    state: sim.serialize_state(),
                });
                if !events.is_empty() {
                    let _ = broadcast_tx.send(MatchBroadcast::Events { tick, events });
                }

                if sim.is_match_over() {
                    let summary = sim.summary();
                    stats.record_match(summary.kills, summary.archetype);
                    return EndReason::PlayerDown;
                }
                if let Some(limit) = config.max_ticks
                    && tick >= limit
                {
                    return EndReason::TickLimit;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(MatchCommand::Intent(intent)) => buffer.push(intent),
                    Some(MatchCommand::Pause) => {
                        tracing::debug!("Match paused");
                        sim.pause();
                    },
                    Some(MatchCommand::Resume) => {
                        tracing::debug!("Match resumed");
                        sim.resume();
                    },
                    Some(MatchCommand::Stop) | None => {
                        return EndReason::Stopped;
                    },
                }
            }
        }
    }
}

/// Period for a tick rate, floored at [`MIN_TICK_INTERVAL`].
fn tick_interval(tick_rate: f32) -> Duration {
    let rate = if tick_rate.is_finite() && tick_rate > 0.0 {
        tick_rate
    } else {
        tracing::warn!(tick_rate, "Invalid tick rate, using {FALLBACK_TICK_RATE}");
        FALLBACK_TICK_RATE
    };
    Duration::from_secs_f32(1.0 / rate).max(MIN_TICK_INTERVAL)
}
