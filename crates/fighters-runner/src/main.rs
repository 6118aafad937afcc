use tracing_subscriber::EnvFilter;

use fighters_arena::FightersArena;
use fighters_core::archetype::Archetype;
use fighters_core::stats::{JsonFileStore, StatsCollaborator, StatsTracker};
use fighters_runner::config::{LogFormat, RunnerConfig};
use fighters_runner::game_loop::{
    EndReason, MatchCommand, MatchSessionConfig, spawn_match_session,
};
use fighters_runner::input::ScriptedInput;
use fighters_runner::presenter::{LogPresenter, drive_presenter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let config = RunnerConfig::load();
    init_tracing(config.log_format);
    config.validate();

    tracing::info!(
        archetype = %config.archetype,
        matches = config.match_count,
        stats_path = %config.stats_path,
        "Super Fighters starting"
    );

    let mut stats = StatsTracker::open(JsonFileStore::new(&config.stats_path));
    let archetype = if stats.is_unlocked(config.archetype) {
        config.archetype
    } else {
        tracing::warn!(
            requested = %config.archetype,
            progress = stats.unlock_progress_percent(),
            "Class is locked, playing gunner"
        );
        Archetype::Gunner
    };

    for match_number in 1..=config.match_count {
        let session = MatchSessionConfig {
            tick_rate: config.tick_rate,
            max_ticks: config.max_ticks,
        };
        let mut presenter = LogPresenter::new(config.hud_interval, stats.unlock_progress_percent());
        let (cmd_tx, mut broadcast_rx, handle) = spawn_match_session(
            Box::new(FightersArena::new(archetype)),
            Box::new(ScriptedInput::patrol()),
            stats,
            session,
        );
        tracing::info!(match_number, "Match started");

        tokio::select! {
            _ = drive_presenter(&mut broadcast_rx, &mut presenter) => {},
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping match");
                let _ = cmd_tx.send(MatchCommand::Stop);
            }
        }

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Match task failed");
                return;
            },
        };
        stats = outcome.stats;

        let game_over = stats.summary(outcome.summary.kills);
        tracing::info!(
            match_number,
            kills = game_over.kills,
            total_kills = game_over.total_kills,
            best_score = game_over.best_score,
            genius_unlock = stats.unlock_progress_percent(),
            "Match summary"
        );

        if outcome.reason == EndReason::Stopped {
            break;
        }
    }
}
