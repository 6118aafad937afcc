pub mod archetype;
pub mod events;
pub mod geometry;
pub mod intent;
pub mod simulation;
pub mod stats;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::MatchEvent;
    use crate::intent::Intent;
    use crate::simulation::Simulation;
    use crate::stats::{MemoryStore, StatsRecord, StatsTracker, encode_record};

    /// Run `n` ticks with the same intent, returning all accumulated events.
    pub fn run_ticks(sim: &mut dyn Simulation, n: usize, intent: &Intent) -> Vec<MatchEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(intent));
            if sim.is_match_over() {
                break;
            }
        }
        all_events
    }

    /// Tracker over an in-memory store pre-seeded with `record`.
    pub fn tracker_with(record: &StatsRecord) -> StatsTracker<MemoryStore> {
        let contents = encode_record(record).expect("test record must encode");
        StatsTracker::open(MemoryStore::with_contents(contents))
    }

    // ================================================================
    // Simulation contract checks
    // ================================================================
    // Every Simulation implementation is expected to pass these. Implementors call them
    // from their own #[cfg(test)] modules with a freshly built instance.

    /// A fresh simulation must produce a non-empty snapshot.
    pub fn contract_snapshot_nonempty(sim: &dyn Simulation) {
        assert!(
            !sim.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// An idle tick must still advance state (tick counter, bot AI).
    pub fn contract_update_advances_state(sim: &mut dyn Simulation) {
        let before = sim.serialize_state();
        sim.update(&Intent::idle());
        let after = sim.serialize_state();
        assert_ne!(before, after, "update() must advance state");
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(sim: &mut dyn Simulation) {
        sim.pause();
        let before = sim.serialize_state();
        let events = sim.update(&Intent::idle());
        assert!(events.is_empty(), "paused simulation must not emit events");
        assert_eq!(
            before,
            sim.serialize_state(),
            "State must not change while paused"
        );

        sim.resume();
        sim.update(&Intent::idle());
        assert_ne!(before, sim.serialize_state(), "State must change after resume");
    }

    /// Once the match is over, further updates are no-ops.
    pub fn contract_finished_match_is_frozen(sim: &mut dyn Simulation) {
        assert!(sim.is_match_over(), "precondition: match must be over");
        let before = sim.serialize_state();
        let events = sim.update(&Intent::idle());
        assert!(events.is_empty());
        assert_eq!(before, sim.serialize_state());
    }
}
