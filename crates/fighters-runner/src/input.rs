use fighters_core::intent::{InputSource, Intent};

/// Input source that never does anything. The avatar stands still.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn current_intent(&mut self) -> Intent {
        Intent::idle()
    }
}

/// Replays a looping list of `(intent, ticks)` steps.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: Vec<(Intent, u32)>,
    index: usize,
    elapsed: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<(Intent, u32)>) -> Self {
        Self {
            steps,
            index: 0,
            elapsed: 0,
        }
    }

    /// Headless demo pattern: strafe a box while firing, with periodic specials and mines.
    pub fn patrol() -> Self {
        let shoot = |intent: Intent| Intent {
            fire: true,
            ..intent
        };
        Self::new(vec![
            (shoot(Intent::from_keys(false, false, false, true)), 40),
            (
                Intent {
                    special: true,
                    mine: true,
                    ..Intent::idle()
                },
                1,
            ),
            (shoot(Intent::from_keys(false, true, false, false)), 40),
            (shoot(Intent::from_keys(false, false, true, false)), 40),
            (
                Intent {
                    special: true,
                    ..Intent::idle()
                },
                1,
            ),
            (shoot(Intent::from_keys(true, false, false, false)), 40),
        ])
    }
}

impl InputSource for ScriptedInput {
    fn current_intent(&mut self) -> Intent {
        let Some(&(intent, ticks)) = self.steps.get(self.index) else {
            return Intent::idle();
        };
        self.elapsed += 1;
        if self.elapsed >= ticks {
            self.elapsed = 0;
            self.index = (self.index + 1) % self.steps.len();
        }
        intent
    }
}
