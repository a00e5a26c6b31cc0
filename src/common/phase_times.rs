use std::time::Duration;

/// Accumulates per-phase wall-clock durations across frames.
#[derive(Debug, Default)]
pub struct PhaseTimes {
    frames: usize,
    pre: Duration,
    run: Duration,
    post: Duration,
    last_run: Duration,
}

impl PhaseTimes {
    pub fn record(&mut self, pre: Duration, run: Duration, post: Duration) {
        self.frames += 1;
        self.pre += pre;
        self.run += run;
        self.post += post;
        self.last_run = run;
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Inference duration of the most recent frame.
    pub fn last_run(&self) -> Duration {
        self.last_run
    }

    pub fn avg_run(&self) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        self.run / self.frames as u32
    }

    pub fn avg_total(&self) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        (self.pre + self.run + self.post) / self.frames as u32
    }

    pub fn clear(&mut self) {
        *self = Default::default();
    }
}
