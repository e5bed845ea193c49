use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Running,
    Paused,
}

/// Fixed-period playback clock for random image replacement. Starts paused;
/// the UI polls it once per frame and performs one swap per elapsed period.
/// GUI-agnostic on purpose so the state machine is testable on its own.
#[derive(Debug, Clone)]
pub struct RotationTimer {
    playback: Playback,
    period: Duration,
    next_tick: Option<Instant>,
}

impl RotationTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            playback: Playback::Paused,
            period,
            next_tick: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.playback == Playback::Running
    }

    /// Label for the trigger control; flips on every toggle.
    pub fn button_label(&self) -> &'static str {
        match self.playback {
            Playback::Running => "Pause",
            Playback::Paused => "Play",
        }
    }

    /// Resuming schedules the first tick one full period from `now`;
    /// pausing drops the pending deadline entirely.
    pub fn toggle(&mut self, now: Instant) {
        self.playback = match self.playback {
            Playback::Paused => {
                self.next_tick = Some(now + self.period);
                Playback::Running
            }
            Playback::Running => {
                self.next_tick = None;
                Playback::Paused
            }
        };
    }

    /// Reports whether a tick is due, rescheduling the next one. At most one
    /// tick fires per call even if several periods elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.next_tick else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.next_tick = Some(now + self.period);
        true
    }

    /// Remaining wait before the next tick, used to schedule a repaint.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(2);

    #[test]
    fn starts_paused() {
        let mut timer = RotationTimer::new(PERIOD);
        let now = Instant::now();
        assert!(!timer.is_running());
        assert_eq!(timer.button_label(), "Play");
        assert!(!timer.poll(now + Duration::from_secs(60)));
        assert_eq!(timer.time_until_tick(now), None);
    }

    #[test]
    fn toggle_flips_state_and_label() {
        let mut timer = RotationTimer::new(PERIOD);
        let now = Instant::now();

        timer.toggle(now);
        assert!(timer.is_running());
        assert_eq!(timer.button_label(), "Pause");

        timer.toggle(now);
        assert!(!timer.is_running());
        assert_eq!(timer.button_label(), "Play");
    }

    #[test]
    fn tick_fires_only_after_a_full_period() {
        let mut timer = RotationTimer::new(PERIOD);
        let t0 = Instant::now();
        timer.toggle(t0);

        assert!(!timer.poll(t0));
        assert!(!timer.poll(t0 + Duration::from_millis(1999)));
        assert!(timer.poll(t0 + PERIOD));
        // rescheduled relative to the poll that fired
        assert!(!timer.poll(t0 + PERIOD));
        assert!(timer.poll(t0 + PERIOD + PERIOD));
    }

    #[test]
    fn pausing_cancels_the_pending_tick() {
        let mut timer = RotationTimer::new(PERIOD);
        let t0 = Instant::now();
        timer.toggle(t0); // running
        timer.toggle(t0 + Duration::from_secs(1)); // paused again
        assert!(!timer.poll(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn resume_schedules_from_resume_time() {
        let mut timer = RotationTimer::new(PERIOD);
        let t0 = Instant::now();
        timer.toggle(t0);
        timer.toggle(t0 + Duration::from_secs(1));
        let resume = t0 + Duration::from_secs(10);
        timer.toggle(resume);

        assert!(!timer.poll(resume + Duration::from_secs(1)));
        assert!(timer.poll(resume + PERIOD));
        assert_eq!(timer.time_until_tick(resume + PERIOD), Some(PERIOD));
    }
}
