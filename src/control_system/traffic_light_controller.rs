use crate::config::PhaseDurations;
use crate::simulation_engine::intersections::{Approach, LightState};
use rand::Rng;
use std::time::{Duration, Instant};

/// Single-token light controller for the crossing.
///
/// Only the active approach shows its own phase; the other three are red. The
/// token moves to the next approach at the YELLOW -> RED transition, so each
/// approach's turn is RED -> GREEN -> YELLOW, and one full rotation takes four
/// times `green + yellow + red`.
#[derive(Debug, Clone)]
pub struct TrafficLightController {
    active_approach: Approach,
    light_state: LightState,
    phase_started_at: Instant,
    durations: PhaseDurations,
}

impl TrafficLightController {
    /// Starts `start` on GREEN at `started_at`.
    pub fn new(start: Approach, started_at: Instant, durations: PhaseDurations) -> Self {
        Self {
            active_approach: start,
            light_state: LightState::Green,
            phase_started_at: started_at,
            durations,
        }
    }

    /// Like `new`, with a uniformly random starting approach.
    pub fn with_random_start(started_at: Instant, durations: PhaseDurations) -> Self {
        let mut rng = rand::rng();
        let start = Approach::ALL[rng.random_range(0..Approach::ALL.len())];
        Self::new(start, started_at, durations)
    }

    /// Moves the automaton forward to `now` and reports the light.
    ///
    /// At most one transition happens per call, and the new phase is timed from
    /// `now`. Calling again with the same `now` never transitions twice.
    pub fn advance(&mut self, now: Instant) -> (Approach, LightState) {
        if self.time_in_phase(now) >= self.phase_duration(self.light_state) {
            let next = self.light_state.next();
            if self.light_state == LightState::Yellow {
                self.active_approach = self.active_approach.next();
            }
            log::info!(
                "Light {:?} -> {:?}, active approach: {}",
                self.light_state,
                next,
                self.active_approach
            );
            self.light_state = next;
            self.phase_started_at = now;
        }
        (self.active_approach, self.light_state)
    }

    pub fn active_approach(&self) -> Approach {
        self.active_approach
    }

    pub fn light_state(&self) -> LightState {
        self.light_state
    }

    /// Light shown to `approach`. Inactive approaches are always red.
    pub fn light_for(&self, approach: Approach) -> LightState {
        if approach == self.active_approach {
            self.light_state
        } else {
            LightState::Red
        }
    }

    pub fn time_in_phase(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.phase_started_at)
    }

    pub fn phase_duration(&self, state: LightState) -> Duration {
        match state {
            LightState::Green => self.durations.green,
            LightState::Yellow => self.durations.yellow,
            LightState::Red => self.durations.red,
        }
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }
}
