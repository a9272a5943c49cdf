//! Hover transitions, press ripples and the shared animation driver.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{markup::ButtonCoords, message::MessageRef};

pub use crate::domain::events::TimeMs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Enter,
    Leave,
}

impl Direction {
    fn final_value(self) -> f64 {
        match self {
            Direction::Enter => 1.0,
            Direction::Leave => 0.0,
        }
    }
}

/// Progress of a transition in [0, 1] after `elapsed` of `duration`.
pub fn ease(elapsed: TimeMs, duration: TimeMs) -> f64 {
    if duration <= 0 {
        return 1.0;
    }
    (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
}

/// Running hover transitions of one keyboard, keyed by button.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    entries: BTreeMap<ButtonCoords, (TimeMs, Direction)>,
}

impl AnimationState {
    pub fn start(&mut self, coords: ButtonCoords, direction: Direction, now: TimeMs) {
        self.entries.insert(coords, (now, direction));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reports the current hover fraction of every animating button and drops
    /// finished transitions.
    pub fn step(&mut self, now: TimeMs, duration: TimeMs, mut apply: impl FnMut(ButtonCoords, f64)) {
        self.entries.retain(|&coords, &mut (started, direction)| {
            let progress = ease(now - started, duration);
            if progress >= 1.0 {
                apply(coords, direction.final_value());
                false
            } else {
                let value = match direction {
                    Direction::Enter => progress,
                    Direction::Leave => 1.0 - progress,
                };
                apply(coords, value);
                true
            }
        });
    }
}

/// Press feedback on a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ripple {
    released_at: Option<TimeMs>,
}

impl Ripple {
    pub fn pressed() -> Self {
        Self { released_at: None }
    }

    pub fn release(&mut self, now: TimeMs) {
        self.released_at.get_or_insert(now);
    }

    /// 1 while held, fading to 0 over `duration` after release.
    pub fn opacity(&self, now: TimeMs, duration: TimeMs) -> f64 {
        match self.released_at {
            None => 1.0,
            Some(released) => 1.0 - ease(now - released, duration),
        }
    }

    pub fn is_finished(&self, now: TimeMs, duration: TimeMs) -> bool {
        self.opacity(now, duration) <= 0.0
    }
}

/// Steps every animating keyboard from a single timer.
///
/// Keyboards register when they start animating and are dropped once their
/// step reports nothing left to animate. An idle driver needs no ticks.
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    active: BTreeSet<MessageRef>,
}

impl AnimationDriver {
    pub fn register(&mut self, keyboard: MessageRef) {
        self.active.insert(keyboard);
    }

    pub fn unregister(&mut self, keyboard: MessageRef) {
        self.active.remove(&keyboard);
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Calls `step` for each registered keyboard; `step` returns whether that
    /// keyboard still animates.
    pub fn tick(&mut self, now: TimeMs, mut step: impl FnMut(MessageRef, TimeMs) -> bool) {
        self.active.retain(|&keyboard| step(keyboard, now));
        if self.active.is_empty() {
            tracing::trace!("animation driver idle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_is_linear_and_clamped() {
        assert_eq!(ease(0, 200), 0.0);
        assert_eq!(ease(50, 200), 0.25);
        assert_eq!(ease(400, 200), 1.0);
        assert_eq!(ease(-10, 200), 0.0);
        assert_eq!(ease(5, 0), 1.0);
    }

    #[test]
    fn entering_transition_rises_then_completes() {
        let mut state = AnimationState::default();
        let coords = ButtonCoords::new(0, 1);
        state.start(coords, Direction::Enter, 1_000);

        let mut seen = Vec::new();
        state.step(1_050, 100, |c, value| seen.push((c, value)));
        assert_eq!(seen, vec![(coords, 0.5)]);
        assert_eq!(state.len(), 1);

        seen.clear();
        state.step(1_100, 100, |c, value| seen.push((c, value)));
        assert_eq!(seen, vec![(coords, 1.0)]);
        assert!(state.is_empty());
    }

    #[test]
    fn leaving_transition_falls_to_zero() {
        let mut state = AnimationState::default();
        state.start(ButtonCoords::new(1, 0), Direction::Leave, 0);

        let mut values = Vec::new();
        state.step(25, 100, |_, value| values.push(value));
        state.step(500, 100, |_, value| values.push(value));

        assert_eq!(values, vec![0.75, 0.0]);
        assert!(state.is_empty());
    }

    #[test]
    fn restarting_overwrites_direction() {
        let mut state = AnimationState::default();
        let coords = ButtonCoords::new(0, 0);
        state.start(coords, Direction::Enter, 0);
        state.start(coords, Direction::Leave, 40);

        let mut values = Vec::new();
        state.step(40, 100, |_, value| values.push(value));

        assert_eq!(state.len(), 1);
        assert_eq!(values, vec![1.0]);
    }

    #[test]
    fn ripple_holds_then_fades() {
        let mut ripple = Ripple::pressed();
        assert_eq!(ripple.opacity(10_000, 300), 1.0);

        ripple.release(100);
        ripple.release(250);
        assert_eq!(ripple.opacity(250, 300), 0.5);
        assert!(!ripple.is_finished(250, 300));
        assert!(ripple.is_finished(400, 300));
    }

    #[test]
    fn driver_goes_idle_when_keyboards_finish() {
        let mut driver = AnimationDriver::default();
        assert!(driver.is_idle());

        let first = MessageRef::new(1, 1);
        let second = MessageRef::new(1, 2);
        driver.register(first);
        driver.register(second);
        driver.register(first);
        assert_eq!(driver.active_count(), 2);

        driver.tick(10, |keyboard, _| keyboard == second);
        assert_eq!(driver.active_count(), 1);

        driver.tick(20, |_, _| false);
        assert!(driver.is_idle());
    }

    #[test]
    fn idle_driver_calls_nothing() {
        let mut driver = AnimationDriver::default();
        let mut calls = 0;

        driver.tick(0, |_, _| {
            calls += 1;
            true
        });

        assert_eq!(calls, 0);
    }
}
