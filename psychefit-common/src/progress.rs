//! Reflection stage progress model
//!
//! Purely cosmetic: a percentage that creeps up by a random amount each
//! tick, and four labelled steps that light up as thresholds are crossed.
//! Has no influence on scoring.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest increment per tick, in percentage points
pub const MAX_STEP_INCREMENT: f64 = 5.0;

/// Percent at which step N (0-based) completes and step N+1 activates
pub const STEP_THRESHOLDS: [f64; 3] = [30.0, 60.0, 90.0];

/// Labels shown next to each step
pub const STEP_LABELS: [&str; 4] = [
    "Gathering your answers",
    "Mapping anxiety and avoidance",
    "Locating your quadrant",
    "Writing your report",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Active,
    Completed,
}

/// Animated progress shown while "analysing" answers
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionProgress {
    percent: f64,
    steps: [StepState; 4],
}

impl ReflectionProgress {
    /// Fresh progress: 0%, first step active
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            steps: [
                StepState::Active,
                StepState::Pending,
                StepState::Pending,
                StepState::Pending,
            ],
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whole-number percent for display
    pub fn rounded_percent(&self) -> u8 {
        self.percent.round() as u8
    }

    pub fn steps(&self) -> &[StepState; 4] {
        &self.steps
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    /// Advance by a random amount in [0, 5), capped at 100
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let increment = rng.gen::<f64>() * MAX_STEP_INCREMENT;
        self.advance_by(increment);
    }

    /// Advance by a fixed amount, capped at 100
    pub fn advance_by(&mut self, amount: f64) {
        self.percent = (self.percent + amount.max(0.0)).min(100.0);

        for (i, threshold) in STEP_THRESHOLDS.iter().enumerate() {
            if self.percent > *threshold {
                self.promote(i, i + 1);
            }
        }
    }

    /// Jump to 100% (end of the reflection wait)
    pub fn finish(&mut self) {
        self.advance_by(100.0);
    }

    fn promote(&mut self, prev: usize, next: usize) {
        if self.steps[prev] != StepState::Completed {
            self.steps[prev] = StepState::Completed;
            self.steps[next] = StepState::Active;
        }
    }
}

impl Default for ReflectionProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initial_state() {
        let progress = ReflectionProgress::new();
        assert_eq!(progress.percent(), 0.0);
        assert_eq!(progress.steps()[0], StepState::Active);
        assert!(progress.steps()[1..].iter().all(|s| *s == StepState::Pending));
    }

    #[test]
    fn test_thresholds_promote_steps() {
        let mut progress = ReflectionProgress::new();
        progress.advance_by(30.0);
        // Threshold is exclusive
        assert_eq!(progress.steps()[0], StepState::Active);

        progress.advance_by(1.0);
        assert_eq!(progress.steps()[0], StepState::Completed);
        assert_eq!(progress.steps()[1], StepState::Active);

        progress.advance_by(60.0);
        assert_eq!(
            progress.steps(),
            &[
                StepState::Completed,
                StepState::Completed,
                StepState::Completed,
                StepState::Active
            ]
        );
    }

    #[test]
    fn test_jump_past_several_thresholds() {
        let mut progress = ReflectionProgress::new();
        progress.finish();
        assert!(progress.is_complete());
        assert_eq!(progress.rounded_percent(), 100);
        assert_eq!(progress.steps()[3], StepState::Active);
        assert!(progress.steps()[..3].iter().all(|s| *s == StepState::Completed));
    }

    #[test]
    fn test_random_ticks_are_monotonic_and_capped() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut progress = ReflectionProgress::new();
        let mut last = 0.0;

        for _ in 0..200 {
            progress.tick(&mut rng);
            assert!(progress.percent() >= last);
            assert!(progress.percent() - last < MAX_STEP_INCREMENT);
            assert!(progress.percent() <= 100.0);
            last = progress.percent();
        }
        assert!(progress.is_complete());
    }

    #[test]
    fn test_completed_step_never_regresses() {
        let mut progress = ReflectionProgress::new();
        progress.advance_by(35.0);
        progress.advance_by(1.0);
        assert_eq!(progress.steps()[0], StepState::Completed);
        assert_eq!(progress.steps()[1], StepState::Active);
    }
}
