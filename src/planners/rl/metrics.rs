//! Moving-average training metrics for the hornet agent

use std::collections::VecDeque;
use std::time::Instant;

use super::agent::Decision;
use super::exploration::Source;
use super::learner::UpdateLosses;

/// Windowed mean of one per-step training signal, such as a loss or the heuristic rate
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f32>,
    window_size: usize,
    sum: f32,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() >= self.window_size {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f32
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Training metrics tracker
#[derive(Debug)]
pub struct TrainingMetrics {
    pub move_loss: MovingAverage,
    pub action_loss: MovingAverage,
    pub value_loss: MovingAverage,
    /// Per-step reward
    pub reward: MovingAverage,
    /// Share of channels resolved by the heuristic
    pub heuristic_rate: MovingAverage,
    /// Latest exploration threshold
    pub epsilon: f64,
    /// Total steps recorded
    pub steps: usize,
    start_time: Instant,
}

impl TrainingMetrics {
    pub fn new(window_size: usize) -> Self {
        Self {
            move_loss: MovingAverage::new(window_size),
            action_loss: MovingAverage::new(window_size),
            value_loss: MovingAverage::new(window_size),
            reward: MovingAverage::new(window_size),
            heuristic_rate: MovingAverage::new(window_size),
            epsilon: 0.0,
            steps: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one decision and its reward
    pub fn record_step(&mut self, decision: &Decision, reward: f32, epsilon: f64) {
        let heuristic_channels = [decision.movement_source, decision.action_source]
            .iter()
            .filter(|source| **source == Source::Heuristic)
            .count();

        self.heuristic_rate.push(heuristic_channels as f32 / 2.0);
        self.reward.push(reward);
        self.epsilon = epsilon;
        self.steps += 1;
    }

    /// Record training losses
    pub fn record_losses(&mut self, losses: &UpdateLosses) {
        self.move_loss.push(losses.move_loss);
        self.action_loss.push(losses.action_loss);
        self.value_loss.push(losses.value_loss);
    }

    /// Get steps per second
    pub fn steps_per_second(&self) -> f64 {
        let duration = self.start_time.elapsed().as_secs_f64();
        if duration > 0.0 {
            self.steps as f64 / duration
        } else {
            0.0
        }
    }

    /// Log current metrics to console
    pub fn log_to_console(&self) {
        tracing::info!(
            "Step {} | SPS {:.1} | epsilon {:.4} | heuristic {:.1}%",
            self.steps,
            self.steps_per_second(),
            self.epsilon,
            self.heuristic_rate.average() * 100.0
        );
        tracing::info!(
            "  Losses: move={:.4}, action={:.4}, value={:.4} | reward={:.3}",
            self.move_loss.average(),
            self.action_loss.average(),
            self.value_loss.average(),
            self.reward.average()
        );
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut avg = MovingAverage::new(3);

        avg.push(1.0);
        assert!((avg.average() - 1.0).abs() < 1e-6);

        avg.push(2.0);
        assert!((avg.average() - 1.5).abs() < 1e-6);

        avg.push(3.0);
        assert!((avg.average() - 2.0).abs() < 1e-6);

        avg.push(4.0); // Pushes out 1.0
        assert!((avg.average() - 3.0).abs() < 1e-6);
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn test_record_step_tracks_heuristic_share() {
        let mut metrics = TrainingMetrics::new(10);
        let decision = Decision {
            movement: 0,
            action: 6,
            movement_source: Source::Heuristic,
            action_source: Source::Policy,
        };

        metrics.record_step(&decision, 1.0, 0.05);
        metrics.record_step(
            &Decision {
                movement_source: Source::Heuristic,
                action_source: Source::Heuristic,
                ..decision
            },
            -1.0,
            0.04,
        );

        assert_eq!(metrics.steps, 2);
        assert!((metrics.heuristic_rate.average() - 0.75).abs() < 1e-6);
        assert!(metrics.reward.average().abs() < 1e-6);
        assert_eq!(metrics.epsilon, 0.04);
    }

    #[test]
    fn test_record_losses() {
        let mut metrics = TrainingMetrics::default();
        metrics.record_losses(&UpdateLosses {
            move_loss: 0.5,
            action_loss: 1.5,
            value_loss: 2.0,
            advantage: 1.0,
        });

        assert!((metrics.action_loss.average() - 1.5).abs() < 1e-6);
        assert!(metrics.move_loss.len() == 1);
    }
}
