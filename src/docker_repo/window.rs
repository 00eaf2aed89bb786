// Bounded per-container buffer of stats samples between two reports.

use crate::models::{RawStat, Sample};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample<RawStat>>,
    capacity: usize,
}

impl SampleWindow {
    /// `capacity` is clamped to 2, the smallest window a rate can be computed from.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, dropping the oldest one when full.
    pub fn push(&mut self, sample: Sample<RawStat>) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Takes every buffered sample. The newest one stays behind as the first sample of
    /// the next window so the interval spanning two reports is not lost.
    pub fn take_for_report(&mut self) -> Vec<Sample<RawStat>> {
        let taken: Vec<Sample<RawStat>> = self.samples.drain(..).collect();
        if let Some(last) = taken.last() {
            self.samples.push_back(last.clone());
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: f64) -> Sample<RawStat> {
        Sample::new(ts, RawStat::default())
    }

    #[test]
    fn push_drops_oldest_when_full() {
        let mut w = SampleWindow::new(3);
        for ts in 0..5 {
            w.push(sample(ts as f64));
        }
        let taken = w.take_for_report();
        let ts: Vec<f64> = taken.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn capacity_is_at_least_two() {
        let mut w = SampleWindow::new(0);
        w.push(sample(1.0));
        w.push(sample(2.0));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn take_for_report_keeps_newest_as_seed() {
        let mut w = SampleWindow::new(10);
        w.push(sample(1.0));
        w.push(sample(2.0));
        let first = w.take_for_report();
        assert_eq!(first.len(), 2);
        assert_eq!(w.len(), 1);

        w.push(sample(3.0));
        let second = w.take_for_report();
        let ts: Vec<f64> = second.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![2.0, 3.0]);
    }

    #[test]
    fn take_for_report_on_empty_window() {
        let mut w = SampleWindow::new(4);
        assert!(w.take_for_report().is_empty());
        assert!(w.is_empty());
    }
}
