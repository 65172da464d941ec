//! Bounded sample histories
//!
//! Fixed-capacity FIFO used by calibration and the anchor stabilizer. A push
//! onto a full history evicts the oldest sample, so the length never exceeds
//! the capacity. Order statistics are recomputed on demand from a sorted
//! copy, which is cheap at these sizes and camera frame rates.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent samples.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: T) {
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

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }
}

impl BoundedHistory<f32> {
    fn sorted(&self) -> Vec<f32> {
        let mut values: Vec<f32> = self.samples.iter().copied().collect();
        values.sort_by(f32::total_cmp);
        values
    }

    /// Median of the stored samples, `None` when empty.
    pub fn median(&self) -> Option<f32> {
        median_sorted(&self.sorted())
    }

    /// Linearly interpolated percentile, `None` when empty.
    pub fn percentile(&self, pct: f32) -> Option<f32> {
        percentile_sorted(&self.sorted(), pct)
    }
}

/// Median of an ascending slice. Even lengths average the two middle values.
pub fn median_sorted(values: &[f32]) -> Option<f32> {
    let len = values.len();
    if len == 0 {
        return None;
    }
    if len % 2 == 0 {
        Some((values[len / 2 - 1] + values[len / 2]) / 2.0)
    } else {
        Some(values[len / 2])
    }
}

/// Percentile of an ascending slice with linear interpolation between the
/// closest ranks (rank = pct / 100 * (n - 1)).
pub fn percentile_sorted(values: &[f32], pct: f32) -> Option<f32> {
    let len = values.len();
    if len == 0 {
        return None;
    }
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (len - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f32;
    Some(values[lo] + (values[hi] - values[lo]) * frac)
}
