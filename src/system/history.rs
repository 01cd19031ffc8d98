use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 60;

/// Rolling window of system-wide percentage readings (CPU or memory),
/// oldest first.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, percent: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(percent);
    }

    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_latest() {
        let mut history = History::new(60);
        history.push(5.0);
        history.push(10.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(10.0));
    }

    #[test]
    fn ring_buffer_caps_at_capacity() {
        let mut history = History::new(5);
        for i in 0..10 {
            history.push(i as f32);
        }
        assert_eq!(history.to_vec(), vec![5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn sixty_first_sample_evicts_oldest() {
        let mut history = History::default();
        for i in 0..61 {
            history.push(i as f32);
        }
        assert_eq!(history.len(), 60);
        assert_eq!(history.to_vec().first().copied(), Some(1.0));
        assert_eq!(history.latest(), Some(60.0));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = History::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.to_vec(), vec![2.0]);
    }
}
