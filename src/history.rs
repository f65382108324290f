//! Rolling record of recent cycle measurements.

use heapless::HistoryBuffer;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Keeps the last 128 inter-pole intervals for inspection over the debug
/// link. Diagnostics only — nothing here feeds back into timing.
pub struct CycleHistory {
    intervals: HistoryBuffer<u32, 128>,
}

impl CycleHistory {
    pub fn new() -> Self {
        Self {
            intervals: HistoryBuffer::new(),
        }
    }

    pub fn record(&mut self, interval_ticks: u32) {
        self.intervals.write(interval_ticks);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.len() == 0
    }

    /// The most recently recorded interval, if any cycle has completed.
    pub fn most_recent(&self) -> Option<u32> {
        self.intervals.recent().copied()
    }
}

impl Default for CycleHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl Format for CycleHistory {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "CycleHistory {{ cycles: {}, last_interval: {} }}",
            self.len(),
            self.most_recent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = CycleHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.most_recent(), None);
    }

    #[test]
    fn tracks_the_latest_interval() {
        let mut history = CycleHistory::new();
        history.record(2000);
        history.record(1980);
        assert_eq!(history.len(), 2);
        assert_eq!(history.most_recent(), Some(1980));
    }

    #[test]
    fn overwrites_oldest_entries_once_full() {
        let mut history = CycleHistory::new();
        for interval in 0..200 {
            history.record(interval);
        }
        assert_eq!(history.len(), 128);
        assert_eq!(history.most_recent(), Some(199));
    }
}
