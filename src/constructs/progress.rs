use crate::LoadStatus;

/// A point-in-time snapshot of a loader's counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub status: LoadStatus,
    /// Valid bytes held in the buffer
    pub loaded: usize,
    /// Source size reported by the backend at open time
    pub total: usize,
}
impl Progress {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.loaded)
    }

    /// Fraction of the source held in memory, in `[0, 1]`.
    ///
    /// An empty source counts as fully loaded once an episode has started.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            if self.status.is_empty() {
                0.0
            } else {
                1.0
            }
        } else {
            self.loaded as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.status.is_empty() && self.loaded == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let progress = Progress {
            status: LoadStatus::Loading,
            loaded: 250,
            total: 1000,
        };
        assert_eq!(progress.remaining(), 750);
        assert!((progress.fraction() - 0.25).abs() < f64::EPSILON);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_remaining_saturates() {
        let progress = Progress {
            status: LoadStatus::Loaded,
            loaded: 20,
            total: 10,
        };
        assert_eq!(progress.remaining(), 0);
    }

    #[test]
    fn test_empty_progress() {
        let progress = Progress::default();
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_zero_length_source_is_complete() {
        let progress = Progress {
            status: LoadStatus::Loaded,
            loaded: 0,
            total: 0,
        };
        assert_eq!(progress.fraction(), 1.0);
        assert!(progress.is_complete());
    }
}
