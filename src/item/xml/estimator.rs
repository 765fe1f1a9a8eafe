/// High-water-mark estimate of the serialized size of one record.
///
/// The estimate is a heuristic upper bound, not a proof: it is the largest
/// record observed so far, scaled by the growth factor. Before any record has
/// been measured it is bootstrapped from the overhead of an empty document.
/// It never decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEstimator {
    growth_factor: f64,
    estimate: usize,
}

impl SizeEstimator {
    pub fn new(growth_factor: f64) -> Self {
        Self {
            growth_factor,
            estimate: 0,
        }
    }

    /// Seeds the estimate from the size of an empty document, once.
    pub fn bootstrap(&mut self, overhead: usize) {
        if self.estimate == 0 {
            self.estimate = self.scale(overhead);
        }
    }

    /// Records the size a record added to its document.
    ///
    /// Returns `true` when the estimate grew.
    pub fn observe(&mut self, delta: usize) -> bool {
        let scaled = self.scale(delta);
        if scaled > self.estimate {
            self.estimate = scaled;
            return true;
        }
        false
    }

    /// Whether a document of `current` bytes risks exceeding `max_size` once
    /// one more record is appended.
    ///
    /// The closing root tag is not part of `current`, so it is not budgeted.
    pub fn would_overflow(&self, current: usize, max_size: usize) -> bool {
        current >= max_size.saturating_sub(self.estimate)
    }

    pub fn estimate(&self) -> usize {
        self.estimate
    }

    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    fn scale(&self, size: usize) -> usize {
        (size as f64 * self.growth_factor) as usize
    }
}
