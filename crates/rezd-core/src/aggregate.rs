//! Fan-in aggregation of per-asset outcomes into the final result map.

use crate::types::{Outcome, ResultMap};

/// Collects outcomes as fetches complete, in whatever order they arrive.
/// Only resolved outcomes enter the map; failures are counted for the batch
/// summary log and otherwise dropped. Single-writer: the fan-in loop owns
/// the aggregator, so concurrent completions cannot lose updates.
pub struct Aggregator {
    expected: usize,
    reported: usize,
    failed: usize,
    map: ResultMap,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            reported: 0,
            failed: 0,
            map: ResultMap::new(),
        }
    }

    /// Record one outcome. Called exactly once per dispatched asset id.
    pub fn record(&mut self, asset_id: String, outcome: Outcome) {
        self.reported += 1;
        match outcome {
            Outcome::Resolved(dim) => {
                self.map.insert(asset_id, dim);
            }
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    /// Consume the aggregator, log the batch summary, and return the map.
    pub fn finish(self) -> ResultMap {
        tracing::info!(
            expected = self.expected,
            resolved = self.map.len(),
            failed = self.failed,
            "batch complete"
        );
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::types::Dimension;

    #[test]
    fn resolved_outcomes_enter_the_map() {
        let mut agg = Aggregator::new(2);
        agg.record("a".into(), Outcome::Resolved(Dimension { x: 10, y: 20 }));
        agg.record("b".into(), Outcome::Failed(FetchError::Http(404)));

        let map = agg.finish();
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], Dimension { x: 10, y: 20 });
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn empty_batch_finishes_with_empty_map() {
        let agg = Aggregator::new(0);
        assert!(agg.finish().is_empty());
    }

    #[test]
    fn duplicate_ids_keep_a_single_entry() {
        let mut agg = Aggregator::new(2);
        agg.record("a".into(), Outcome::Resolved(Dimension { x: 1, y: 1 }));
        agg.record("a".into(), Outcome::Resolved(Dimension { x: 2, y: 2 }));
        let map = agg.finish();
        assert_eq!(map.len(), 1);
    }
}
