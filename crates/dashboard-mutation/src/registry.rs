use std::collections::HashMap;

use dashboard_domain::ComplaintId;

use crate::state::MutationPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowMutationSnapshot {
    pub phase: MutationPhase,
    pub latest_generation: u64,
    pub in_flight: usize,
    pub last_settled: Option<MutationPhase>,
}

/// Per-row bookkeeping of issued status requests.
///
/// Generations come from one monotonically increasing counter, so the
/// latest generation recorded for a row identifies the last request issued
/// for it.
#[derive(Debug, Default)]
pub struct MutationRegistry {
    rows: HashMap<ComplaintId, RowMutationSnapshot>,
    next_generation: u64,
}

impl MutationRegistry {
    pub fn begin(&mut self, row_id: &ComplaintId) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        let snapshot = self.rows.entry(row_id.clone()).or_default();
        snapshot.latest_generation = generation;
        snapshot.in_flight += 1;
        snapshot.phase = MutationPhase::Submitting;
        generation
    }

    pub fn is_current(&self, row_id: &ComplaintId, generation: u64) -> bool {
        self.rows
            .get(row_id)
            .is_some_and(|snapshot| snapshot.latest_generation == generation)
    }

    /// Records the outcome of `generation`. Returns `false` when a newer
    /// request for the row has been issued since, in which case nothing is
    /// recorded.
    pub fn settle(&mut self, row_id: &ComplaintId, generation: u64, outcome: MutationPhase) -> bool {
        let Some(snapshot) = self.rows.get_mut(row_id) else {
            return false;
        };
        if snapshot.latest_generation != generation {
            return false;
        }
        snapshot.phase = outcome;
        snapshot.last_settled = Some(outcome);
        true
    }

    /// Ends one request for the row; the row is idle once none remain.
    pub fn release(&mut self, row_id: &ComplaintId) {
        let Some(snapshot) = self.rows.get_mut(row_id) else {
            return;
        };
        snapshot.in_flight = snapshot.in_flight.saturating_sub(1);
        if snapshot.in_flight == 0 {
            snapshot.phase = MutationPhase::Idle;
        }
    }

    pub fn snapshot(&self, row_id: &ComplaintId) -> Option<&RowMutationSnapshot> {
        self.rows.get(row_id)
    }

    pub fn in_flight_total(&self) -> usize {
        self.rows.values().map(|snapshot| snapshot.in_flight).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use dashboard_domain::ComplaintId;

    use super::MutationRegistry;
    use crate::state::MutationPhase;

    #[test]
    fn latest_generation_wins_per_row() {
        let mut registry = MutationRegistry::default();
        let row = ComplaintId::new("7");

        let first = registry.begin(&row);
        let second = registry.begin(&row);

        assert!(!registry.is_current(&row, first));
        assert!(registry.is_current(&row, second));
        assert!(!registry.settle(&row, first, MutationPhase::Succeeded));
        assert_eq!(
            registry.snapshot(&row).map(|s| s.phase),
            Some(MutationPhase::Submitting)
        );
        assert!(registry.settle(&row, second, MutationPhase::Failed));
        assert_eq!(
            registry.snapshot(&row).and_then(|s| s.last_settled),
            Some(MutationPhase::Failed)
        );
    }

    #[test]
    fn rows_do_not_share_generations() {
        let mut registry = MutationRegistry::default();
        let left = ComplaintId::new("1");
        let right = ComplaintId::new("2");

        let left_generation = registry.begin(&left);
        let right_generation = registry.begin(&right);

        assert!(registry.is_current(&left, left_generation));
        assert!(registry.is_current(&right, right_generation));
        assert!(!registry.is_current(&left, right_generation));
    }

    #[test]
    fn release_returns_row_to_idle_when_nothing_is_in_flight() {
        let mut registry = MutationRegistry::default();
        let row = ComplaintId::new("3");

        let first = registry.begin(&row);
        let second = registry.begin(&row);
        assert_eq!(registry.in_flight_total(), 2);

        registry.settle(&row, first, MutationPhase::Succeeded);
        registry.release(&row);
        assert_eq!(
            registry.snapshot(&row).map(|s| s.phase),
            Some(MutationPhase::Submitting)
        );

        registry.settle(&row, second, MutationPhase::Succeeded);
        registry.release(&row);
        assert_eq!(
            registry.snapshot(&row).map(|s| s.phase),
            Some(MutationPhase::Idle)
        );
        assert_eq!(registry.in_flight_total(), 0);
    }

    #[test]
    fn unknown_rows_are_never_current() {
        let mut registry = MutationRegistry::default();
        let row = ComplaintId::new("missing");

        assert!(!registry.is_current(&row, 1));
        assert!(!registry.settle(&row, 1, MutationPhase::Succeeded));
        registry.release(&row);
        assert!(registry.is_empty());
    }
}
