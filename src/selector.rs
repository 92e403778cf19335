//! Destination selection under the two-tier priority policy.
//!
//! High priority orders keep their first-seen order and always go first.
//! Low priority orders are shuffled before they fill the remaining slots so
//! the same ones are not favoured trip after trip.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::model::{PendingOrder, Protocol, Registry, Selection};

/// Choose at most `k` unique destinations from `orders`.
///
/// Orders whose destination is missing from `registry` are skipped and
/// reported in [`Selection::dropped`]. Only the first order seen for a
/// destination counts, including its protocol. This never fails: with
/// `k == 0` or no valid orders the selection is empty.
pub fn select<R>(orders: &[PendingOrder], k: usize, registry: &Registry, rng: &mut R) -> Selection
where
    R: Rng + ?Sized,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut seen_unknown: HashSet<&str> = HashSet::new();
    let mut dropped: Vec<String> = Vec::new();
    let mut high: Vec<&str> = Vec::new();
    let mut low: Vec<&str> = Vec::new();

    for order in orders {
        let id = order.destination_id.as_str();
        if !registry.contains(id) {
            if seen_unknown.insert(id) {
                dropped.push(id.to_string());
            }
            continue;
        }
        if !seen.insert(id) {
            continue;
        }
        match order.protocol {
            Protocol::Protocol1 => high.push(id),
            Protocol::Protocol2 => low.push(id),
        }
    }

    if !dropped.is_empty() {
        debug!(count = dropped.len(), ids = ?dropped, "dropping orders for unknown destinations");
    }

    low.shuffle(rng);

    let mut destinations: Vec<String> = high.iter().take(k).map(|id| id.to_string()).collect();
    let remaining = k - destinations.len();
    destinations.extend(low.iter().take(remaining).map(|id| id.to_string()));

    trace!(
        k,
        high = high.len(),
        low = low.len(),
        selected = ?destinations,
        "selected destinations"
    );

    Selection {
        destinations,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> Registry {
        [("A", (9, 9)), ("B", (9, 7)), ("C", (9, 5)), ("D", (9, 3)), ("E", (9, 1))]
            .into_iter()
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_high_priority_first_then_low_fill() {
        let orders = vec![
            PendingOrder::low("A"),
            PendingOrder::high("B"),
            PendingOrder::high("C"),
        ];
        let selection = select(&orders, 3, &registry(), &mut rng());
        assert_eq!(selection.destinations, vec!["B", "C", "A"]);
        assert!(selection.dropped.is_empty());
    }

    #[test]
    fn test_zero_k_selects_nothing() {
        let orders = vec![PendingOrder::high("A"), PendingOrder::low("B")];
        let selection = select(&orders, 0, &registry(), &mut rng());
        assert!(selection.destinations.is_empty());
    }

    #[test]
    fn test_empty_orders() {
        let selection = select(&[], 3, &registry(), &mut rng());
        assert!(selection.destinations.is_empty());
        assert!(selection.dropped.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_dropped_once() {
        let orders = vec![
            PendingOrder::high("ghost"),
            PendingOrder::low("A"),
            PendingOrder::low("ghost"),
            PendingOrder::high("phantom"),
        ];
        let selection = select(&orders, 3, &registry(), &mut rng());
        assert_eq!(selection.destinations, vec!["A"]);
        assert_eq!(selection.dropped, vec!["ghost", "phantom"]);
    }

    #[test]
    fn test_repeated_unknown_ids_reported_once_in_order() {
        let mut orders: Vec<_> = (0..500).map(|i| PendingOrder::low(format!("ghost_{}", i % 50))).collect();
        orders.push(PendingOrder::high("B"));
        let selection = select(&orders, 3, &registry(), &mut rng());
        assert_eq!(selection.destinations, vec!["B"]);
        assert_eq!(selection.dropped.len(), 50);
        assert_eq!(selection.dropped[0], "ghost_0");
        assert_eq!(selection.dropped[49], "ghost_49");
    }

    #[test]
    fn test_first_occurrence_wins() {
        // A is seen first as low priority, so its later high priority copy is ignored.
        let orders = vec![
            PendingOrder::low("A"),
            PendingOrder::high("B"),
            PendingOrder::high("A"),
        ];
        let selection = select(&orders, 1, &registry(), &mut rng());
        assert_eq!(selection.destinations, vec!["B"]);
    }

    #[test]
    fn test_high_priority_truncated_in_input_order() {
        let orders = vec![
            PendingOrder::high("E"),
            PendingOrder::low("A"),
            PendingOrder::high("C"),
            PendingOrder::high("B"),
        ];
        let selection = select(&orders, 2, &registry(), &mut rng());
        assert_eq!(selection.destinations, vec!["E", "C"]);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let orders: Vec<_> = ["A", "B", "C", "D", "E"].into_iter().map(PendingOrder::low).collect();
        let first = select(&orders, 2, &registry(), &mut StdRng::seed_from_u64(42));
        let second = select(&orders, 2, &registry(), &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_low_fill_varies_across_seeds() {
        let orders: Vec<_> = ["A", "B", "C", "D", "E"].into_iter().map(PendingOrder::low).collect();
        let picks: HashSet<Vec<String>> = (0..64)
            .map(|seed| select(&orders, 1, &registry(), &mut StdRng::seed_from_u64(seed)).destinations)
            .collect();
        assert!(picks.len() > 1, "low priority fill should not always pick the same order");
    }
}
