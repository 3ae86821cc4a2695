//! Round-robin partitioning of streams across workers.

/// Distribute `items` across `worker_count` groups round-robin: item `i`
/// goes to group `i % worker_count`.
///
/// The partition is disjoint and covers every item exactly once. If there
/// are more workers than items, trailing groups come back empty and those
/// workers simply idle.
pub fn partition_round_robin<T>(items: Vec<T>, worker_count: usize) -> Vec<Vec<T>> {
    assert!(worker_count > 0, "worker_count must be > 0");

    let per_worker = items.len().div_ceil(worker_count);
    let mut groups: Vec<Vec<T>> = (0..worker_count)
        .map(|_| Vec::with_capacity(per_worker))
        .collect();

    for (index, item) in items.into_iter().enumerate() {
        groups[index % worker_count].push(item);
    }

    groups
}
