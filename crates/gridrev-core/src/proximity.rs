//! Proximity ordering: the fan-out order for multi-region operations.
//!
//! Commit, rollback, and diff recomputation visit every registered region,
//! starting from the region the command originated in and spreading
//! breadth-first over a pairwise adjacency test. Registered regions the
//! traversal never reaches (islands on the grid) are appended at the end,
//! so every region is visited exactly once.

use gridrev_types::{RegionId, RegionInfo};

/// Order `regions` by proximity to `origin` under the given pairwise
/// adjacency predicate.
///
/// The result always starts with `origin`, followed by a breadth-first
/// expansion: repeated passes add every registered region adjacent to a
/// region already in the result, until a pass adds nothing. Registered
/// regions never reached are appended afterwards in registry order. No
/// region appears twice.
///
/// If `origin` is not itself a member of `regions`, no adjacency is
/// computed: the result is `origin` followed by every registered region in
/// registry order.
pub fn order_by_proximity<F>(regions: &[RegionInfo], origin: &RegionInfo, adjacent: F) -> Vec<RegionInfo>
where
    F: Fn(&RegionInfo, &RegionInfo) -> bool,
{
    let mut ordered = vec![origin.clone()];

    if !regions.iter().any(|r| r.id == origin.id) {
        ordered.extend(regions.iter().cloned());
        return ordered;
    }

    // Breadth-first expansion: each pass scans the regions already ordered
    // and pulls in their unvisited neighbors.
    let mut cursor = 0;
    while let Some(current) = ordered.get(cursor).cloned() {
        for candidate in regions {
            if adjacent(&current, candidate) && !contains(&ordered, candidate.id) {
                ordered.push(candidate.clone());
            }
        }
        cursor += 1;
    }

    // Unreachable regions still get visited, after everything connected.
    for candidate in regions {
        if !contains(&ordered, candidate.id) {
            ordered.push(candidate.clone());
        }
    }

    ordered
}

fn contains(ordered: &[RegionInfo], id: RegionId) -> bool {
    ordered.iter().any(|r| r.id == id)
}
