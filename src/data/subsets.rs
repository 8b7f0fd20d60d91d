use std::collections::HashMap;

use super::mask::SetMask;
use super::model::Subset;

/// Most sets that can be enumerated together (2^24 - 1 combinations).
pub const MAX_ACTIVE_SETS: usize = 24;

// ---------------------------------------------------------------------------
// Subset enumeration
// ---------------------------------------------------------------------------

/// Enumerate every non-empty combination of the `active` set identifiers.
///
/// Combination `k` (1 ..= 2^n - 1) is a bitfield over *positions* in
/// `active`: position `i` contributes `active[i]` to the combination mask.
/// A row belongs to the combination whose mask equals the row mask
/// restricted to the active sets; rows with no active membership belong
/// to none. Empty combinations are still emitted.
///
/// Rows are grouped by restricted mask first, so the cost is
/// O(rows + 2^n) rather than O(rows · 2^n). The 2^n term remains the
/// dominant cost.
///
/// # Panics
///
/// Panics if more than [`MAX_ACTIVE_SETS`] sets are active.
pub fn enumerate_subsets(active: &[SetMask], row_masks: &[SetMask]) -> Vec<Subset> {
    let n = active.len();
    assert!(
        n <= MAX_ACTIVE_SETS,
        "{n} active sets exceed the enumeration limit of {MAX_ACTIVE_SETS}"
    );
    if n == 0 {
        return Vec::new();
    }

    let scope: SetMask = active.iter().copied().collect();
    let mut groups: HashMap<SetMask, Vec<usize>> = HashMap::new();
    for (row, mask) in row_masks.iter().enumerate() {
        let restricted = mask.restrict(scope);
        if !restricted.is_empty() {
            groups.entry(restricted).or_default().push(row);
        }
    }

    let last = (1u64 << n) - 1;
    let mut subsets = Vec::with_capacity(last as usize);
    for k in 1..=last {
        let combination: SetMask = active
            .iter()
            .enumerate()
            .filter(|(position, _)| k & (1u64 << position) != 0)
            .map(|(_, id)| *id)
            .collect();
        let items = groups.remove(&combination).unwrap_or_default();
        subsets.push(Subset::new(combination, items));
    }

    log::debug!(
        "Enumerated {} combinations of {} active sets over {} rows",
        subsets.len(),
        n,
        row_masks.len()
    );
    subsets
}
