//! Utility function(s).

use super::directed::ArenaIndex;

/// Reorders `data` such that position `i` of the result holds the element previously stored
/// at `order[i]`. `order` must be a permutation of the indices of `data`; surplus entries
/// are dropped.
pub(super) fn permute<T>(data: Vec<T>, order: &[ArenaIndex]) -> Vec<T> {
    let mut slots = data.into_iter().map(Some).collect::<Vec<_>>();
    order
        .iter()
        .filter_map(|index| slots.get_mut(index.0).and_then(Option::take))
        .collect()
}

/// Inverse of the permutation `order`: maps an old position to its new one.
pub(super) fn invert_permutation(order: &[ArenaIndex]) -> Vec<ArenaIndex> {
    let mut inverse = vec![ArenaIndex(0); order.len()];
    for (new, old) in order.iter().enumerate() {
        if let Some(slot) = inverse.get_mut(old.0) {
            *slot = ArenaIndex(new);
        }
    }
    inverse
}
