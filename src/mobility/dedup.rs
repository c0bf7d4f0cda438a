//! Keep-last deduplication with an explicit sort key.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use ahash::AHashMap;

/// Stable-sorts `rows` ascending by `sort_key`, then keeps the last row
/// seen for each `group_key`.
///
/// Because the sort is stable, rows with equal sort keys keep their arrival
/// order, so the survivor of a group is its latest-sorting, latest-arriving
/// row. Survivors come back in first-appearance order of their groups.
/// Also returns the number of rows dropped.
pub fn keep_last<R, G, S>(
    mut rows: Vec<R>,
    group_key: impl Fn(&R) -> G,
    sort_key: impl Fn(&R) -> S,
) -> (Vec<R>, usize)
where
    G: Eq + Hash,
    S: Ord,
{
    let total = rows.len();
    rows.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    let mut slots: AHashMap<G, usize> = AHashMap::with_capacity(total);
    let mut survivors: Vec<Option<R>> = Vec::with_capacity(total);
    for row in rows {
        match slots.entry(group_key(&row)) {
            Entry::Occupied(entry) => survivors[*entry.get()] = Some(row),
            Entry::Vacant(entry) => {
                entry.insert(survivors.len());
                survivors.push(Some(row));
            }
        }
    }

    let kept: Vec<R> = survivors.into_iter().flatten().collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
