//! Child matching - Pairs old children with their replacements.
//!
//! Keyed children match by key, unkeyed children match by position among
//! the unkeyed ones. A pair only counts as a match when both sides have the
//! same kind; anything unmatched on the new side is mounted fresh and
//! anything unmatched on the old side is dismounted.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::primitives::Node;
use crate::types::Key;

/// For each child in `next`, the index of the old child it continues, if any.
///
/// Every old index appears at most once in the result.
pub(crate) fn match_children(old: &[Node], next: &[Node]) -> Vec<Option<usize>> {
    let mut keyed: HashMap<&Key, usize> = HashMap::new();
    let mut unkeyed: VecDeque<usize> = VecDeque::new();

    for (index, child) in old.iter().enumerate() {
        match child.key() {
            Some(key) => {
                keyed.entry(key).or_insert(index);
            }
            None => unkeyed.push_back(index),
        }
    }

    let mut seen: HashSet<&Key> = HashSet::new();

    next.iter()
        .map(|child| match child.key() {
            Some(key) => {
                if !seen.insert(key) {
                    tracing::warn!(
                        key = %key,
                        "duplicate child key, keys must be unique among siblings"
                    );
                    return None;
                }
                keyed
                    .remove(key)
                    .filter(|&index| old[index].kind() == child.kind())
            }
            None => unkeyed
                .pop_front()
                .filter(|&index| old[index].kind() == child.kind()),
        })
        .collect()
}
