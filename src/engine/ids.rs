//! Identity Generator - Issues and recycles node identities.
//!
//! - Monotonic counter for fresh identities (first one is 1)
//! - Free pool of released identities, drained before the counter grows
//!
//! Recycling keeps the identity space bounded when lists are mounted and
//! dismounted over and over in a long session.

use std::collections::HashSet;

use crate::types::Id;

/// Issues unique, recyclable identities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    /// Last identity handed out by the counter.
    next: u64,
    /// Released identities available for reuse.
    reusable: HashSet<Id>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a reusable identity if there is one, otherwise a fresh one.
    ///
    /// Which reusable identity comes back is unspecified. Never returns
    /// [`Id::UNASSIGNED`].
    pub fn new_id(&mut self) -> Id {
        if let Some(&id) = self.reusable.iter().next() {
            self.reusable.remove(&id);
            return id;
        }

        self.next += 1;
        Id::new(self.next)
    }

    /// Mark an identity as reusable by future [`new_id`](Self::new_id) calls.
    ///
    /// No-op for [`Id::UNASSIGNED`]. The caller must not reuse an identity
    /// that a live node still holds.
    pub fn reuse_id(&mut self, id: Id) {
        if !id.is_assigned() {
            return;
        }
        self.reusable.insert(id);
    }

    /// Number of identities waiting in the free pool.
    pub fn reusable_len(&self) -> usize {
        self.reusable.len()
    }

    /// Highest identity the counter has handed out.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
