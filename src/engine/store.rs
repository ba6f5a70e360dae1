//! Element Store - Authoritative record of mounted nodes.
//!
//! Maps each live identity to the descriptor it was mounted or last updated
//! with. The store never owns nodes and never allocates identities: the tree
//! owns the nodes and the engine hands out identities.
//!
//! The mounted count is published as a reactive signal so deriveds that
//! depend on tree size re-run when nodes come and go.

use std::collections::HashMap;
use std::fmt;

use spark_signals::{signal, Signal};

use crate::error::{MountError, UpdateError};
use crate::types::{Describe, Descriptor, Id};

/// Identity to descriptor map enforcing mount/update/dismount invariants.
pub struct ElementStore {
    elements: HashMap<Id, Descriptor>,
    count: Signal<usize>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            count: signal(0),
        }
    }

    /// Register a node.
    ///
    /// Fails if its identity or depth is unset, or if its identity is
    /// already mounted. Nothing else about the descriptor is checked here.
    pub fn mount(&mut self, node: &impl Describe) -> Result<(), MountError> {
        let descriptor = node.descriptor();
        if !descriptor.id.is_assigned() || descriptor.depth == 0 {
            return Err(MountError::InvalidDescriptor {
                id: descriptor.id,
                depth: descriptor.depth,
            });
        }
        if self.elements.contains_key(&descriptor.id) {
            return Err(MountError::AlreadyMounted {
                id: descriptor.id,
                depth: descriptor.depth,
            });
        }

        self.elements.insert(descriptor.id, descriptor.clone());
        self.publish_count();
        Ok(())
    }

    /// Whether the node's identity is currently mounted.
    pub fn mounted(&self, node: &impl Describe) -> bool {
        self.elements.contains_key(&node.descriptor().id)
    }

    /// Remove the node's entry. No-op if it was never mounted.
    pub fn dismount(&mut self, node: &impl Describe) {
        if self.elements.remove(&node.descriptor().id).is_some() {
            self.publish_count();
        }
    }

    /// Replace the stored descriptor for an already mounted identity.
    ///
    /// The depth must match the stored one: moving a node to another depth
    /// is a dismount followed by a mount, not an update.
    pub fn update(&mut self, node: &impl Describe) -> Result<(), UpdateError> {
        let descriptor = node.descriptor();
        let Some(current) = self.elements.get_mut(&descriptor.id) else {
            return Err(UpdateError::NotMounted {
                id: descriptor.id,
                depth: descriptor.depth,
            });
        };
        if current.depth != descriptor.depth {
            return Err(UpdateError::DepthMismatch {
                id: descriptor.id,
                current: current.depth,
                next: descriptor.depth,
            });
        }

        *current = descriptor.clone();
        Ok(())
    }

    /// Stored descriptor for an identity.
    pub fn get(&self, id: Id) -> Option<&Descriptor> {
        self.elements.get(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All mounted identities, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.elements.keys().copied()
    }

    /// Reactive mounted count.
    ///
    /// Reading it inside a derived or effect creates a dependency.
    pub fn count_signal(&self) -> Signal<usize> {
        self.count.clone()
    }

    fn publish_count(&self) {
        self.count.set(self.elements.len());
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStore")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}
