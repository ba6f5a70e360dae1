//! Rendering backend seam.
//!
//! The engine never renders anything. It asks a [`Backend`] for a host
//! handle when a host node mounts, tells it what changed on update, and
//! hands the handle back on dismount.
//!
//! [`HeadlessBackend`] issues sequential handles and records what it was
//! asked to do. It drives tests and sessions without a display.

use std::collections::HashSet;

use crate::error::HostError;
use crate::primitives::Node;
use crate::types::{Changes, HostHandle};

/// Binding layer between mounted nodes and their on-screen representation.
pub trait Backend {
    /// Handle of the top-level container the root is bound to.
    fn root(&mut self) -> HostHandle;

    /// Create the host representation for a mounting node.
    fn create(&mut self, node: &Node) -> Result<HostHandle, HostError>;

    /// Apply an in-place update to an existing host node.
    fn patch(&mut self, _handle: &HostHandle, _node: &Node, _changes: Changes) {}

    /// Release a handle whose node was dismounted.
    fn release(&mut self, handle: HostHandle);
}

// =============================================================================
// Headless Backend
// =============================================================================

/// In-memory backend with no display.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next: u64,
    live: HashSet<HostHandle>,
    patches: Vec<(HostHandle, Changes)>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet released, root included.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: &HostHandle) -> bool {
        self.live.contains(handle)
    }

    /// Every patch applied so far, in order.
    pub fn patches(&self) -> &[(HostHandle, Changes)] {
        &self.patches
    }

    pub fn clear_patches(&mut self) {
        self.patches.clear();
    }

    fn issue(&mut self) -> HostHandle {
        self.next += 1;
        let handle = HostHandle::from_raw(self.next);
        self.live.insert(handle.clone());
        handle
    }
}

impl Backend for HeadlessBackend {
    fn root(&mut self) -> HostHandle {
        self.issue()
    }

    fn create(&mut self, _node: &Node) -> Result<HostHandle, HostError> {
        Ok(self.issue())
    }

    fn patch(&mut self, handle: &HostHandle, _node: &Node, changes: Changes) {
        self.patches.push((handle.clone(), changes));
    }

    fn release(&mut self, handle: HostHandle) {
        if !self.live.remove(&handle) {
            tracing::warn!(handle = handle.as_raw(), "released unknown host handle");
        }
    }
}
