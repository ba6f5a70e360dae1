//! Reconciliation Engine - Root ownership and the public lifecycle API.

use spark_signals::Signal;

use crate::backend::Backend;
use crate::config::EngineConfig;
use crate::error::{DismountError, LoadError, MountError, UpdateError};
use crate::page::Page;
use crate::primitives::{Element, Node};
use crate::types::{Describe, Id};

use super::children::match_children;
use super::ids::IdGenerator;
use super::lifecycle::Lifecycle;
use super::store::ElementStore;

/// Owns one UI tree: its root, identities, element store and backend.
///
/// Engines share no state, so independent trees use independent engines.
pub struct Engine<B> {
    lifecycle: Lifecycle<B>,
    root: Node,
    page: Option<Page>,
}

impl<B: Backend> Engine<B> {
    /// Create an engine and mount `root` as its top-level node.
    ///
    /// # Panics
    ///
    /// If the root cannot be mounted. No UI can exist without it.
    pub fn new(root: Element, backend: B) -> Self {
        Self::with_config(root, backend, EngineConfig::default())
    }

    /// Like [`Engine::new`] with explicit configuration.
    pub fn with_config(root: Element, backend: B, config: EngineConfig) -> Self {
        let mut lifecycle = Lifecycle::new(backend, config);
        let mut root = Node::from(root);

        if let Err(err) = lifecycle.mount_root(&mut root) {
            panic!("mounting root element failed: {err}");
        }
        tracing::debug!(id = %root.descriptor().id, kind = ?root.kind(), "root mounted");

        Self {
            lifecycle,
            root,
            page: None,
        }
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Reconcile the root's content against `contents` for `page`.
    ///
    /// Content of the same kind and key is updated in place. Anything else
    /// is mounted fresh and replaces the old content. On error the tree and
    /// the current page are left as they were.
    pub fn load(&mut self, page: Page, contents: impl Into<Node>) -> Result<(), LoadError> {
        let Some(url) = page.url() else {
            tracing::warn!("load rejected: page has no url");
            return Err(LoadError::MissingPageUrl);
        };
        let contents = contents.into();

        let current = self.root.children();
        match match_children(current, std::slice::from_ref(&contents))[0] {
            Some(index) => tracing::debug!(
                url,
                id = %current[index].descriptor().id,
                "updating page content in place"
            ),
            None if !current.is_empty() => tracing::debug!(
                url,
                new = ?contents.kind(),
                "replacing page content"
            ),
            None => tracing::debug!(url, kind = ?contents.kind(), "mounting page content"),
        }

        let mut next_root = self.root.shell();
        if let Some(children) = next_root.children_mut() {
            children.push(contents);
        }
        self.lifecycle.update(&mut self.root, next_root)?;

        self.page = Some(page);
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mount a detached subtree at `depth`, assigning fresh identities.
    ///
    /// All or nothing: if anything in the subtree fails to mount, nothing
    /// stays mounted.
    pub fn mount(&mut self, depth: u32, node: &mut Node) -> Result<(), MountError> {
        self.lifecycle.mount(depth, node)
    }

    /// Dismount a subtree, releasing host handles and recycling identities.
    ///
    /// Nodes of the root tree are only changed through [`Engine::load`], so
    /// a copy of one is refused.
    pub fn dismount(&mut self, node: &mut Node) -> Result<(), DismountError> {
        if let Some(id) = self.owned_by_root(node) {
            tracing::warn!(id = %id, "refusing to dismount a node of the root tree");
            return Err(DismountError::OwnedByRoot { id });
        }
        self.lifecycle.dismount(node);
        Ok(())
    }

    /// Reconcile the mounted `current` subtree against `next`.
    ///
    /// Like [`Engine::dismount`], refuses copies of root tree nodes.
    pub fn update(&mut self, current: &mut Node, next: impl Into<Node>) -> Result<(), UpdateError> {
        if let Some(id) = self.owned_by_root(current) {
            tracing::warn!(id = %id, "refusing to update a node of the root tree");
            return Err(UpdateError::OwnedByRoot { id });
        }
        self.lifecycle.update(current, next.into())?;
        Ok(())
    }

    fn owned_by_root(&self, node: &Node) -> Option<Id> {
        let id = node.descriptor().id;
        (id.is_assigned() && self.root.find(id).is_some()).then_some(id)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The last successfully loaded page.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn is_mounted(&self, node: &impl Describe) -> bool {
        self.lifecycle.elements.mounted(node)
    }

    pub fn elements(&self) -> &ElementStore {
        &self.lifecycle.elements
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.lifecycle.ids
    }

    pub fn config(&self) -> &EngineConfig {
        &self.lifecycle.config
    }

    pub fn backend(&self) -> &B {
        &self.lifecycle.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.lifecycle.backend
    }

    /// Reactive count of mounted nodes, root included.
    pub fn mounted_count_signal(&self) -> Signal<usize> {
        self.lifecycle.elements.count_signal()
    }
}
