//! Lifecycle - Mount, dismount and update of node subtrees.
//!
//! Owns the identity generator, the element store and the backend, and is
//! the only code that touches them. The engine keeps the root next to it so
//! the root can be reconciled without borrowing the whole engine.
//!
//! # Update in two phases
//!
//! 1. **Prepare** walks the old and new trees together and mounts every
//!    node that has no counterpart. If any mount fails, everything prepared
//!    so far is dismounted again and the live tree was never touched.
//!    Every matched live node is checked against its mounted record here
//!    too, so a stale node fails the update before anything changes.
//! 2. **Apply** moves content onto the matched live nodes, splices the
//!    fresh ones in, dismounts leftovers and patches the backend.
//!
//! Components have no host handle. Their child changes are reported to the
//! nearest host ancestor instead.

use crate::backend::Backend;
use crate::config::EngineConfig;
use crate::error::{MountError, UpdateError};
use crate::primitives::Node;
use crate::types::{Changes, Describe, Descriptor};

use super::children::match_children;
use super::ids::IdGenerator;
use super::store::ElementStore;

/// A planned update for one live node.
enum Patch {
    /// Same logical node: copy content from `next`, then patch children.
    Morph { next: Node, children: Vec<ChildPatch> },
    /// Different node: `next` is already mounted and takes over the slot.
    Replace(Node),
}

/// A planned child slot, in the new order.
enum ChildPatch {
    /// Continues the old child at `index`.
    Matched { index: usize, patch: Patch },
    /// Freshly mounted child.
    Fresh(Node),
}

pub(crate) struct Lifecycle<B> {
    pub(crate) ids: IdGenerator,
    pub(crate) elements: ElementStore,
    pub(crate) backend: B,
    pub(crate) config: EngineConfig,
}

impl<B: Backend> Lifecycle<B> {
    pub(crate) fn new(backend: B, config: EngineConfig) -> Self {
        Self {
            ids: IdGenerator::new(),
            elements: ElementStore::new(),
            backend,
            config,
        }
    }

    // =========================================================================
    // Mount
    // =========================================================================

    /// Bind the root to the top-level container at depth 1 and mount its
    /// children beneath it.
    pub(crate) fn mount_root(&mut self, root: &mut Node) -> Result<(), MountError> {
        let id = self.ids.new_id();
        let host = self.backend.root();
        *root.descriptor_mut() = Descriptor::new(id, 1).with_host(host);

        self.mount_children(1, root)?;
        self.elements.mount(root)
    }

    /// Mount a subtree at `depth`, all or nothing.
    ///
    /// # Panics
    ///
    /// If rolling back a failed mount leaves entries behind in the store.
    pub(crate) fn mount(&mut self, depth: u32, node: &mut Node) -> Result<(), MountError> {
        let before = self.elements.len();
        let result = self.mount_subtree(depth, node);

        if result.is_err() && self.elements.len() != before {
            panic!(
                "rollback of failed mount left the element store inconsistent \
                 ({} entries, expected {})",
                self.elements.len(),
                before
            );
        }
        result
    }

    fn mount_subtree(&mut self, depth: u32, node: &mut Node) -> Result<(), MountError> {
        if depth == 0 {
            return Err(MountError::InvalidDescriptor {
                id: node.descriptor().id,
                depth,
            });
        }
        if depth > self.config.max_depth {
            return Err(MountError::DepthLimit {
                depth,
                max: self.config.max_depth,
            });
        }
        if self.elements.mounted(node) {
            let descriptor = node.descriptor();
            return Err(MountError::AlreadyMounted {
                id: descriptor.id,
                depth: descriptor.depth,
            });
        }

        let id = self.ids.new_id();
        *node.descriptor_mut() = Descriptor::new(id, depth);

        if node.is_host() {
            match self.backend.create(node) {
                Ok(handle) => node.descriptor_mut().host = Some(handle),
                Err(err) => {
                    tracing::warn!(id = %id, depth, error = %err, "host binding failed");
                    self.forget(node);
                    return Err(err.into());
                }
            }
        }

        if let Err(err) = self.mount_children(depth, node) {
            tracing::debug!(id = %id, depth, "rolling back mount after child failure");
            self.forget(node);
            return Err(err);
        }

        if let Err(err) = self.elements.mount(node) {
            self.dismount_children(node);
            self.forget(node);
            return Err(err);
        }

        tracing::trace!(id = %id, depth, kind = ?node.kind(), "mounted");
        Ok(())
    }

    /// Mount every child at `depth + 1`. On failure the children mounted so
    /// far are dismounted again.
    fn mount_children(&mut self, depth: u32, node: &mut Node) -> Result<(), MountError> {
        let Some(children) = node.children_mut() else {
            return Ok(());
        };
        if children.is_empty() {
            return Ok(());
        }
        let child_depth = self.child_depth(depth)?;

        for index in 0..children.len() {
            if let Err(err) = self.mount_subtree(child_depth, &mut children[index]) {
                for mounted in &mut children[..index] {
                    self.dismount(mounted);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn child_depth(&self, depth: u32) -> Result<u32, MountError> {
        depth.checked_add(1).ok_or(MountError::DepthLimit {
            depth,
            max: self.config.max_depth,
        })
    }

    // =========================================================================
    // Dismount
    // =========================================================================

    /// Dismount a subtree, children first.
    ///
    /// No-op if `node` is not mounted, or if its identity is now mounted with
    /// a different descriptor.
    pub(crate) fn dismount(&mut self, node: &mut Node) {
        let descriptor = node.descriptor();
        if self.elements.get(descriptor.id) != Some(descriptor) {
            return;
        }

        self.dismount_children(node);
        self.elements.dismount(node);
        tracing::trace!(id = %node.descriptor().id, "dismounted");
        self.forget(node);
    }

    fn dismount_children(&mut self, node: &mut Node) {
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                self.dismount(child);
            }
        }
    }

    /// Release the host handle, recycle the identity and reset the descriptor.
    fn forget(&mut self, node: &mut Node) {
        let descriptor = std::mem::take(node.descriptor_mut());
        if let Some(handle) = descriptor.host {
            self.backend.release(handle);
        }
        if self.config.recycle_ids {
            self.ids.reuse_id(descriptor.id);
        }
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Reconcile the live `current` subtree against `next`.
    ///
    /// Returns the changes that could not be patched because `current` has
    /// no host handle.
    pub(crate) fn update(
        &mut self,
        current: &mut Node,
        next: Node,
    ) -> Result<Changes, UpdateError> {
        let patch = self.prepare(current, next)?;
        Ok(self.apply(current, patch))
    }

    /// Check that `node` is the one its identity is mounted with.
    fn check_live(&self, node: &Node) -> Result<(), UpdateError> {
        let descriptor = node.descriptor();
        let Some(stored) = self.elements.get(descriptor.id) else {
            return Err(UpdateError::NotMounted {
                id: descriptor.id,
                depth: descriptor.depth,
            });
        };
        if stored.depth != descriptor.depth {
            return Err(UpdateError::DepthMismatch {
                id: descriptor.id,
                current: stored.depth,
                next: descriptor.depth,
            });
        }
        if stored != descriptor {
            return Err(UpdateError::Stale { id: descriptor.id });
        }
        Ok(())
    }

    fn prepare(&mut self, current: &Node, mut next: Node) -> Result<Patch, UpdateError> {
        self.check_live(current)?;

        if !current.is_same(&next) {
            self.mount(current.descriptor().depth, &mut next)?;
            return Ok(Patch::Replace(next));
        }

        let next_children = next.take_children();
        let matches = match_children(current.children(), &next_children);
        let depth = current.descriptor().depth;

        let mut children = Vec::with_capacity(next_children.len());
        for (mut child, matched) in next_children.into_iter().zip(matches) {
            let prepared = match matched {
                Some(index) => self
                    .prepare(&current.children()[index], child)
                    .map(|patch| ChildPatch::Matched { index, patch }),
                None => {
                    let mounted = self
                        .child_depth(depth)
                        .and_then(|depth| self.mount(depth, &mut child));
                    match mounted {
                        Ok(()) => Ok(ChildPatch::Fresh(child)),
                        Err(err) => Err(err.into()),
                    }
                }
            };

            match prepared {
                Ok(patch) => children.push(patch),
                Err(err) => {
                    for patch in children {
                        self.discard_child(patch);
                    }
                    return Err(err);
                }
            }
        }

        Ok(Patch::Morph { next, children })
    }

    /// Undo the mounts a prepared patch performed.
    fn discard(&mut self, patch: Patch) {
        match patch {
            Patch::Morph { children, .. } => {
                for child in children {
                    self.discard_child(child);
                }
            }
            Patch::Replace(mut node) => self.dismount(&mut node),
        }
    }

    fn discard_child(&mut self, patch: ChildPatch) {
        match patch {
            ChildPatch::Matched { patch, .. } => self.discard(patch),
            ChildPatch::Fresh(mut node) => self.dismount(&mut node),
        }
    }

    /// Carry out a prepared patch. Only fails on a broken store invariant,
    /// which panics.
    ///
    /// Returns the changes left for the nearest host ancestor: a component's
    /// child changes, since it has no host handle to patch.
    fn apply(&mut self, current: &mut Node, patch: Patch) -> Changes {
        let (next, children) = match patch {
            Patch::Replace(next) => {
                tracing::debug!(
                    old = %current.descriptor().id,
                    new = %next.descriptor().id,
                    depth = next.descriptor().depth,
                    "replaced node of different kind"
                );
                let mut old = std::mem::replace(current, next);
                self.dismount(&mut old);
                return Changes::empty();
            }
            Patch::Morph { next, children } => (next, children),
        };

        let mut changes = morph(current, next);

        let old_children = current.take_children();
        let old_len = old_children.len();
        let mut old_children: Vec<Option<Node>> = old_children.into_iter().map(Some).collect();
        let mut new_children = Vec::with_capacity(children.len());

        for (position, child) in children.into_iter().enumerate() {
            match child {
                ChildPatch::Matched { index, patch } => {
                    let Some(mut node) = old_children.get_mut(index).and_then(Option::take) else {
                        self.discard(patch);
                        continue;
                    };
                    if index != position {
                        changes |= Changes::CHILDREN;
                    }
                    changes |= self.apply(&mut node, patch);
                    new_children.push(node);
                }
                ChildPatch::Fresh(node) => {
                    changes |= Changes::CHILDREN;
                    new_children.push(node);
                }
            }
        }

        for mut stale in old_children.into_iter().flatten() {
            changes |= Changes::CHILDREN;
            self.dismount(&mut stale);
        }
        if new_children.len() != old_len {
            changes |= Changes::CHILDREN;
        }
        if let Some(slot) = current.children_mut() {
            *slot = new_children;
        }

        // Checked against the store in prepare
        if let Err(err) = self.elements.update(current) {
            panic!("element store rejected a checked update: {err}");
        }
        tracing::trace!(id = %current.descriptor().id, ?changes, "updated");

        match &current.descriptor().host {
            Some(handle) => {
                if !changes.is_empty() {
                    self.backend.patch(handle, current, changes);
                }
                Changes::empty()
            }
            None => changes & Changes::CHILDREN,
        }
    }
}

/// Copy the content of `next` onto the live `current` node of the same kind.
///
/// Descriptor, key and tag stay as they are.
fn morph(current: &mut Node, next: Node) -> Changes {
    let mut changes = Changes::empty();
    match (current, next) {
        (Node::Text(current), Node::Text(next)) => {
            if current.content != next.content {
                current.content = next.content;
                changes |= Changes::TEXT;
            }
        }
        (Node::Element(current), Node::Element(next)) => {
            if current.attributes != next.attributes {
                current.attributes = next.attributes;
                changes |= Changes::ATTRIBUTES;
            }
        }
        (Node::Component(current), Node::Component(next)) => {
            if current.props != next.props {
                current.props = next.props;
                changes |= Changes::ATTRIBUTES;
            }
        }
        _ => {}
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::error::HostError;
    use crate::primitives::{component, element, text};
    use crate::types::{HostHandle, Id};

    /// Headless backend that refuses to bind text nodes with a given content.
    #[derive(Default)]
    struct FailingBackend {
        inner: HeadlessBackend,
        reject: &'static str,
    }

    impl Backend for FailingBackend {
        fn root(&mut self) -> HostHandle {
            self.inner.root()
        }

        fn create(&mut self, node: &Node) -> Result<HostHandle, HostError> {
            if let Node::Text(t) = node {
                if t.content == self.reject {
                    return Err(HostError::new("rejected"));
                }
            }
            self.inner.create(node)
        }

        fn patch(&mut self, handle: &HostHandle, node: &Node, changes: Changes) {
            self.inner.patch(handle, node, changes);
        }

        fn release(&mut self, handle: HostHandle) {
            self.inner.release(handle);
        }
    }

    fn row(key: &'static str) -> Node {
        element("li").key(key).child(text(key)).into()
    }

    fn child_ids(node: &Node) -> Vec<Id> {
        node.children().iter().map(|c| c.descriptor().id).collect()
    }

    fn lifecycle() -> Lifecycle<HeadlessBackend> {
        Lifecycle::new(HeadlessBackend::new(), EngineConfig::default())
    }

    fn failing(reject: &'static str) -> Lifecycle<FailingBackend> {
        Lifecycle::new(
            FailingBackend {
                inner: HeadlessBackend::new(),
                reject,
            },
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_mount_assigns_ids_and_depths() {
        let mut lc = lifecycle();
        let mut tree: Node = element("div")
            .child(text("a"))
            .child(component("Card").child(text("b")))
            .into();

        lc.mount(2, &mut tree).unwrap();

        assert_eq!(tree.descriptor().depth, 2);
        assert_eq!(tree.children()[0].descriptor().depth, 3);
        assert_eq!(tree.children()[1].children()[0].descriptor().depth, 4);
        assert_eq!(lc.elements.len(), 4);
        assert_eq!(tree.descriptor().id, Id::new(1));
    }

    #[test]
    fn test_mount_binds_hosts_except_components() {
        let mut lc = lifecycle();
        let mut tree: Node = component("App").child(text("a")).into();

        lc.mount(1, &mut tree).unwrap();

        assert!(tree.descriptor().host.is_none());
        assert!(tree.children()[0].descriptor().host.is_some());
        assert_eq!(lc.backend.live_count(), 1);
    }

    #[test]
    fn test_mount_rejects_zero_depth() {
        let mut lc = lifecycle();
        let mut node = text("a");

        let err = lc.mount(0, &mut node).unwrap_err();
        assert!(matches!(err, MountError::InvalidDescriptor { depth: 0, .. }));
        assert!(lc.elements.is_empty());
        assert_eq!(lc.ids.issued(), 0);
    }

    #[test]
    fn test_mount_rejects_live_node() {
        let mut lc = lifecycle();
        let mut node = text("a");
        lc.mount(1, &mut node).unwrap();

        let err = lc.mount(1, &mut node).unwrap_err();
        assert_eq!(
            err,
            MountError::AlreadyMounted {
                id: Id::new(1),
                depth: 1
            }
        );
        assert_eq!(lc.elements.len(), 1);
    }

    #[test]
    fn test_mount_depth_limit() {
        let mut lc = Lifecycle::new(
            HeadlessBackend::new(),
            EngineConfig::default().with_max_depth(2),
        );
        let mut tree: Node = element("div")
            .child(element("div").child(text("too deep")))
            .into();

        let err = lc.mount(1, &mut tree).unwrap_err();
        assert_eq!(err, MountError::DepthLimit { depth: 3, max: 2 });
        assert!(lc.elements.is_empty());
        assert_eq!(lc.backend.live_count(), 0);
    }

    #[test]
    fn test_mount_rolls_back_on_host_failure() {
        let mut lc = failing("boom");
        let mut tree: Node = element("ul")
            .child(element("li").child(text("ok")))
            .child(element("li").child(text("boom")))
            .into();

        let err = lc.mount(1, &mut tree).unwrap_err();
        assert!(matches!(err, MountError::Host(_)));

        assert!(lc.elements.is_empty());
        assert_eq!(lc.backend.inner.live_count(), 0);
        assert!(!tree.descriptor().id.is_assigned());
        assert!(!tree.children()[0].descriptor().id.is_assigned());

        // Every identity handed out went back to the pool
        assert_eq!(lc.ids.reusable_len() as u64, lc.ids.issued());
    }

    #[test]
    fn test_dismount_releases_subtree() {
        let mut lc = lifecycle();
        let mut tree: Node = element("div").child(text("a")).child(text("b")).into();
        lc.mount(1, &mut tree).unwrap();
        assert_eq!(lc.backend.live_count(), 3);

        lc.dismount(&mut tree);

        assert!(lc.elements.is_empty());
        assert_eq!(lc.backend.live_count(), 0);
        assert_eq!(lc.ids.reusable_len(), 3);
        assert_eq!(*tree.descriptor(), Descriptor::default());
        assert_eq!(*tree.children()[1].descriptor(), Descriptor::default());
    }

    #[test]
    fn test_dismount_is_idempotent() {
        let mut lc = lifecycle();
        let mut node = text("a");
        lc.mount(1, &mut node).unwrap();

        lc.dismount(&mut node);
        lc.dismount(&mut node);
        assert_eq!(lc.ids.reusable_len(), 1);

        let mut never_mounted = text("b");
        lc.dismount(&mut never_mounted);
        assert_eq!(lc.ids.reusable_len(), 1);
    }

    #[test]
    fn test_dismount_without_recycling() {
        let mut lc = Lifecycle::new(
            HeadlessBackend::new(),
            EngineConfig::default().with_recycle_ids(false),
        );
        let mut node = text("a");
        lc.mount(1, &mut node).unwrap();
        lc.dismount(&mut node);

        assert_eq!(lc.ids.reusable_len(), 0);
        let mut again = text("a");
        lc.mount(1, &mut again).unwrap();
        assert_eq!(again.descriptor().id, Id::new(2));
    }

    #[test]
    fn test_update_not_mounted() {
        let mut lc = lifecycle();
        let mut node = text("a");

        let err = lc.update(&mut node, text("b")).unwrap_err();
        assert_eq!(
            err,
            UpdateError::NotMounted {
                id: Id::UNASSIGNED,
                depth: 0
            }
        );
    }

    #[test]
    fn test_update_same_kind_keeps_identity() {
        let mut lc = lifecycle();
        let mut node = text("before");
        lc.mount(3, &mut node).unwrap();
        let descriptor = node.descriptor().clone();

        lc.update(&mut node, text("after")).unwrap();

        assert_eq!(*node.descriptor(), descriptor);
        assert!(matches!(&node, Node::Text(t) if t.content == "after"));
        assert_eq!(lc.backend.patches(), &[(descriptor.host.unwrap(), Changes::TEXT)]);
    }

    #[test]
    fn test_update_without_changes_does_not_patch() {
        let mut lc = lifecycle();
        let mut node: Node = element("div").attr("id", "x").into();
        lc.mount(1, &mut node).unwrap();

        lc.update(&mut node, element("div").attr("id", "x").into())
            .unwrap();
        assert!(lc.backend.patches().is_empty());
    }

    #[test]
    fn test_update_different_kind_replaces() {
        let mut lc = lifecycle();
        let mut node: Node = element("div").child(text("a")).into();
        lc.mount(2, &mut node).unwrap();
        let old_host = node.descriptor().host.clone().unwrap();

        lc.update(&mut node, element("section").child(text("b")).into())
            .unwrap();

        assert_eq!(node.kind(), crate::primitives::NodeKind::Element("section"));
        assert_eq!(node.descriptor().depth, 2);
        assert!(lc.elements.mounted(&node));
        assert!(!lc.backend.is_live(&old_host));
        assert_eq!(lc.elements.len(), 2);
        assert_eq!(lc.backend.live_count(), 2);
    }

    #[test]
    fn test_update_keyed_reorder_keeps_child_ids() {
        let mut lc = lifecycle();
        let mut list: Node = element("ul")
            .children(vec![row("a"), row("b"), row("c")])
            .into();
        lc.mount(1, &mut list).unwrap();
        let ids = child_ids(&list);

        let next = element("ul").children(vec![row("c"), row("a"), row("b")]);
        lc.update(&mut list, next.into()).unwrap();

        let reordered = child_ids(&list);
        assert_eq!(reordered, vec![ids[2], ids[0], ids[1]]);
        assert_eq!(lc.elements.len(), 7);

        let list_host = list.descriptor().host.clone().unwrap();
        assert!(lc.backend.patches().contains(&(list_host, Changes::CHILDREN)));
    }

    #[test]
    fn test_update_inserts_and_removes_children() {
        let mut lc = lifecycle();
        let mut list: Node = element("ul")
            .children(vec![
                element("li").key("a").into(),
                element("li").key("b").into(),
            ])
            .into();
        lc.mount(1, &mut list).unwrap();
        let a = list.children()[0].descriptor().id;

        lc.update(
            &mut list,
            element("ul")
                .children(vec![
                    element("li").key("a").into(),
                    element("li").key("z").into(),
                ])
                .into(),
        )
        .unwrap();

        assert_eq!(list.children().len(), 2);
        assert_eq!(list.children()[0].descriptor().id, a);
        assert_eq!(list.children()[1].key().map(|k| k.as_str()), Some("z"));
        assert!(lc.elements.mounted(&list.children()[1]));
        assert_eq!(lc.elements.len(), 3);
        assert_eq!(lc.backend.live_count(), 3);
    }

    #[test]
    fn test_update_is_atomic_on_mount_failure() {
        let mut lc = failing("boom");
        let mut list: Node = element("ul").child(text("one")).into();
        lc.mount(1, &mut list).unwrap();
        let snapshot = list.clone();
        let live = lc.backend.inner.live_count();

        let err = lc
            .update(
                &mut list,
                element("ul")
                    .attr("class", "changed")
                    .child(text("one"))
                    .child(element("li").child(text("fine")))
                    .child(text("boom"))
                    .into(),
            )
            .unwrap_err();

        assert!(matches!(err, UpdateError::Mount(MountError::Host(_))));
        assert_eq!(list, snapshot);
        assert_eq!(lc.elements.len(), 2);
        assert_eq!(lc.backend.inner.live_count(), live);
        assert!(lc.backend.inner.patches().is_empty());
    }

    #[test]
    fn test_component_props_update() {
        let mut lc = lifecycle();
        let card = |title: &'static str| {
            component("Card").prop("title", title).child(text("body"))
        };
        let mut node: Node = card("a").into();
        lc.mount(1, &mut node).unwrap();
        let id = node.descriptor().id;

        let unreported = lc.update(&mut node, card("b").into()).unwrap();
        assert!(unreported.is_empty());

        assert_eq!(node.descriptor().id, id);
        let Node::Component(c) = &node else {
            panic!("expected component");
        };
        assert_eq!(c.props.get("title").map(String::as_str), Some("b"));
        // Components have no host, so nothing is patched
        assert!(lc.backend.patches().is_empty());
    }

    #[test]
    fn test_component_child_changes_patch_host_ancestor() {
        let mut lc = lifecycle();
        let mut list: Node = element("ul")
            .child(component("Rows").children(vec![row("a"), row("b"), row("c")]))
            .into();
        lc.mount(1, &mut list).unwrap();
        let rows = child_ids(&list.children()[0]);

        let next = element("ul")
            .child(component("Rows").children(vec![row("c"), row("b")]));
        let unreported = lc.update(&mut list, next.into()).unwrap();

        assert!(unreported.is_empty());
        assert_eq!(child_ids(&list.children()[0]), vec![rows[2], rows[1]]);
        let list_host = list.descriptor().host.clone().unwrap();
        assert_eq!(lc.backend.patches(), &[(list_host, Changes::CHILDREN)]);
    }

    #[test]
    fn test_nested_components_report_to_host() {
        let mut lc = lifecycle();
        let tree = |rows: Vec<Node>| -> Node {
            element("main")
                .child(component("Page").child(component("Rows").children(rows)))
                .into()
        };
        let mut main = tree(vec![row("a")]);
        lc.mount(1, &mut main).unwrap();

        lc.update(&mut main, tree(vec![row("a"), row("b")])).unwrap();

        let main_host = main.descriptor().host.clone().unwrap();
        assert_eq!(lc.backend.patches(), &[(main_host, Changes::CHILDREN)]);
        assert_eq!(lc.elements.len(), 7);
    }

    #[test]
    fn test_detached_component_returns_child_changes() {
        let mut lc = lifecycle();
        let mut rows: Node = component("Rows").child(row("a")).into();
        lc.mount(2, &mut rows).unwrap();

        let next = component("Rows").children(vec![row("b"), row("a")]);
        let unreported = lc.update(&mut rows, next.into()).unwrap();

        assert_eq!(unreported, Changes::CHILDREN);
        assert!(lc.backend.patches().is_empty());
    }

    #[test]
    fn test_update_checks_every_matched_node_first() {
        let mut lc = lifecycle();
        let mut list: Node = element("ul").child(text("one")).into();
        lc.mount(1, &mut list).unwrap();

        // Dismounting a copy takes the live child's entry out of the store
        let mut copy = list.children()[0].clone();
        lc.dismount(&mut copy);
        let snapshot = list.clone();

        let next = element("ul").attr("class", "changed").child(text("two"));
        let err = lc.update(&mut list, next.into()).unwrap_err();

        assert_eq!(
            err,
            UpdateError::NotMounted {
                id: snapshot.children()[0].descriptor().id,
                depth: 2
            }
        );
        assert_eq!(list, snapshot);
        assert!(lc.backend.patches().is_empty());
    }

    #[test]
    fn test_update_rejects_stale_descriptor() {
        let mut lc = lifecycle();
        let mut node = text("a");
        lc.mount(1, &mut node).unwrap();

        let mut stale = node.clone();
        stale.descriptor_mut().host = Some(HostHandle::from_raw(999));

        let err = lc.update(&mut stale, text("b")).unwrap_err();
        assert_eq!(err, UpdateError::Stale { id: node.descriptor().id });
        assert!(matches!(&stale, Node::Text(t) if t.content == "a"));
    }

    #[test]
    fn test_dismount_skips_reassigned_identity() {
        let mut lc = lifecycle();
        let mut first = text("first");
        lc.mount(1, &mut first).unwrap();
        let mut copy = first.clone();
        lc.dismount(&mut copy);

        let mut second = text("second");
        lc.mount(1, &mut second).unwrap();
        assert_eq!(second.descriptor().id, first.descriptor().id);

        // `first` still carries the recycled identity but not the new host
        lc.dismount(&mut first);
        assert!(lc.elements.mounted(&second));
        assert!(lc.backend.is_live(second.descriptor().host.as_ref().unwrap()));
    }

    #[test]
    fn test_mount_at_max_representable_depth() {
        let mut lc = Lifecycle::new(
            HeadlessBackend::new(),
            EngineConfig::default().with_max_depth(u32::MAX),
        );

        let mut leaf: Node = element("div").into();
        lc.mount(u32::MAX, &mut leaf).unwrap();
        assert_eq!(leaf.descriptor().depth, u32::MAX);

        let mut parent: Node = element("div").child(text("below")).into();
        let err = lc.mount(u32::MAX, &mut parent).unwrap_err();
        assert_eq!(
            err,
            MountError::DepthLimit {
                depth: u32::MAX,
                max: u32::MAX
            }
        );
        assert_eq!(lc.elements.len(), 1);
        assert!(!parent.descriptor().id.is_assigned());
    }

    #[test]
    fn test_update_adds_child_at_max_representable_depth() {
        let mut lc = Lifecycle::new(
            HeadlessBackend::new(),
            EngineConfig::default().with_max_depth(u32::MAX),
        );
        let mut leaf: Node = element("div").into();
        lc.mount(u32::MAX, &mut leaf).unwrap();

        let next = element("div").child(text("below"));
        let err = lc.update(&mut leaf, next.into()).unwrap_err();

        assert!(matches!(err, UpdateError::Mount(MountError::DepthLimit { .. })));
        assert!(leaf.children().is_empty());
        assert_eq!(lc.elements.len(), 1);
    }
}
