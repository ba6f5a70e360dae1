//! Core types for spark-reconciler.
//!
//! These are the values every other module passes around: identities,
//! descriptors, host handles, child keys and change flags.

use std::borrow::Cow;
use std::fmt;

// =============================================================================
// Identity
// =============================================================================

/// Stable numeric identity of a mounted node.
///
/// Zero is reserved for "unassigned" and is never handed out by the
/// identity generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(u64);

impl Id {
    /// The unassigned identity.
    pub const UNASSIGNED: Self = Self(0);

    /// Wrap a raw identity value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// True unless this is [`Id::UNASSIGNED`].
    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Id {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Host Handle
// =============================================================================

/// Opaque reference to a node's representation in the rendering backend.
///
/// The core only forwards it between the backend calls and checks whether
/// it is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostHandle(u64);

impl HostHandle {
    /// Build a handle from a backend-defined token.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-defined token.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// Lifecycle attributes attached to every node.
///
/// A freshly built node carries the default descriptor (unassigned id,
/// depth 0, no host). The engine fills it in on mount and resets it on
/// dismount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    pub id: Id,
    /// Distance from the root, which sits at depth 1.
    pub depth: u32,
    pub host: Option<HostHandle>,
}

impl Descriptor {
    pub fn new(id: Id, depth: u32) -> Self {
        Self {
            id,
            depth,
            host: None,
        }
    }

    /// Attach a host handle.
    pub fn with_host(mut self, host: HostHandle) -> Self {
        self.host = Some(host);
        self
    }
}

/// Anything that carries a [`Descriptor`].
///
/// The element store only ever looks at nodes through this trait.
pub trait Describe {
    fn descriptor(&self) -> &Descriptor;
}

impl Describe for Descriptor {
    fn descriptor(&self) -> &Descriptor {
        self
    }
}

// =============================================================================
// Key
// =============================================================================

/// Explicit child key used to match children across reconciliation passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(Cow<'static, str>);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Change Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// What an update changed on a host node.
    ///
    /// Handed to the backend so it only repaints what moved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Changes: u8 {
        const TEXT = 1 << 0;
        const ATTRIBUTES = 1 << 1;
        const CHILDREN = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_unassigned() {
        assert!(!Id::UNASSIGNED.is_assigned());
        assert!(Id::new(1).is_assigned());
        assert_eq!(Id::default(), Id::UNASSIGNED);
        assert_eq!(Id::from(7u64).get(), 7);
        assert_eq!(Id::new(42).to_string(), "#42");
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = Descriptor::default();
        assert_eq!(descriptor.id, Id::UNASSIGNED);
        assert_eq!(descriptor.depth, 0);
        assert!(descriptor.host.is_none());

        let hosted = Descriptor::new(Id::new(3), 2)
            .with_host(HostHandle::from_raw(9));
        assert_eq!(hosted.host.map(|h| h.as_raw()), Some(9));
    }

    #[test]
    fn test_key_conversions() {
        assert_eq!(Key::from("row"), Key::from(String::from("row")));
        assert_eq!(Key::from(12u64).as_str(), "12");
    }

    #[test]
    fn test_changes_combine() {
        let changes = Changes::TEXT | Changes::CHILDREN;
        assert!(changes.contains(Changes::TEXT));
        assert!(!changes.contains(Changes::ATTRIBUTES));
        assert!(Changes::default().is_empty());
    }
}
