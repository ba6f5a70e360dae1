//! # spark-reconciler
//!
//! Identity and lifecycle core for UI tree reconciliation.
//!
//! Every live node gets a stable numeric identity. The engine enforces the
//! mount, update and dismount rules around it, and recycles identities so
//! long sessions with heavy list churn keep a bounded identity space.
//!
//! ## Architecture
//!
//! ```text
//! Page + contents → Engine::load → Lifecycle (prepare → apply)
//!                                     ├─ IdGenerator   (identities)
//!                                     ├─ ElementStore  (bookkeeping)
//!                                     └─ Backend       (host handles)
//! ```
//!
//! The tree owns its nodes. The store only records descriptors by identity,
//! and the backend only sees opaque [`HostHandle`]s.
//!
//! ## Modules
//!
//! - [`types`] - Identities, descriptors, keys, change flags
//! - [`primitives`] - Node variants (text, element, component)
//! - [`engine`] - Identity generator, element store, reconciliation engine
//! - [`backend`] - Rendering backend seam and the headless backend
//! - [`error`] - Mount, update and load errors
//!
//! ## Example
//!
//! ```ignore
//! use spark_reconciler::{body, element, text, Engine, HeadlessBackend, Page};
//!
//! let mut engine = Engine::new(body(), HeadlessBackend::new());
//! engine.load(Page::new("/"), element("main").child(text("hello")))?;
//! engine.load(Page::new("/about"), element("main").child(text("about")))?;
//! ```

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod page;
pub mod primitives;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use backend::{Backend, HeadlessBackend};
pub use config::EngineConfig;
pub use engine::{ElementStore, Engine, IdGenerator};
pub use error::{DismountError, HostError, LoadError, MountError, UpdateError};
pub use page::Page;
pub use primitives::{
    body, component, element, text, Attributes, Component, Element, Node, NodeKind, Text,
};
