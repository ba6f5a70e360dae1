//! Engine - Identity, bookkeeping and reconciliation.
//!
//! The engine manages three layers, leaves first:
//! - IdGenerator: unique identities with a free pool for reuse
//! - ElementStore: identity → descriptor map enforcing the lifecycle rules
//! - Engine: owns the root and drives mount, update, dismount and load
//!
//! # Control Flow
//!
//! ```text
//! Engine::load / update
//!     → match children (key, then position)
//!     → mount fresh nodes      (IdGenerator::new_id, Backend::create, ElementStore::mount)
//!     → update matched nodes   (ElementStore::update, Backend::patch)
//!     → dismount leftovers     (ElementStore::dismount, Backend::release, IdGenerator::reuse_id)
//! ```
//!
//! The store never allocates identities, and nothing outside the engine
//! writes to the store or the generator.

mod children;
mod ids;
mod lifecycle;
mod reconciler;
mod store;

pub use ids::IdGenerator;
pub use reconciler::Engine;
pub use store::ElementStore;
