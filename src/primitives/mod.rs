//! Primitives - Node variants and their constructors.
//!
//! - [`text`] - text leaf
//! - [`element`] - host element builder
//! - [`component`] - composite builder
//! - [`body`] - the root element

mod node;

pub use node::*;
