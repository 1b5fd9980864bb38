//! # Property Graph Model
//!
//! Plain DTOs for the word graph's storage layer. These types cross every
//! boundary: storage ↔ word-graph layer ↔ encoder/weigher/compressor.
//!
//! This module is pure data with no I/O and no state.

pub mod node;
pub mod relationship;
pub mod path;
pub mod value;
pub mod property_map;

pub use node::{Labels, Node, NodeId};
pub use relationship::{Direction, RelId, Relationship};
pub use path::Path;
pub use value::Value;
pub use property_map::{props, PropertyAccess, PropertyMap};
