//! # Storage Backend Trait
//!
//! The contract between the word-graph layer and any storage engine.
//! Every operation the encoder, weigher and compressor need is defined here.
//!
//! The pipeline runs its three phases strictly in sequence on one thread, so
//! the contract is synchronous. Backends still take `&self` and manage their
//! own interior mutability.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory arena with snapshot rollback |

pub mod memory;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::{Error, Result};

pub use memory::MemoryBackend;

// ============================================================================
// Backend Configuration
// ============================================================================

/// Which storage backend to run the word graph on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory (no persistence)
    #[default]
    Memory,
}

// ============================================================================
// Path search
// ============================================================================

/// Outcome of a bounded path search.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    pub paths: Vec<Path>,
    /// True when at least one more path existed past the cap.
    pub truncated: bool,
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// The universal storage contract.
///
/// Any backend that implements this trait can hold a word graph. Mutating
/// calls must be rejected with `Error::TxError` when issued through a
/// read-only transaction.
pub trait StorageBackend: Send + Sync + 'static {
    /// The transaction type for this backend.
    type Tx: Transaction;

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Shut down the backend, flushing any pending writes.
    fn shutdown(&self) -> Result<()>;

    /// Remove every node and relationship and reset identifier counters.
    fn clear(&self) -> Result<()>;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction.
    fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    /// Commit a transaction.
    fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Roll back a transaction, discarding every write made through it.
    fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Node CRUD
    // ========================================================================

    /// Create a node with the given labels and properties.
    fn create_node(&self, tx: &mut Self::Tx, labels: &[&str], props: PropertyMap) -> Result<NodeId>;

    /// Get a node by ID. Returns None if not found.
    fn get_node(&self, tx: &Self::Tx, id: NodeId) -> Result<Option<Node>>;

    /// Set a property on a node (upsert).
    fn set_node_property(&self, tx: &mut Self::Tx, id: NodeId, key: &str, val: Value) -> Result<()>;

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    /// Create a relationship between two nodes.
    fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId>;

    /// Set a property on a relationship (upsert).
    fn set_relationship_property(
        &self,
        tx: &mut Self::Tx,
        id: RelId,
        key: &str,
        val: Value,
    ) -> Result<()>;

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Get all relationships of a node, optionally filtered by direction and type.
    fn get_relationships(
        &self,
        tx: &Self::Tx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>>;

    /// Enumerate every simple path from `from` to `to` that follows outgoing
    /// relationships of the given types (all types when empty) and whose
    /// length, in relationships, lies within `depth`.
    ///
    /// `limit` caps the number of paths collected. The result is marked
    /// truncated only when a further path turns up once the cap is full.
    ///
    /// Default: depth-first search over `get_relationships`.
    fn all_paths(
        &self,
        tx: &Self::Tx,
        from: NodeId,
        to: NodeId,
        rel_types: &[&str],
        depth: RangeInclusive<usize>,
        limit: Option<usize>,
    ) -> Result<PathSearch> {
        let start = self.get_node(tx, from)?
            .ok_or_else(|| Error::NotFound(format!("Node {from}")))?;
        let (min, max) = depth.into_inner();

        let mut search = PathSearch::default();
        let mut path = Path::single(start);
        let mut walk = Walk { to, rel_types, min, max, limit, search: &mut search };
        walk.descend(self, tx, from, &mut path)?;
        Ok(search)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Total number of nodes.
    fn node_count(&self, tx: &Self::Tx) -> Result<u64>;

    /// Total number of relationships.
    fn relationship_count(&self, tx: &Self::Tx) -> Result<u64>;

    // ========================================================================
    // Scan
    // ========================================================================

    /// Return all nodes (no label filter).
    fn all_nodes(&self, tx: &Self::Tx) -> Result<Vec<Node>>;

    /// Find all nodes with a given label, in creation order.
    fn nodes_by_label(&self, tx: &Self::Tx, label: &str) -> Result<Vec<Node>>;

    /// Find nodes by label + property value, in creation order.
    fn nodes_by_property(
        &self,
        tx: &Self::Tx,
        label: &str,
        key: &str,
        value: &Value,
    ) -> Result<Vec<Node>>;

    /// Find all relationships of a given type.
    ///
    /// Default: scans all nodes and collects outgoing relationships of that type.
    fn relationships_by_type(&self, tx: &Self::Tx, rel_type: &str) -> Result<Vec<Relationship>> {
        let mut result = Vec::new();
        for node in &self.all_nodes(tx)? {
            result.extend(self.get_relationships(tx, node.id, Direction::Outgoing, Some(rel_type))?);
        }
        Ok(result)
    }
}

/// State of one `all_paths` depth-first search.
struct Walk<'a> {
    to: NodeId,
    rel_types: &'a [&'a str],
    min: usize,
    max: usize,
    limit: Option<usize>,
    search: &'a mut PathSearch,
}

impl Walk<'_> {
    fn exhausted(&self) -> bool {
        self.search.truncated
    }

    fn descend<B: StorageBackend + ?Sized>(
        &mut self,
        backend: &B,
        tx: &B::Tx,
        tip: NodeId,
        path: &mut Path,
    ) -> Result<()> {
        if path.len() >= self.max {
            return Ok(());
        }
        for rel in backend.get_relationships(tx, tip, Direction::Outgoing, None)? {
            if self.exhausted() {
                break;
            }
            if !self.rel_types.is_empty() && !self.rel_types.contains(&rel.rel_type.as_str()) {
                continue;
            }
            // Simple paths only
            if path.contains(rel.dst) {
                continue;
            }
            let next = backend.get_node(tx, rel.dst)?.ok_or_else(|| {
                Error::StorageError(format!("relationship {} points at missing node {}", rel.id, rel.dst))
            })?;
            let next_id = next.id;
            path.append(rel, next);

            if next_id == self.to {
                if path.len() >= self.min {
                    if self.limit.is_some_and(|cap| self.search.paths.len() >= cap) {
                        self.search.truncated = true;
                    } else {
                        self.search.paths.push(path.clone());
                    }
                }
            } else {
                self.descend(backend, tx, next_id, path)?;
            }
            path.pop();
        }
        Ok(())
    }
}
