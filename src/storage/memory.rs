//! In-memory storage backend.
//!
//! This is the reference implementation of `StorageBackend`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Transactions
//!
//! Writes are applied immediately. A `ReadWrite` transaction takes a
//! snapshot of the whole graph when it begins; `rollback_tx()` restores that
//! snapshot, `commit_tx()` discards it. Word graphs hold a handful of
//! sentences, so copying them is cheap.
//!
//! ## Limitations
//!
//! - **Single-writer only**: two overlapping `ReadWrite` transactions would
//!   restore each other's snapshots. The summarizer never overlaps phases.
//! - **No property indexes**: property lookups scan the label index.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::*;
use crate::tx::{Transaction, TxId, TxMode};
use crate::{Error, Result};
use super::StorageBackend;

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory property graph storage.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → list of relationship IDs, in creation order
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    /// label → node IDs in creation order (poor man's label index)
    label_index: RwLock<HashMap<String, Vec<NodeId>>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
    next_tx_id: AtomicU64,
}

impl Default for MemoryInner {
    fn default() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            relationships: RwLock::new(HashMap::new()),
            adjacency: RwLock::new(HashMap::new()),
            label_index: RwLock::new(HashMap::new()),
            next_node_id: AtomicU64::new(1),
            next_rel_id: AtomicU64::new(1),
            next_tx_id: AtomicU64::new(1),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.inner.nodes.read().clone(),
            relationships: self.inner.relationships.read().clone(),
            adjacency: self.inner.adjacency.read().clone(),
            label_index: self.inner.label_index.read().clone(),
            next_node_id: self.inner.next_node_id.load(Ordering::Relaxed),
            next_rel_id: self.inner.next_rel_id.load(Ordering::Relaxed),
        }
    }

    fn restore(&self, snapshot: Snapshot) {
        *self.inner.nodes.write() = snapshot.nodes;
        *self.inner.relationships.write() = snapshot.relationships;
        *self.inner.adjacency.write() = snapshot.adjacency;
        *self.inner.label_index.write() = snapshot.label_index;
        self.inner.next_node_id.store(snapshot.next_node_id, Ordering::Relaxed);
        self.inner.next_rel_id.store(snapshot.next_rel_id, Ordering::Relaxed);
    }
}

/// Full copy of the graph taken when a write transaction begins.
struct Snapshot {
    nodes: HashMap<NodeId, Node>,
    relationships: HashMap<RelId, Relationship>,
    adjacency: HashMap<NodeId, Vec<RelId>>,
    label_index: HashMap<String, Vec<NodeId>>,
    next_node_id: u64,
    next_rel_id: u64,
}

// ============================================================================
// MemoryTx
// ============================================================================

/// In-memory transaction: a mode, plus the rollback snapshot for writers.
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
    snapshot: Option<Snapshot>,
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

fn writable(tx: &MemoryTx) -> Result<()> {
    if tx.is_writable() {
        Ok(())
    } else {
        Err(Error::TxError(format!("{} is read-only", tx.id)))
    }
}

// ============================================================================
// StorageBackend impl
// ============================================================================

impl StorageBackend for MemoryBackend {
    type Tx = MemoryTx;

    fn shutdown(&self) -> Result<()> { Ok(()) }

    fn clear(&self) -> Result<()> {
        self.inner.nodes.write().clear();
        self.inner.relationships.write().clear();
        self.inner.adjacency.write().clear();
        self.inner.label_index.write().clear();
        self.inner.next_node_id.store(1, Ordering::Relaxed);
        self.inner.next_rel_id.store(1, Ordering::Relaxed);
        Ok(())
    }

    fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed));
        let snapshot = match mode {
            TxMode::ReadWrite => Some(self.snapshot()),
            TxMode::ReadOnly => None,
        };
        Ok(MemoryTx { id, mode, snapshot })
    }

    fn commit_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    fn rollback_tx(&self, tx: MemoryTx) -> Result<()> {
        if let Some(snapshot) = tx.snapshot {
            self.restore(snapshot);
        }
        Ok(())
    }

    // ========================================================================
    // Node CRUD
    // ========================================================================

    fn create_node(&self, tx: &mut MemoryTx, labels: &[&str], props: PropertyMap) -> Result<NodeId> {
        writable(tx)?;
        let id = NodeId(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };

        // Update label index
        {
            let mut idx = self.inner.label_index.write();
            for label in &node.labels {
                idx.entry(label.clone()).or_default().push(id);
            }
        }

        self.inner.nodes.write().insert(id, node);
        self.inner.adjacency.write().insert(id, Vec::new());

        Ok(id)
    }

    fn get_node(&self, _tx: &MemoryTx, id: NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(&id).cloned())
    }

    fn set_node_property(&self, tx: &mut MemoryTx, id: NodeId, key: &str, val: Value) -> Result<()> {
        writable(tx)?;
        let mut nodes = self.inner.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.properties.insert(key.to_string(), val);
        Ok(())
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        writable(tx)?;
        // Verify both nodes exist
        {
            let nodes = self.inner.nodes.read();
            if !nodes.contains_key(&src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(&dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.inner.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let rel = Relationship {
            id,
            src,
            dst,
            rel_type: rel_type.to_string(),
            properties: props,
        };

        self.inner.relationships.write().insert(id, rel);

        // Update adjacency for both endpoints
        let mut adj = self.inner.adjacency.write();
        adj.entry(src).or_default().push(id);
        if src != dst {
            adj.entry(dst).or_default().push(id);
        }

        Ok(id)
    }

    fn set_relationship_property(
        &self,
        tx: &mut MemoryTx,
        id: RelId,
        key: &str,
        val: Value,
    ) -> Result<()> {
        writable(tx)?;
        let mut rels = self.inner.relationships.write();
        let rel = rels.get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Relationship {id}")))?;
        rel.properties.insert(key.to_string(), val);
        Ok(())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    fn get_relationships(
        &self,
        _tx: &MemoryTx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>> {
        let adj = self.inner.adjacency.read();
        let rels = self.inner.relationships.read();

        let Some(rel_ids) = adj.get(&node) else { return Ok(Vec::new()) };
        let mut result = Vec::new();

        for rid in rel_ids {
            if let Some(rel) = rels.get(rid) {
                // Direction filter
                let matches_dir = match dir {
                    Direction::Outgoing => rel.src == node,
                    Direction::Incoming => rel.dst == node,
                    Direction::Both => true,
                };
                // Type filter
                let matches_type = rel_type.is_none_or(|t| rel.rel_type == t);

                if matches_dir && matches_type {
                    result.push(rel.clone());
                }
            }
        }

        Ok(result)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    fn node_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.nodes.read().len() as u64)
    }

    fn relationship_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.relationships.read().len() as u64)
    }

    // ========================================================================
    // Scan
    // ========================================================================

    fn all_nodes(&self, _tx: &MemoryTx) -> Result<Vec<Node>> {
        let mut nodes: Vec<Node> = self.inner.nodes.read().values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        Ok(nodes)
    }

    fn nodes_by_label(&self, _tx: &MemoryTx, label: &str) -> Result<Vec<Node>> {
        let idx = self.inner.label_index.read();
        let nodes = self.inner.nodes.read();

        let Some(ids) = idx.get(label) else { return Ok(Vec::new()) };
        Ok(ids.iter().filter_map(|id| nodes.get(id).cloned()).collect())
    }

    fn nodes_by_property(
        &self,
        _tx: &MemoryTx,
        label: &str,
        key: &str,
        value: &Value,
    ) -> Result<Vec<Node>> {
        // Brute force scan (memory backend doesn't have real property indexes)
        let idx = self.inner.label_index.read();
        let nodes = self.inner.nodes.read();

        let Some(ids) = idx.get(label) else { return Ok(Vec::new()) };
        Ok(ids.iter()
            .filter_map(|id| nodes.get(id))
            .filter(|n| n.get(key) == Some(value))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_node() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();

        let id = db.create_node(&mut tx, &["WORD"], props([("text", "cat")])).unwrap();
        let node = db.get_node(&tx, id).unwrap().unwrap();

        assert_eq!(node.labels.to_vec(), vec!["WORD".to_string()]);
        assert_eq!(node.get("text"), Some(&Value::from("cat")));
    }

    #[test]
    fn test_create_relationship() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();

        let a = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        let b = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();

        let rel_id = db.create_relationship(&mut tx, a, b, "FOLLOWS", PropertyMap::new()).unwrap();
        let rels = db.get_relationships(&tx, b, Direction::Incoming, Some("FOLLOWS")).unwrap();
        assert_eq!(rels.len(), 1);
        let rel = &rels[0];

        assert_eq!(rel.id, rel_id);
        assert_eq!(rel.src, a);
        assert_eq!(rel.dst, b);
        assert_eq!(rel.rel_type, "FOLLOWS");
    }

    #[test]
    fn test_relationship_to_missing_node_fails() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        let a = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();

        let err = db.create_relationship(&mut tx, a, NodeId(99), "FOLLOWS", PropertyMap::new());
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_read_only_tx_rejects_writes() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadOnly).unwrap();

        let result = db.create_node(&mut tx, &["WORD"], PropertyMap::new());
        assert!(matches!(result, Err(Error::TxError(_))));
        assert_eq!(db.node_count(&tx).unwrap(), 0);
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        let kept = db.create_node(&mut tx, &["WORD"], props([("freq", 1)])).unwrap();
        db.commit_tx(tx).unwrap();

        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        let doomed = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, kept, doomed, "FOLLOWS", PropertyMap::new()).unwrap();
        db.set_node_property(&mut tx, kept, "freq", Value::from(5)).unwrap();
        db.rollback_tx(tx).unwrap();

        let tx = db.begin_tx(TxMode::ReadOnly).unwrap();
        assert_eq!(db.node_count(&tx).unwrap(), 1);
        assert_eq!(db.relationship_count(&tx).unwrap(), 0);
        assert_eq!(db.get_node(&tx, kept).unwrap().unwrap().float_or("freq", 0.0), 1.0);
        assert_eq!(db.nodes_by_label(&tx, "WORD").unwrap().len(), 1);
    }

    #[test]
    fn test_clear_resets_ids() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        db.commit_tx(tx).unwrap();

        db.clear().unwrap();

        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        assert_eq!(db.node_count(&tx).unwrap(), 0);
        assert!(db.nodes_by_label(&tx, "WORD").unwrap().is_empty());
        assert_eq!(db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap(), NodeId(1));
    }

    #[test]
    fn test_label_index_covers_every_label() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        db.create_node(&mut tx, &["WORD", "VERB"], PropertyMap::new()).unwrap();
        db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();

        assert_eq!(db.nodes_by_label(&tx, "VERB").unwrap().len(), 1);
        assert_eq!(db.nodes_by_label(&tx, "WORD").unwrap().len(), 2);
    }

    #[test]
    fn test_nodes_by_property_keeps_creation_order() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        let first = db.create_node(&mut tx, &["WORD"], props([("text", "the")])).unwrap();
        db.create_node(&mut tx, &["WORD"], props([("text", "cat")])).unwrap();
        let third = db.create_node(&mut tx, &["WORD"], props([("text", "the")])).unwrap();

        let found = db.nodes_by_property(&tx, "WORD", "text", &Value::from("the")).unwrap();
        let ids: Vec<NodeId> = found.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn test_relationships_by_type() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();

        let a = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        let b = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        let c = db.create_node(&mut tx, &["SENTENCE"], PropertyMap::new()).unwrap();

        db.create_relationship(&mut tx, a, b, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, c, a, "CONTAINS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, c, b, "CONTAINS", PropertyMap::new()).unwrap();

        assert_eq!(db.relationships_by_type(&tx, "FOLLOWS").unwrap().len(), 1);
        assert_eq!(db.relationships_by_type(&tx, "CONTAINS").unwrap().len(), 2);
    }

    #[test]
    fn test_all_paths_respects_depth_and_types() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();

        // a -> b -> d, a -> c -> b (so a -> c -> b -> d), plus a CONTAINS shortcut a -> d
        let a = db.create_node(&mut tx, &["START"], PropertyMap::new()).unwrap();
        let b = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        let c = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
        let d = db.create_node(&mut tx, &["END"], PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, a, b, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, b, d, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, a, c, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, c, b, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, b, c, "FOLLOWS", PropertyMap::new()).unwrap();
        db.create_relationship(&mut tx, a, d, "CONTAINS", PropertyMap::new()).unwrap();

        let all = db.all_paths(&tx, a, d, &["FOLLOWS"], 1..=5, None).unwrap();
        let mut lengths: Vec<usize> = all.paths.iter().map(Path::len).collect();
        lengths.sort();
        assert_eq!(lengths, vec![2, 3]);
        assert!(!all.truncated);

        let short = db.all_paths(&tx, a, d, &["FOLLOWS"], 2..=2, None).unwrap();
        assert_eq!(short.paths.len(), 1);

        let any_type = db.all_paths(&tx, a, d, &[], 1..=1, None).unwrap();
        assert_eq!(any_type.paths.len(), 1);
        assert_eq!(any_type.paths[0].relationships[0].rel_type, "CONTAINS");
    }

    /// START fanning out to `width` words that all lead to END.
    fn fan(width: usize) -> (MemoryBackend, NodeId, NodeId) {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).unwrap();
        let a = db.create_node(&mut tx, &["START"], PropertyMap::new()).unwrap();
        let z = db.create_node(&mut tx, &["END"], PropertyMap::new()).unwrap();
        for _ in 0..width {
            let mid = db.create_node(&mut tx, &["WORD"], PropertyMap::new()).unwrap();
            db.create_relationship(&mut tx, a, mid, "FOLLOWS", PropertyMap::new()).unwrap();
            db.create_relationship(&mut tx, mid, z, "FOLLOWS", PropertyMap::new()).unwrap();
        }
        db.commit_tx(tx).unwrap();
        (db, a, z)
    }

    #[test]
    fn test_all_paths_cap_truncates() {
        let (db, a, z) = fan(4);
        let tx = db.begin_tx(TxMode::ReadOnly).unwrap();

        let capped = db.all_paths(&tx, a, z, &["FOLLOWS"], 1..=10, Some(2)).unwrap();
        assert_eq!(capped.paths.len(), 2);
        assert!(capped.truncated);
    }

    #[test]
    fn test_all_paths_cap_exactly_met_is_not_truncated() {
        let (db, a, z) = fan(2);
        let tx = db.begin_tx(TxMode::ReadOnly).unwrap();

        let search = db.all_paths(&tx, a, z, &["FOLLOWS"], 1..=10, Some(2)).unwrap();
        assert_eq!(search.paths.len(), 2);
        assert!(!search.truncated);

        let loose = db.all_paths(&tx, a, z, &["FOLLOWS"], 1..=10, Some(3)).unwrap();
        assert_eq!(loose.paths.len(), 2);
        assert!(!loose.truncated);
    }
}
