//! # Word graph
//!
//! A typed layer over any [`StorageBackend`]: the node and edge kinds of the
//! word graph and the handful of mutations the encoder and weigher perform.
//! All access goes through a [`GraphTx`], one per pipeline phase.

pub mod schema;

use tracing::warn;

use crate::model::*;
use crate::nlp::Token;
use crate::storage::{BackendConfig, MemoryBackend, PathSearch, StorageBackend};
use crate::tx::TxMode;
use crate::{Error, Result};

pub use schema::{prop, Terminal};

// ============================================================================
// WordGraph handle
// ============================================================================

/// A word graph living in a storage backend.
pub struct WordGraph<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> WordGraph<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend (for export and inspection).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Empty the graph before a new run.
    pub fn reset(&self) -> Result<()> {
        self.backend.clear()
    }

    /// Begin an explicit transaction.
    pub fn begin(&self, mode: TxMode) -> Result<GraphTx<'_, B>> {
        let tx = self.backend.begin_tx(mode)?;
        Ok(GraphTx { backend: &self.backend, tx: Some(tx) })
    }
}

/// In-memory word graph.
impl WordGraph<MemoryBackend> {
    pub fn open_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn open(config: BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Memory => Ok(Self::open_memory()),
        }
    }
}

impl Default for WordGraph<MemoryBackend> {
    fn default() -> Self {
        Self::open_memory()
    }
}

// ============================================================================
// GraphTx
// ============================================================================

/// Explicit transaction handle with auto-rollback on drop.
pub struct GraphTx<'g, B: StorageBackend> {
    backend: &'g B,
    tx: Option<B::Tx>,
}

impl<B: StorageBackend> Drop for GraphTx<'_, B> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(err) = self.backend.rollback_tx(tx) {
                warn!(%err, "rollback of abandoned transaction failed");
            }
        }
    }
}

impl<'g, B: StorageBackend> GraphTx<'g, B> {
    pub fn commit(mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => self.backend.commit_tx(tx),
            None => Ok(()),
        }
    }

    pub fn rollback(mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => self.backend.rollback_tx(tx),
            None => Ok(()),
        }
    }

    fn tx(&self) -> Result<&B::Tx> {
        self.tx.as_ref().ok_or_else(|| Error::TxError("transaction already finished".into()))
    }

    fn tx_mut(&mut self) -> Result<&mut B::Tx> {
        self.tx.as_mut().ok_or_else(|| Error::TxError("transaction already finished".into()))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Result<Node> {
        self.backend.get_node(self.tx()?, id)?
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))
    }

    pub fn nodes(&self, label: &str) -> Result<Vec<Node>> {
        self.backend.nodes_by_label(self.tx()?, label)
    }

    pub fn relationships(&self, id: NodeId, dir: Direction, rel_type: &str) -> Result<Vec<Relationship>> {
        self.backend.get_relationships(self.tx()?, id, dir, Some(rel_type))
    }

    pub fn relationships_by_type(&self, rel_type: &str) -> Result<Vec<Relationship>> {
        self.backend.relationships_by_type(self.tx()?, rel_type)
    }

    /// The FOLLOWS edges entering (`Incoming`) or leaving (`Outgoing`) a node.
    pub fn follows_of(&self, id: NodeId, dir: Direction) -> Result<Vec<Relationship>> {
        self.relationships(id, dir, schema::FOLLOWS)
    }

    /// Look up a terminal node without touching its frequency.
    pub fn find_terminal(&self, terminal: Terminal) -> Result<Option<Node>> {
        Ok(self.nodes(terminal.label())?.into_iter().next())
    }

    /// Existing word nodes sharing the token's `(tag, text)`, oldest first.
    pub fn word_candidates(&self, token: &Token) -> Result<Vec<Node>> {
        let nodes = self.backend.nodes_by_property(
            self.tx()?,
            schema::WORD,
            prop::TEXT,
            &Value::from(token.text()),
        )?;
        Ok(nodes.into_iter().filter(|n| n.str_or(prop::TAG, "") == token.tag()).collect())
    }

    /// Simple FOLLOWS paths from `from` to `to` of at most `max_depth` hops.
    pub fn paths_between(&self, from: NodeId, to: NodeId, max_depth: usize, limit: Option<usize>) -> Result<PathSearch> {
        self.backend.all_paths(
            self.tx()?,
            from,
            to,
            &[schema::FOLLOWS],
            1..=max_depth,
            limit,
        )
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// The terminal rule: bump the frequency of the existing terminal node,
    /// or create it with frequency 1.
    pub fn terminal(&mut self, terminal: Terminal) -> Result<NodeId> {
        match self.find_terminal(terminal)? {
            Some(node) => {
                self.increment_frequency(node.id)?;
                Ok(node.id)
            }
            None => {
                let backend = self.backend;
                backend.create_node(self.tx_mut()?, &[terminal.label()], props([(prop::FREQ, 1)]))
            }
        }
    }

    pub fn start(&mut self) -> Result<NodeId> {
        self.terminal(Terminal::Start)
    }

    pub fn end(&mut self) -> Result<NodeId> {
        self.terminal(Terminal::End)
    }

    pub fn create_sentence(&mut self, id: usize, length: usize) -> Result<NodeId> {
        let backend = self.backend;
        backend.create_node(
            self.tx_mut()?,
            &[schema::SENTENCE],
            props([(prop::ID, id), (prop::LENGTH, length)]),
        )
    }

    /// A fresh word node for `token` with frequency 1.
    pub fn create_word(&mut self, token: &Token, stop_word: bool) -> Result<NodeId> {
        let mut labels = vec![schema::WORD];
        if token.is_verb() {
            labels.push(schema::VERB);
        }
        let mut properties = props([
            (prop::TEXT, token.text()),
            (prop::WORD, token.surface()),
            (prop::TAG, token.tag()),
        ]);
        properties.insert(prop::FREQ.into(), Value::from(1));
        properties.insert(prop::STOP.into(), Value::from(stop_word));
        properties.insert(prop::VERB.into(), Value::from(token.is_verb()));

        let backend = self.backend;
        backend.create_node(self.tx_mut()?, &labels, properties)
    }

    /// Add one to a node's frequency and return the new value.
    pub fn increment_frequency(&mut self, id: NodeId) -> Result<i64> {
        let freq = frequency(&self.node(id)?)? + 1;
        let backend = self.backend;
        backend.set_node_property(self.tx_mut()?, id, prop::FREQ, Value::from(freq))?;
        Ok(freq)
    }

    /// Record one more `tail → head` adjacency: bump the existing FOLLOWS
    /// edge or create it with frequency 1.
    pub fn link(&mut self, tail: NodeId, head: NodeId) -> Result<RelId> {
        let existing = self.follows_of(tail, Direction::Outgoing)?
            .into_iter()
            .find(|rel| rel.dst == head);

        let backend = self.backend;
        match existing {
            Some(rel) => {
                let freq = frequency(&rel)? + 1;
                backend.set_relationship_property(self.tx_mut()?, rel.id, prop::FREQ, Value::from(freq))?;
                Ok(rel.id)
            }
            None => backend.create_relationship(
                self.tx_mut()?,
                tail,
                head,
                schema::FOLLOWS,
                props([(prop::FREQ, 1)]),
            ),
        }
    }

    /// Record that `sentence` holds `word` at token position `pos`.
    pub fn contain(&mut self, sentence: NodeId, word: NodeId, pos: usize) -> Result<RelId> {
        let backend = self.backend;
        backend.create_relationship(
            self.tx_mut()?,
            sentence,
            word,
            schema::CONTAINS,
            props([(prop::POS, pos)]),
        )
    }

    pub fn set_weight(&mut self, rel: RelId, weight: f64) -> Result<()> {
        let backend = self.backend;
        backend.set_relationship_property(self.tx_mut()?, rel, prop::WEIGHT, Value::from(weight))
    }
}

/// The `freq` counter of a node or edge; 1 when unset.
fn frequency(element: &impl PropertyAccess) -> Result<i64> {
    match element.properties().get(prop::FREQ) {
        None => Ok(1),
        Some(value) => value.as_int().ok_or_else(|| Error::TypeError {
            expected: "INTEGER".into(),
            got: value.type_name().into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, tag: &str) -> Token {
        Token::new(text, tag).unwrap()
    }

    #[test]
    fn test_terminal_rule_counts_uses() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();

        let first = tx.start().unwrap();
        let second = tx.start().unwrap();
        assert_eq!(first, second);
        assert_eq!(tx.node(first).unwrap().int_or(prop::FREQ, 0), 2);
        assert_eq!(tx.nodes(schema::START).unwrap().len(), 1);
        assert!(tx.find_terminal(Terminal::End).unwrap().is_none());
        tx.commit().unwrap();
    }

    #[test]
    fn test_link_increments_instead_of_duplicating() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        let a = tx.create_word(&token("the", "DT"), true).unwrap();
        let b = tx.create_word(&token("cat", "NN"), false).unwrap();

        let r1 = tx.link(a, b).unwrap();
        let r2 = tx.link(a, b).unwrap();
        assert_eq!(r1, r2);

        let follows = tx.relationships_by_type(schema::FOLLOWS).unwrap();
        assert_eq!(follows.len(), 1);
        assert_eq!(follows[0].int_or(prop::FREQ, 0), 2);
    }

    #[test]
    fn test_create_word_labels_verbs() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        let sat = tx.create_word(&token("Sat", "VBD"), false).unwrap();
        let node = tx.node(sat).unwrap();

        assert!(node.has_label(schema::WORD));
        assert!(node.has_label(schema::VERB));
        assert_eq!(node.str_or(prop::TEXT, ""), "sat");
        assert_eq!(node.str_or(prop::WORD, ""), "Sat");
        assert!(node.bool_or(prop::VERB, false));
        assert!(!node.bool_or(prop::STOP, true));
    }

    #[test]
    fn test_candidates_match_tag_and_text() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        let noun = tx.create_word(&token("visit", "NN"), false).unwrap();
        tx.create_word(&token("visit", "VB"), false).unwrap();

        let found = tx.word_candidates(&token("Visit", "NN")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, noun);
    }

    #[test]
    fn test_explicit_rollback_discards_writes() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        tx.create_sentence(0, 3).unwrap();
        tx.rollback().unwrap();

        let tx = graph.begin(TxMode::ReadOnly).unwrap();
        assert!(tx.nodes(schema::SENTENCE).unwrap().is_empty());
    }

    #[test]
    fn test_paths_follow_only_follows_edges() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        let start = tx.start().unwrap();
        let word = tx.create_word(&token("sat", "VBD"), false).unwrap();
        let end = tx.end().unwrap();
        let sentence = tx.create_sentence(0, 1).unwrap();
        tx.link(start, word).unwrap();
        tx.link(word, end).unwrap();
        tx.contain(sentence, word, 0).unwrap();

        let search = tx.paths_between(start, end, 5, None).unwrap();
        assert_eq!(search.paths.len(), 1);
        assert_eq!(search.paths[0].len(), 2);
        assert!(tx.paths_between(start, end, 1, None).unwrap().paths.is_empty());

        // A cap the search only just fills is not a truncation
        let capped = tx.paths_between(start, end, 5, Some(1)).unwrap();
        assert_eq!(capped.paths.len(), 1);
        assert!(!capped.truncated);
    }

    #[test]
    fn test_non_integer_frequency_is_a_type_error() {
        let graph = WordGraph::open_memory();
        let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
        let cat = tx.create_word(&token("cat", "NN"), false).unwrap();
        let backend = graph.backend();
        backend.set_node_property(tx.tx_mut().unwrap(), cat, prop::FREQ, Value::from("many")).unwrap();

        let err = tx.increment_frequency(cat).unwrap_err();
        assert!(matches!(err, Error::TypeError { ref got, .. } if got == "STRING"));
    }

    #[test]
    fn test_dropped_tx_rolls_back() {
        let graph = WordGraph::open_memory();
        {
            let mut tx = graph.begin(TxMode::ReadWrite).unwrap();
            tx.start().unwrap();
        }
        let tx = graph.begin(TxMode::ReadOnly).unwrap();
        assert!(tx.find_terminal(Terminal::Start).unwrap().is_none());
    }
}
