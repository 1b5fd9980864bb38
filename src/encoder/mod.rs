//! # Graph encoder
//!
//! Turns a handful of sentences into a word graph. Every sentence becomes a
//! `START → word → … → word → END` chain of FOLLOWS edges; occurrences of the
//! same word are merged into shared nodes when their local context agrees,
//! which is what makes alternative paths through the graph possible.

pub mod context;

use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashSet;
use tracing::{debug, info};

use crate::graph::{GraphTx, WordGraph};
use crate::model::NodeId;
use crate::nlp::{Preprocessor, StopWords, Token};
use crate::storage::StorageBackend;
use crate::tx::TxMode;
use crate::{Error, Result};

pub use context::{ContextScore, ContextWindow};

/// Builds a word graph from raw text.
pub trait GraphEncoder<B: StorageBackend> {
    /// Encode `sentences` into `graph` and return the length, in tokens, of
    /// the longest individual sentence.
    fn encode(&self, graph: &WordGraph<B>, sentences: &[String], stop_words: &StopWords) -> Result<usize>;
}

/// Context-merging encoder.
///
/// Content words merge into the best-scoring existing node with the same tag
/// and text, whatever the score. Stop words only merge when at least one
/// context text matches; otherwise they get a fresh node.
pub struct DefaultGraphEncoder {
    preprocessor: Arc<dyn Preprocessor>,
    context: ContextWindow,
}

impl DefaultGraphEncoder {
    pub fn new(preprocessor: Arc<dyn Preprocessor>) -> Self {
        Self { preprocessor, context: ContextWindow::default() }
    }

    pub fn with_context(mut self, context: ContextWindow) -> Self {
        self.context = context;
        self
    }

    /// Split every block into sentences and tag them. Runs before the graph
    /// is touched so bad input never leaves a partial graph behind.
    fn tokenize(&self, blocks: &[String]) -> Result<Vec<Vec<Token>>> {
        let mut sentences = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            if block.trim().is_empty() {
                return Err(Error::InvalidArgument(format!("sentence #{i} is empty")));
            }
            for sentence in self.preprocessor.split_sentences(block)? {
                sentences.push(Token::parse(self.preprocessor.as_ref(), &sentence)?);
            }
        }
        Ok(sentences)
    }

    fn encode_sentence<B: StorageBackend>(
        &self,
        tx: &mut GraphTx<'_, B>,
        id: usize,
        tokens: &[Token],
        stop_words: &StopWords,
    ) -> Result<()> {
        let sentence = tx.create_sentence(id, tokens.len())?;
        // An adjacency counts once per sentence, however often it repeats.
        let mut linked: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut previous = tx.start()?;
        for (pos, token) in tokens.iter().enumerate() {
            let current = if token.is_stop_word(stop_words) {
                self.resolve_stop_word(tx, tokens, pos)?
            } else {
                self.resolve_word(tx, tokens, pos)?
            };
            tx.contain(sentence, current, pos)?;
            if linked.insert((previous, current)) {
                tx.link(previous, current)?;
            }
            previous = current;
        }
        let end = tx.end()?;
        if linked.insert((previous, end)) {
            tx.link(previous, end)?;
        }
        Ok(())
    }

    /// Merge into a candidate only on real context evidence.
    fn resolve_stop_word<B: StorageBackend>(
        &self,
        tx: &mut GraphTx<'_, B>,
        tokens: &[Token],
        pos: usize,
    ) -> Result<NodeId> {
        let mut scores = Vec::new();
        for candidate in tx.word_candidates(&tokens[pos])? {
            let score = self.context.score(tx, tokens, pos, candidate.id)?;
            if !score.is_empty() {
                scores.push(score);
            }
        }
        match ContextScore::best(scores) {
            Some(best) => {
                tx.increment_frequency(best.node)?;
                Ok(best.node)
            }
            None => tx.create_word(&tokens[pos], true),
        }
    }

    /// Merge into the best candidate, even one with no shared context.
    fn resolve_word<B: StorageBackend>(
        &self,
        tx: &mut GraphTx<'_, B>,
        tokens: &[Token],
        pos: usize,
    ) -> Result<NodeId> {
        let mut scores = Vec::new();
        for candidate in tx.word_candidates(&tokens[pos])? {
            scores.push(self.context.score(tx, tokens, pos, candidate.id)?);
        }
        match ContextScore::best(scores) {
            Some(best) => {
                tx.increment_frequency(best.node)?;
                Ok(best.node)
            }
            None => tx.create_word(&tokens[pos], false),
        }
    }
}

impl<B: StorageBackend> GraphEncoder<B> for DefaultGraphEncoder {
    fn encode(&self, graph: &WordGraph<B>, sentences: &[String], stop_words: &StopWords) -> Result<usize> {
        let started = Instant::now();
        let tokenized = self.tokenize(sentences)?;

        let mut tx = graph.begin(TxMode::ReadWrite)?;
        let mut max_length = 0;
        for (id, tokens) in tokenized.iter().enumerate() {
            debug!(sentence = id, words = tokens.len(), "encoding sentence (punctuation ignored)");
            self.encode_sentence(&mut tx, id, tokens, stop_words)?;
            max_length = max_length.max(tokens.len());
        }
        tx.commit()?;

        info!(
            sentences = tokenized.len(),
            max_length,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "word graph generated"
        );
        Ok(max_length)
    }
}
