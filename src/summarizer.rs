//! # Summarizer
//!
//! The three-phase pipeline: encode the sentences into a fresh word graph,
//! weigh its FOLLOWS edges, then extract the cheapest qualifying path. Each
//! phase runs in its own transaction and sees every write of the previous one.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::compressor::{DefaultPathCompressor, PathCompressor};
use crate::config::SummarizerConfig;
use crate::encoder::{DefaultGraphEncoder, GraphEncoder};
use crate::graph::WordGraph;
use crate::nlp::{Preprocessor, StopWords};
use crate::storage::{MemoryBackend, StorageBackend};
use crate::weigher::GraphWeigher;
use crate::{Error, Result};

/// The pluggable parts of the pipeline.
pub struct Strategies<B: StorageBackend> {
    pub encoder: Box<dyn GraphEncoder<B>>,
    pub weigher: Box<dyn GraphWeigher<B>>,
    pub compressor: Box<dyn PathCompressor<B>>,
}

impl<B: StorageBackend> Strategies<B> {
    /// Default encoder and compressor, with the configured weigher.
    pub fn from_config(config: &SummarizerConfig, preprocessor: Arc<dyn Preprocessor>) -> Result<Self> {
        config.validate()?;
        let encoder = DefaultGraphEncoder::new(preprocessor).with_context(config.context());
        let compressor = DefaultPathCompressor::new()
            .with_min_depth(config.min_depth)
            .with_max_paths(config.max_paths);
        Ok(Self {
            encoder: Box::new(encoder),
            weigher: config.weigher.build(),
            compressor: Box::new(compressor),
        })
    }
}

/// Produces one summary sentence from a handful of related sentences.
pub struct Summarizer<B: StorageBackend> {
    graph: WordGraph<B>,
    strategies: Strategies<B>,
}

impl<B: StorageBackend> Summarizer<B> {
    pub fn new(graph: WordGraph<B>, strategies: Strategies<B>) -> Self {
        Self { graph, strategies }
    }

    /// The graph left behind by the last run.
    pub fn graph(&self) -> &WordGraph<B> {
        &self.graph
    }

    /// Summarize `sentences`. `Ok(None)` means no path qualified, or there
    /// was nothing to summarize.
    pub fn process(&self, sentences: &[String], stop_words: &StopWords) -> Result<Option<String>> {
        if sentences.is_empty() {
            debug!("no sentences given");
            return Ok(None);
        }
        if let Some(i) = sentences.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::InvalidArgument(format!("sentence #{i} is empty")));
        }
        let started = Instant::now();

        self.graph.reset()?;
        let max_depth = self.strategies.encoder.encode(&self.graph, sentences, stop_words)?;
        self.strategies.weigher.weight(&self.graph)?;
        let summary = self.strategies.compressor.compress(&self.graph, max_depth)?;

        info!(
            sentences = sentences.len(),
            found = summary.is_some(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "summarization finished"
        );
        Ok(summary)
    }
}

impl Summarizer<MemoryBackend> {
    /// An in-memory summarizer built from `config`.
    pub fn from_config(config: &SummarizerConfig, preprocessor: Arc<dyn Preprocessor>) -> Result<Self> {
        let strategies = Strategies::from_config(config, preprocessor)?;
        let graph = WordGraph::open(config.backend)?;
        Ok(Self::new(graph, strategies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{prop, Terminal};
    use crate::model::PropertyAccess;
    use crate::nlp::SimplePreprocessor;
    use crate::tx::TxMode;

    fn summarizer() -> Summarizer<MemoryBackend> {
        Summarizer::from_config(&SummarizerConfig::default(), Arc::new(SimplePreprocessor::new())).unwrap()
    }

    #[test]
    fn test_empty_input_leaves_graph_alone() {
        let summarizer = summarizer();
        {
            let mut tx = summarizer.graph().begin(TxMode::ReadWrite).unwrap();
            tx.start().unwrap();
            tx.commit().unwrap();
        }
        assert_eq!(summarizer.process(&[], &StopWords::english()).unwrap(), None);
        let tx = summarizer.graph().begin(TxMode::ReadOnly).unwrap();
        let start = tx.find_terminal(Terminal::Start).unwrap().unwrap();
        assert_eq!(start.int_or(prop::FREQ, 0), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config = SummarizerConfig { context_depth: 0, ..SummarizerConfig::default() };
        let result = Summarizer::from_config(&config, Arc::new(SimplePreprocessor::new()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_sentence_is_invalid() {
        let result = summarizer().process(&["  ".to_string()], &StopWords::english());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
