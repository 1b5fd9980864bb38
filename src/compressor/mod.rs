//! # Path compressor
//!
//! Searches the weighed word graph for the cheapest plausible sentence:
//! enumerate simple FOLLOWS paths from START to END, keep those long enough
//! and containing a verb, rank them by summed edge weight, and read the
//! winner back as text.

use std::cmp::Ordering;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::graph::{prop, schema, Terminal, WordGraph};
use crate::model::*;
use crate::storage::StorageBackend;
use crate::tx::TxMode;
use crate::Result;

/// Paths shorter than this many edges are rarely full sentences.
pub const MIN_DEPTH: usize = 8;

/// Extracts a summary sentence from a weighed graph.
pub trait PathCompressor<B: StorageBackend> {
    /// `max_depth` is the token count of the longest encoded sentence.
    /// `Ok(None)` means no path qualified.
    fn compress(&self, graph: &WordGraph<B>, max_depth: usize) -> Result<Option<String>>;
}

/// A candidate path and its total cost.
#[derive(Debug, Clone)]
pub struct CostPath {
    pub path: Path,
    pub cost: f64,
    /// Sum of the finite weights only; breaks ties between infinite costs.
    pub finite_cost: f64,
}

impl CostPath {
    pub fn new(path: Path) -> Self {
        let weights = path.relationships.iter().map(|rel| rel.float_or(prop::WEIGHT, 1.0));
        let (cost, finite_cost) = weights.fold((0.0, 0.0), |(all, finite), w| {
            (all + w, if w.is_finite() { finite + w } else { finite })
        });
        Self { path, cost, finite_cost }
    }

    /// Cheaper first. Equal costs fall back to the finite part, then to the
    /// shorter path; anything still equal is an arbitrary pick.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.finite_cost.total_cmp(&other.finite_cost))
            .then_with(|| self.path.len().cmp(&other.path.len()))
    }
}

pub fn has_verb(path: &Path) -> bool {
    path.nodes.iter().any(|node| node.has_label(schema::VERB))
}

/// Join the surface forms along the path and close with a single period.
/// Terminal nodes have no surface form and contribute nothing.
pub fn decode(path: &Path) -> Option<String> {
    let words: Vec<&str> = path.nodes
        .iter()
        .filter_map(|node| node.get(prop::WORD).and_then(Value::as_str))
        .collect();
    let sentence = words.join(" ");
    let body = sentence.trim().trim_end_matches('.').trim_end();
    if body.is_empty() {
        None
    } else {
        Some(format!("{body}."))
    }
}

/// Exhaustive enumerate-filter-rank compressor.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPathCompressor {
    min_depth: usize,
    max_paths: Option<usize>,
}

impl Default for DefaultPathCompressor {
    fn default() -> Self {
        Self { min_depth: MIN_DEPTH, max_paths: None }
    }
}

impl DefaultPathCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Stop enumerating after this many START → END paths.
    pub fn with_max_paths(mut self, max_paths: Option<usize>) -> Self {
        self.max_paths = max_paths;
        self
    }
}

impl<B: StorageBackend> PathCompressor<B> for DefaultPathCompressor {
    fn compress(&self, graph: &WordGraph<B>, max_depth: usize) -> Result<Option<String>> {
        let started = Instant::now();
        let tx = graph.begin(TxMode::ReadOnly)?;
        let (Some(start), Some(end)) = (tx.find_terminal(Terminal::Start)?, tx.find_terminal(Terminal::End)?) else {
            debug!("graph has no terminal nodes");
            return Ok(None);
        };

        // A path holds at most `max_depth` words, hence one more edge.
        let search = tx.paths_between(start.id, end.id, max_depth + 1, self.max_paths)?;
        tx.commit()?;
        if search.truncated {
            warn!(cap = ?self.max_paths, "path enumeration stopped at the path cap");
        }

        let total = search.paths.len();
        let valid: Vec<CostPath> = search.paths
            .into_iter()
            .filter(|path| path.len() >= self.min_depth && has_verb(path))
            .map(CostPath::new)
            .collect();

        info!(
            valid = valid.len(),
            total,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "paths between START and END ranked"
        );

        let Some(best) = valid.into_iter().min_by(CostPath::rank) else {
            return Ok(None);
        };
        debug!(cost = best.cost, hops = best.path.len(), "generating the compressive summary");
        Ok(decode(&best.path))
    }
}
