//! Context scoring: how well a token's neighbours agree with the
//! neighbourhood of an existing word node.
//!
//! The token side is the set of texts up to `width` tokens before (or after)
//! the token in its own sentence. The node side is every text reachable
//! within `depth` FOLLOWS hops in the same direction, weighted by the
//! frequencies of the nodes reached, summed over every walk that reaches
//! them. Terminal nodes carry no text and stop the walk.

use std::cmp::Ordering;

use hashbrown::{HashMap, HashSet};

use crate::graph::{prop, GraphTx};
use crate::model::*;
use crate::nlp::Token;
use crate::storage::StorageBackend;
use crate::Result;

/// Agreement between a token's context and a candidate node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextScore {
    pub node: NodeId,
    /// Distinct context texts shared by both sides, over both directions.
    pub matches: usize,
    /// Node-side frequency mass of the shared texts.
    pub occurrences: f64,
}

impl ContextScore {
    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }

    /// More matches first, then more occurrences. Equal scores compare
    /// equal; which of them wins is unspecified.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.matches
            .cmp(&other.matches)
            .then_with(|| self.occurrences.total_cmp(&other.occurrences))
    }

    /// The strongest score, if any.
    pub fn best(scores: impl IntoIterator<Item = ContextScore>) -> Option<ContextScore> {
        scores.into_iter().max_by(ContextScore::rank)
    }
}

/// How far context reaches on either side of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    /// Tokens taken from the sentence on each side.
    pub width: usize,
    /// FOLLOWS hops explored from the node on each side.
    pub depth: usize,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self { width: 3, depth: 3 }
    }
}

impl ContextWindow {
    pub fn score<B: StorageBackend>(
        &self,
        tx: &GraphTx<'_, B>,
        tokens: &[Token],
        pos: usize,
        node: NodeId,
    ) -> Result<ContextScore> {
        let mut score = ContextScore { node, matches: 0, occurrences: 0.0 };

        for dir in [Direction::Incoming, Direction::Outgoing] {
            let texts = self.token_side(tokens, pos, dir);
            if texts.is_empty() {
                continue;
            }
            let neighbourhood = self.node_side(tx, node, dir)?;
            for text in texts {
                if let Some(freq) = neighbourhood.get(text) {
                    score.matches += 1;
                    score.occurrences += freq;
                }
            }
        }
        Ok(score)
    }

    /// Texts of the tokens within `width` of `pos`, clipped at the sentence
    /// bounds.
    pub fn token_side<'t>(&self, tokens: &'t [Token], pos: usize, dir: Direction) -> HashSet<&'t str> {
        let range = match dir {
            Direction::Incoming => pos.saturating_sub(self.width)..pos,
            Direction::Outgoing => (pos + 1).min(tokens.len())..(pos + 1 + self.width).min(tokens.len()),
            Direction::Both => return HashSet::new(),
        };
        tokens[range].iter().map(Token::text).collect()
    }

    /// Text → accumulated frequency of everything within `depth` FOLLOWS
    /// hops of `node` in direction `dir`.
    pub fn node_side<B: StorageBackend>(
        &self,
        tx: &GraphTx<'_, B>,
        node: NodeId,
        dir: Direction,
    ) -> Result<HashMap<String, f64>> {
        let mut result: HashMap<String, f64> = HashMap::new();
        let mut seen: HashMap<NodeId, Node> = HashMap::new();
        // One entry per walk, so a node reached twice counts twice.
        let mut frontier = vec![node];

        for _ in 0..self.depth {
            let mut next = Vec::new();
            for id in frontier {
                for rel in tx.follows_of(id, dir)? {
                    let Some(other) = rel.other_node(id) else { continue };
                    if !seen.contains_key(&other) {
                        seen.insert(other, tx.node(other)?);
                    }
                    let Some(neighbour) = seen.get(&other) else { continue };
                    let text = neighbour.str_or(prop::TEXT, "");
                    if text.is_empty() {
                        continue;
                    }
                    *result.entry(text.to_owned()).or_insert(0.0) += neighbour.float_or(prop::FREQ, 1.0);
                    next.push(other);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        Ok(result)
    }
}
