//! Positional co-occurrence weigher.
//!
//! For an edge `tail → head`, every sentence containing both words adds
//! `1 / (q − p)` to a denominator, where `p` and `q` are the positions of
//! `tail` and `head` in that sentence. Words that sit close together in many
//! sentences get a large denominator and therefore a small cost; the cost is
//! further scaled down for frequent words.

use crate::graph::{prop, schema, GraphTx, WordGraph};
use crate::model::*;
use crate::storage::StorageBackend;
use crate::Result;
use super::{weigh_follows, GraphWeigher};

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedGraphWeigher;

impl AdvancedGraphWeigher {
    /// `Σ 1/(q − p)` over every pair of CONTAINS edges from one sentence to
    /// `tail` (position `p`) and `head` (position `q`). Pairs at the same
    /// position, which only a self-loop can produce, are skipped.
    pub fn positional_affinity<B: StorageBackend>(
        tx: &GraphTx<'_, B>,
        tail: NodeId,
        head: NodeId,
    ) -> Result<f64> {
        let mut denom = 0.0;
        for contains_tail in tx.relationships(tail, Direction::Incoming, schema::CONTAINS)? {
            let p = contains_tail.int_or(prop::POS, 0);
            for contains_head in tx.relationships(contains_tail.src, Direction::Outgoing, schema::CONTAINS)? {
                if contains_head.dst != head {
                    continue;
                }
                let q = contains_head.int_or(prop::POS, 0);
                if q != p {
                    denom += 1.0 / (q - p) as f64;
                }
            }
        }
        Ok(denom)
    }
}

/// Edge cost from endpoint frequencies and positional affinity. Edges whose
/// endpoints never share a sentence (every edge touching START or END) cost
/// `+∞`.
pub fn advanced_cost(freq_tail: f64, freq_head: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        return f64::INFINITY;
    }
    let weight = (freq_tail + freq_head) / denom;
    weight / (freq_tail * freq_head)
}

impl<B: StorageBackend> GraphWeigher<B> for AdvancedGraphWeigher {
    fn weight(&self, graph: &WordGraph<B>) -> Result<()> {
        weigh_follows(graph, "advanced", |tx, rel| {
            let freq_tail = tx.node(rel.src)?.float_or(prop::FREQ, 1.0);
            let freq_head = tx.node(rel.dst)?.float_or(prop::FREQ, 1.0);
            let denom = Self::positional_affinity(tx, rel.src, rel.dst)?;
            Ok(advanced_cost(freq_tail, freq_head, denom))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_formula() {
        // f = 2 and 2, adjacent in two sentences: (4 / 2) / 4
        assert_eq!(advanced_cost(2.0, 2.0, 2.0), 0.5);
        // f = 1 and 1, one sentence two apart: (2 / 0.5) / 1
        assert_eq!(advanced_cost(1.0, 1.0, 0.5), 4.0);
    }

    #[test]
    fn test_zero_denominator_is_infinite() {
        assert_eq!(advanced_cost(1.0, 3.0, 0.0), f64::INFINITY);
        assert_eq!(advanced_cost(1.0, 3.0, -0.0), f64::INFINITY);
    }
}
