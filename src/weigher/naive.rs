//! Inverse-frequency weigher.

use crate::graph::{prop, WordGraph};
use crate::model::PropertyAccess;
use crate::storage::StorageBackend;
use crate::Result;
use super::{weigh_follows, GraphWeigher};

/// `weight = 1 / freq`: the more sentences share an adjacency, the cheaper it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveGraphWeigher;

impl<B: StorageBackend> GraphWeigher<B> for NaiveGraphWeigher {
    fn weight(&self, graph: &WordGraph<B>) -> Result<()> {
        weigh_follows(graph, "naive", |_, rel| Ok(1.0 / rel.float_or(prop::FREQ, 1.0)))
    }
}
