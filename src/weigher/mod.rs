//! # Graph weighers
//!
//! Assign a traversal cost to every FOLLOWS edge once the graph is encoded.
//! Lower cost means a more likely continuation.
//!
//! | Weigher | Cost of `tail → head` |
//! |---------|------------------------|
//! | [`AdvancedGraphWeigher`] | `(f(tail) + f(head)) / Σ 1/(q − p) / (f(tail) · f(head))` |
//! | [`NaiveGraphWeigher`] | `1 / freq(tail → head)` |

pub mod advanced;
pub mod naive;

use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::{schema, GraphTx, WordGraph};
use crate::model::Relationship;
use crate::storage::StorageBackend;
use crate::tx::TxMode;
use crate::{Error, Result};

pub use advanced::AdvancedGraphWeigher;
pub use naive::NaiveGraphWeigher;

/// Progress is logged every this many edges.
const PROGRESS_EVERY: usize = 50;

/// Annotates FOLLOWS edges with a `weight`.
pub trait GraphWeigher<B: StorageBackend> {
    fn weight(&self, graph: &WordGraph<B>) -> Result<()>;
}

/// Which weigher to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeigherKind {
    #[default]
    Advanced,
    Naive,
}

impl WeigherKind {
    pub fn build<B: StorageBackend>(self) -> Box<dyn GraphWeigher<B>> {
        match self {
            WeigherKind::Advanced => Box::new(AdvancedGraphWeigher),
            WeigherKind::Naive => Box::new(NaiveGraphWeigher),
        }
    }
}

impl FromStr for WeigherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advanced" => Ok(WeigherKind::Advanced),
            "naive" => Ok(WeigherKind::Naive),
            other => Err(Error::Config(format!("unknown weigher '{other}' (expected advanced or naive)"))),
        }
    }
}

/// Weigh every FOLLOWS edge of `graph` with `cost`, in one transaction.
fn weigh_follows<B, F>(graph: &WordGraph<B>, name: &str, mut cost: F) -> Result<()>
where
    B: StorageBackend,
    F: FnMut(&GraphTx<'_, B>, &Relationship) -> Result<f64>,
{
    let started = Instant::now();
    let mut tx = graph.begin(TxMode::ReadWrite)?;
    let follows = tx.relationships_by_type(schema::FOLLOWS)?;

    debug!(weigher = name, "computing weights between words");
    for (done, rel) in follows.iter().enumerate() {
        let weight = cost(&tx, rel)?;
        tx.set_weight(rel.id, weight)?;
        if (done + 1) % PROGRESS_EVERY == 0 {
            debug!(weigher = name, done = done + 1, "relationships analysed so far");
        }
    }
    tx.commit()?;

    info!(
        weigher = name,
        relationships = follows.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "relationships weighed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("advanced".parse::<WeigherKind>().unwrap(), WeigherKind::Advanced);
        assert_eq!(" Naive ".parse::<WeigherKind>().unwrap(), WeigherKind::Naive);
        assert!(matches!("fancy".parse::<WeigherKind>(), Err(Error::Config(_))));
    }
}
