//! # msc: multi-sentence compression over a word graph
//!
//! Given a few sentences about the same event, build a word graph in which
//! shared words become shared nodes, weigh every adjacency, and read the
//! cheapest verb-bearing path from START to END back as one summary sentence.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `StorageBackend` is the contract between the pipeline and storage
//! 2. **Clean DTOs**: `Node`, `Relationship`, `Value` cross all boundaries
//! 3. **Pluggable phases**: encoder, weigher and compressor are interchangeable strategies
//! 4. **Injected preprocessing**: tokenization and tagging live behind `Preprocessor`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use msc::{SimplePreprocessor, StopWords, Summarizer, SummarizerConfig};
//!
//! # fn example() -> msc::Result<()> {
//! let summarizer = Summarizer::from_config(
//!     &SummarizerConfig::default(),
//!     Arc::new(SimplePreprocessor::new()),
//! )?;
//!
//! let sentences = vec![
//!     "Hillary Clinton paid a visit to the People's Republic of China on Monday.".to_string(),
//!     "Hillary Clinton visited China last Monday.".to_string(),
//! ];
//! if let Some(summary) = summarizer.process(&sentences, &StopWords::english())? {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Weighers
//!
//! | Weigher | Config value | Description |
//! |---------|--------------|-------------|
//! | Advanced | `advanced` (default) | Frequencies plus positional co-occurrence |
//! | Naive | `naive` | Inverse adjacency frequency |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod tx;
pub mod storage;
pub mod graph;
pub mod nlp;
pub mod encoder;
pub mod weigher;
pub mod compressor;
pub mod summarizer;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Path, Value, PropertyMap,
    NodeId, RelId, Direction, PropertyAccess,
};

// ============================================================================
// Re-exports: Storage and transactions
// ============================================================================

pub use storage::{StorageBackend, BackendConfig, MemoryBackend};
pub use tx::{Transaction, TxMode, TxId};
pub use graph::{WordGraph, GraphTx};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use nlp::{Preprocessor, SimplePreprocessor, StopWords, Token};
pub use encoder::{GraphEncoder, DefaultGraphEncoder};
pub use weigher::{GraphWeigher, WeigherKind, AdvancedGraphWeigher, NaiveGraphWeigher};
pub use compressor::{PathCompressor, DefaultPathCompressor, CostPath};
pub use summarizer::{Summarizer, Strategies};
pub use config::SummarizerConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Preprocessing error: {0}")]
    Preprocessing(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
