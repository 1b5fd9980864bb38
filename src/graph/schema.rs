//! Word-graph vocabulary: labels, relationship types and property keys.
//!
//! ```text
//! (:START {freq}) -[:FOLLOWS {freq, weight}]-> (:WORD[:VERB] {text, word, tag, freq, stop, verb})
//!     -[:FOLLOWS]-> ... -[:FOLLOWS]-> (:END {freq})
//! (:SENTENCE {id, length}) -[:CONTAINS {pos}]-> (:WORD)
//! ```

pub const START: &str = "START";
pub const END: &str = "END";
pub const WORD: &str = "WORD";
pub const SENTENCE: &str = "SENTENCE";
pub const VERB: &str = "VERB";

pub const FOLLOWS: &str = "FOLLOWS";
pub const CONTAINS: &str = "CONTAINS";

/// Property keys.
pub mod prop {
    /// Occurrence count on nodes and FOLLOWS edges.
    pub const FREQ: &str = "freq";
    /// Lowercased token text.
    pub const TEXT: &str = "text";
    /// Surface form, as written in the input.
    pub const WORD: &str = "word";
    pub const TAG: &str = "tag";
    pub const STOP: &str = "stop";
    pub const VERB: &str = "verb";
    pub const ID: &str = "id";
    pub const LENGTH: &str = "length";
    /// Token position of a word within a sentence (CONTAINS).
    pub const POS: &str = "pos";
    /// Traversal cost of a FOLLOWS edge.
    pub const WEIGHT: &str = "weight";
}

/// The two synthetic nodes every path runs between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Start,
    End,
}

impl Terminal {
    pub fn label(self) -> &'static str {
        match self {
            Terminal::Start => START,
            Terminal::End => END,
        }
    }
}
