//! Natural language preprocessing.
//!
//! Everything the encoder needs from raw text: sentence splitting,
//! tokenization, tagging, tokens and stop words.

pub mod preprocess;
pub mod stopwords;
pub mod token;

pub use preprocess::{Preprocessor, SimplePreprocessor};
pub use stopwords::StopWords;
pub use token::Token;
