//! Tokens: the normalized unit the encoder turns into word nodes.

use crate::nlp::{Preprocessor, StopWords};
use crate::{Error, Result};

/// A tagged word occurrence.
///
/// `text` is the lowercased form used for node identity, `surface` the
/// surface spelling used when a summary is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    surface: String,
    tag: String,
}

impl Token {
    /// Build a token from a raw symbol and its part-of-speech tag.
    pub fn new(symbol: &str, tag: &str) -> Result<Self> {
        let surface = symbol.trim();
        if surface.is_empty() {
            return Err(Error::InvalidArgument("token is empty".into()));
        }
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::InvalidArgument(format!("tag of '{surface}' is empty")));
        }
        Ok(Self {
            text: surface.to_lowercase(),
            surface: surface.to_owned(),
            tag: tag.to_owned(),
        })
    }

    /// Tokenize and tag one sentence, keeping only word symbols.
    pub fn parse(preprocessor: &dyn Preprocessor, sentence: &str) -> Result<Vec<Token>> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(Error::InvalidArgument("sentence is empty".into()));
        }

        let symbols = preprocessor.tokenize(sentence)?;
        let tags = preprocessor.tag(&symbols)?;
        if symbols.len() != tags.len() {
            return Err(Error::Preprocessing(format!(
                "tagger returned {} tags for {} tokens",
                tags.len(),
                symbols.len()
            )));
        }

        let mut tokens = Vec::with_capacity(symbols.len());
        for (symbol, tag) in symbols.iter().zip(&tags) {
            if Self::is_word(symbol)? {
                tokens.push(Token::new(symbol, tag)?);
            }
        }
        Ok(tokens)
    }

    /// A symbol is a word when it holds at least one letter, digit,
    /// apostrophe or hyphen. Punctuation-only symbols are dropped.
    pub fn is_word(symbol: &str) -> Result<bool> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(Error::InvalidArgument("symbol is empty".into()));
        }
        Ok(symbol.chars().any(|c| c.is_alphanumeric() || c == '\'' || c == '-'))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_verb(&self) -> bool {
        self.tag.starts_with("VB")
    }

    pub fn is_stop_word(&self, stop_words: &StopWords) -> bool {
        stop_words.contains(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::SimplePreprocessor;

    #[test]
    fn test_new_normalizes() {
        let token = Token::new("  Clinton ", " NNP").unwrap();
        assert_eq!(token.text(), "clinton");
        assert_eq!(token.surface(), "Clinton");
        assert_eq!(token.tag(), "NNP");
        assert!(!token.is_verb());
    }

    #[test]
    fn test_new_rejects_blank() {
        assert!(matches!(Token::new(" ", "NN"), Err(Error::InvalidArgument(_))));
        assert!(matches!(Token::new("cat", ""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_is_word() {
        assert!(Token::is_word("cat").unwrap());
        assert!(Token::is_word("42").unwrap());
        assert!(Token::is_word("'s").unwrap());
        assert!(Token::is_word("-").unwrap());
        assert!(!Token::is_word(".").unwrap());
        assert!(!Token::is_word(",").unwrap());
        assert!(Token::is_word("").is_err());
    }

    #[test]
    fn test_parse_drops_punctuation() {
        let pre = SimplePreprocessor::new();
        let tokens = Token::parse(&pre, "The cat sat, quietly.").unwrap();
        let texts: Vec<&str> = tokens.iter().map(Token::text).collect();
        assert_eq!(texts, vec!["the", "cat", "sat", "quietly"]);
        assert!(tokens[2].is_verb());
    }

    #[test]
    fn test_parse_rejects_empty_sentence() {
        let pre = SimplePreprocessor::new();
        assert!(matches!(Token::parse(&pre, "   "), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_stop_word_uses_text() {
        let stop = StopWords::from_list(["the"]);
        assert!(Token::new("The", "DT").unwrap().is_stop_word(&stop));
        assert!(!Token::new("cat", "NN").unwrap().is_stop_word(&stop));
    }
}
