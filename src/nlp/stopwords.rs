//! Stop-word sets.
//!
//! Stop words are matched against a token's lowercased text. They influence
//! how eagerly a word occurrence merges into an existing graph node.

use std::path::Path;

use hashbrown::HashSet;

use crate::Result;

/// Default English list used by the `msc` binary.
const ENGLISH: &[&str] = &[
    "a", "able", "about", "above", "after", "all", "also", "an", "and", "any", "as", "ask", "at",
    "back", "bad", "be", "because", "beneath", "big", "but", "by", "call", "can", "case", "child",
    "come", "company", "could", "day", "different", "do", "early", "even", "eye", "fact", "feel",
    "few", "find", "first", "for", "from", "get", "give", "go", "good", "government", "great",
    "group", "hand", "have", "he", "her", "high", "him", "his", "how", "i", "if", "important",
    "in", "into", "it", "its", "just", "know", "large", "last", "leave", "life", "like", "little",
    "long", "look", "make", "man", "me", "most", "my", "new", "next", "no", "not", "now",
    "number", "of", "old", "on", "one", "only", "or", "other", "our", "out", "over", "own",
    "part", "people", "person", "place", "point", "problem", "public", "right", "same", "say",
    "see", "seem", "she", "small", "so", "some", "take", "tell", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "thing", "think", "this", "time", "to", "try",
    "two", "under", "up", "us", "use", "want", "way", "we", "week", "well", "what", "when",
    "which", "who", "will", "with", "woman", "work", "world", "would", "year", "you", "young",
    "your",
];

/// A case-insensitive set of stop words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// An empty set: every token is treated as a content word.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let mut set = Self::empty();
        set.extend(words);
        set
    }

    /// The built-in English list.
    pub fn english() -> Self {
        Self::from_list(ENGLISH.iter().copied())
    }

    /// Load a list from a file: one word per line, blank lines and `#`
    /// comments ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_list(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    pub fn extend<S: AsRef<str>>(&mut self, words: impl IntoIterator<Item = S>) {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_case_insensitive() {
        let stop = StopWords::from_list(["The", " of "]);
        assert!(stop.contains("the"));
        assert!(stop.contains("THE"));
        assert!(stop.contains("of"));
        assert!(!stop.contains("cat"));
        assert_eq!(stop.len(), 2);
    }

    #[test]
    fn test_english_list() {
        let stop = StopWords::english();
        assert!(stop.contains("the"));
        assert!(stop.contains("week"));
        assert!(!stop.contains("china"));
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# articles").unwrap();
        writeln!(file, "the").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  A  ").unwrap();

        let stop = StopWords::load(file.path()).unwrap();
        assert_eq!(stop.len(), 2);
        assert!(stop.contains("a"));
    }
}
