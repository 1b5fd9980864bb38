//! The preprocessing collaborator: sentence splitting, tokenization and
//! part-of-speech tagging.
//!
//! The encoder only depends on the [`Preprocessor`] trait. Statistical
//! pipelines plug in behind it; [`SimplePreprocessor`] is the built-in
//! rule-based implementation, good enough for short news-style English.

use hashbrown::{HashMap, HashSet};

use crate::Result;

/// Turns raw text into tagged symbols. Implementations are treated as pure
/// functions and are shared across the pipeline.
pub trait Preprocessor: Send + Sync {
    /// Split a block of text into individual sentences.
    fn split_sentences(&self, text: &str) -> Result<Vec<String>>;

    /// Split one sentence into symbols, punctuation included.
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>>;

    /// Penn Treebank tags for `tokens`, same length and order.
    fn tag(&self, tokens: &[String]) -> Result<Vec<String>>;
}

// ============================================================================
// Word lists
// ============================================================================

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp",
    "gen", "gov", "sen", "rep", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept",
    "oct", "nov", "dec", "no", "fig",
];

const CLOSED_CLASS: &[(&str, &str)] = &[
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"), ("these", "DT"),
    ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"), ("any", "DT"),
    ("no", "DT"), ("all", "DT"), ("both", "DT"),
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("for", "IN"), ("with", "IN"),
    ("by", "IN"), ("from", "IN"), ("till", "IN"), ("until", "IN"), ("into", "IN"),
    ("over", "IN"), ("under", "IN"), ("about", "IN"), ("after", "IN"), ("before", "IN"),
    ("during", "IN"), ("through", "IN"), ("between", "IN"), ("against", "IN"),
    ("without", "IN"), ("within", "IN"), ("upon", "IN"), ("near", "IN"), ("since", "IN"),
    ("than", "IN"), ("because", "IN"), ("while", "IN"), ("if", "IN"),
    ("to", "TO"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"), ("we", "PRP"),
    ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"), ("them", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("her", "PRP$"), ("its", "PRP$"),
    ("our", "PRP$"), ("their", "PRP$"),
    ("who", "WP"), ("what", "WP"), ("which", "WDT"), ("when", "WRB"), ("where", "WRB"),
    ("how", "WRB"), ("why", "WRB"),
    ("will", "MD"), ("would", "MD"), ("can", "MD"), ("could", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("is", "VBZ"), ("has", "VBZ"), ("does", "VBZ"), ("'s", "POS"),
    ("are", "VBP"), ("have", "VBP"), ("do", "VBP"), ("am", "VBP"), ("'re", "VBP"),
    ("'ve", "VBP"), ("'m", "VBP"),
    ("was", "VBD"), ("were", "VBD"), ("had", "VBD"), ("did", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"),
    ("not", "RB"), ("n't", "RB"), ("never", "RB"), ("also", "RB"), ("very", "RB"),
    ("too", "RB"), ("just", "RB"), ("already", "RB"), ("still", "RB"), ("then", "RB"),
    ("now", "RB"), ("here", "RB"), ("there", "RB"), ("ago", "RB"),
    ("last", "JJ"), ("next", "JJ"), ("many", "JJ"), ("new", "JJ"), ("former", "JJ"),
    ("other", "JJ"), ("such", "JJ"), ("same", "JJ"), ("few", "JJ"), ("own", "JJ"),
    ("one", "CD"), ("two", "CD"), ("three", "CD"), ("four", "CD"), ("five", "CD"),
    ("six", "CD"), ("seven", "CD"), ("eight", "CD"), ("nine", "CD"), ("ten", "CD"),
];

const IRREGULAR_PAST: &[&str] = &[
    "ate", "began", "became", "bought", "brought", "built", "came", "caught", "chose", "drank",
    "drew", "drove", "fell", "felt", "fought", "flew", "forgot", "found", "gave", "got", "grew",
    "heard", "held", "hid", "kept", "knew", "led", "left", "lost", "made", "meant", "met", "paid",
    "ran", "rode", "rose", "said", "sang", "sat", "saw", "sent", "shot", "slept", "sold",
    "sought", "spent", "spoke", "stood", "stole", "struck", "swam", "taught", "thought", "threw",
    "told", "took", "understood", "went", "woke", "won", "wore", "wrote",
];

/// Auxiliaries after which an `-ed` form reads as a past participle.
const PERFECT_AUX: &[&str] = &["has", "have", "had", "was", "were", "is", "are", "been", "be"];

const CLOSING: &[char] = &[',', ';', ':', '!', '?', '"', ')', ']', '}', '\u{201d}', '\u{2019}'];
const OPENING: &[char] = &['"', '(', '[', '{', '\u{201c}'];
const CONTRACTIONS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

// ============================================================================
// SimplePreprocessor
// ============================================================================

/// Rule-based English preprocessor.
///
/// Tags come from, in order: caller overrides, a closed-class lexicon,
/// contextual rules (`to`/modal + word → `VB`), capitalization, a list of
/// irregular past forms, and suffix heuristics. Unknown words default to `NN`.
#[derive(Debug, Clone)]
pub struct SimplePreprocessor {
    lexicon: HashMap<String, String>,
    overrides: HashMap<String, String>,
    abbreviations: HashSet<String>,
    irregular_past: HashSet<String>,
}

impl Default for SimplePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplePreprocessor {
    pub fn new() -> Self {
        Self {
            lexicon: CLOSED_CLASS.iter().map(|(w, t)| (w.to_string(), t.to_string())).collect(),
            overrides: HashMap::new(),
            abbreviations: ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
            irregular_past: IRREGULAR_PAST.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Force the tag of a word (matched case-insensitively).
    pub fn with_tag(mut self, word: &str, tag: &str) -> Self {
        self.overrides.insert(word.to_lowercase(), tag.to_owned());
        self
    }

    /// Force the tags of several words at once.
    pub fn with_lexicon<'a>(mut self, entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (word, tag) in entries {
            self.overrides.insert(word.to_lowercase(), tag.to_owned());
        }
        self
    }

    /// `U.S.`, `Ms.`, single initials.
    fn is_abbreviation(&self, stem: &str) -> bool {
        let lower = stem.to_lowercase();
        if lower.is_empty() {
            return false;
        }
        self.abbreviations.contains(lower.as_str())
            || lower.contains('.')
            || (lower.chars().count() == 1 && lower.chars().all(char::is_alphabetic))
    }

    fn ends_sentence(&self, chunk: &str) -> bool {
        let core = chunk.trim_end_matches(|c: char| CLOSING.contains(&c) && !matches!(c, '!' | '?'));
        if core.ends_with('!') || core.ends_with('?') {
            return true;
        }
        match core.strip_suffix('.') {
            Some(stem) => stem.ends_with('.') || !self.is_abbreviation(stem),
            None => false,
        }
    }

    fn split_chunk(&self, chunk: &str, out: &mut Vec<String>) {
        let mut core = chunk;
        while let Some(c) = core.chars().next() {
            if OPENING.contains(&c) && core.len() > c.len_utf8() {
                out.push(c.to_string());
                core = &core[c.len_utf8()..];
            } else {
                break;
            }
        }

        let mut trailing = Vec::new();
        while let Some(c) = core.chars().last() {
            let rest = &core[..core.len() - c.len_utf8()];
            if rest.is_empty() {
                break;
            }
            let split = if c == '.' {
                rest.ends_with('.') || !self.is_abbreviation(rest)
            } else {
                CLOSING.contains(&c)
            };
            if !split {
                break;
            }
            trailing.push(c.to_string());
            core = rest;
        }

        out.extend(split_contraction(core));
        out.extend(trailing.into_iter().rev());
    }

    fn tag_one(&self, token: &str, index: usize, previous: Option<(&str, &str)>) -> String {
        let lower = token.to_lowercase();
        if let Some(tag) = self.overrides.get(&lower) {
            return tag.clone();
        }
        if !token.chars().any(char::is_alphanumeric) {
            return punctuation_tag(token).to_owned();
        }
        if token.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-')) {
            return "CD".into();
        }
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        let starts_upper = token.chars().next().is_some_and(char::is_uppercase);
        if starts_upper && (index > 0 || token.len() > 1) {
            return "NNP".into();
        }
        if let Some((_, prev_tag)) = previous {
            if prev_tag == "TO" || prev_tag == "MD" {
                return "VB".into();
            }
        }
        if self.irregular_past.contains(lower.as_str()) {
            return "VBD".into();
        }
        suffix_tag(&lower, previous).to_owned()
    }
}

impl Preprocessor for SimplePreprocessor {
    fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let chunks: Vec<&str> = text.split_whitespace().collect();
        let mut sentences = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for (i, chunk) in chunks.iter().copied().enumerate() {
            current.push(chunk);
            let next_opens = chunks
                .get(i + 1)
                .and_then(|next| next.trim_start_matches(OPENING).chars().next())
                .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
            if next_opens && self.ends_sentence(chunk) {
                sentences.push(current.join(" "));
                current.clear();
            }
        }
        if !current.is_empty() {
            sentences.push(current.join(" "));
        }
        Ok(sentences)
    }

    fn tokenize(&self, sentence: &str) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        for chunk in sentence.split_whitespace() {
            self.split_chunk(chunk, &mut tokens);
        }
        Ok(tokens)
    }

    fn tag(&self, tokens: &[String]) -> Result<Vec<String>> {
        let mut tags: Vec<String> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let previous = i
                .checked_sub(1)
                .map(|p| (tokens[p].as_str(), tags[p].as_str()));
            let tag = self.tag_one(token, i, previous);
            tags.push(tag);
        }
        Ok(tags)
    }
}

/// Split Penn-style clitics: `didn't` → `did n't`, `Clinton's` → `Clinton 's`.
fn split_contraction(word: &str) -> Vec<String> {
    let lower = word.to_lowercase();
    if lower.len() > 3 && lower.ends_with("n't") {
        let cut = word.len() - 3;
        return vec![word[..cut].to_owned(), word[cut..].to_owned()];
    }
    for suffix in CONTRACTIONS {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            let cut = word.len() - suffix.len();
            return vec![word[..cut].to_owned(), word[cut..].to_owned()];
        }
    }
    vec![word.to_owned()]
}

fn punctuation_tag(token: &str) -> &'static str {
    match token.chars().next() {
        Some('.' | '!' | '?') => ".",
        Some(',') => ",",
        Some(';' | ':' | '-') => ":",
        Some('(' | '[' | '{') => "-LRB-",
        Some(')' | ']' | '}') => "-RRB-",
        Some('"' | '\u{201c}') => "``",
        Some('\u{201d}') => "''",
        _ => "SYM",
    }
}

fn suffix_tag(lower: &str, previous: Option<(&str, &str)>) -> &'static str {
    let len = lower.chars().count();
    let after_aux = previous.is_some_and(|(word, _)| PERFECT_AUX.contains(&word.to_lowercase().as_str()));
    let after_pronoun = previous.is_some_and(|(_, tag)| tag == "PRP");

    if len > 4 && lower.ends_with("ing") {
        "VBG"
    } else if len > 3 && lower.ends_with("ed") {
        if after_aux { "VBN" } else { "VBD" }
    } else if len > 3 && lower.ends_with("ly") {
        "RB"
    } else if ["able", "ful", "ous", "ive", "ical", "less"].iter().any(|s| lower.ends_with(s)) {
        "JJ"
    } else if len > 3 && lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        if after_pronoun { "VBZ" } else { "NNS" }
    } else {
        "NN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_sentences_respects_abbreviations() {
        let pre = SimplePreprocessor::new();
        let sentences = pre
            .split_sentences("Ms. Clinton met officials in the U.S. capital. They talked. Then left!")
            .unwrap();
        assert_eq!(
            sentences,
            strings(&["Ms. Clinton met officials in the U.S. capital.", "They talked.", "Then left!"])
        );
    }

    #[test]
    fn test_split_sentences_single() {
        let pre = SimplePreprocessor::new();
        assert_eq!(pre.split_sentences("The cat sat.").unwrap(), strings(&["The cat sat."]));
        assert!(pre.split_sentences("   ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_punctuation_and_clitics() {
        let pre = SimplePreprocessor::new();
        let tokens = pre
            .tokenize("The wife of a former U.S. president, Hillary Clinton's (sic) plans didn't change.")
            .unwrap();
        assert_eq!(
            tokens,
            strings(&[
                "The", "wife", "of", "a", "former", "U.S.", "president", ",", "Hillary", "Clinton",
                "'s", "(", "sic", ")", "plans", "did", "n't", "change", ".",
            ])
        );
    }

    #[test]
    fn test_tag_rules() {
        let pre = SimplePreprocessor::new();
        let tokens = strings(&["Hillary", "wanted", "to", "visit", "China", "last", "Monday", "."]);
        assert_eq!(
            pre.tag(&tokens).unwrap(),
            strings(&["NNP", "VBD", "TO", "VB", "NNP", "JJ", "NNP", "."])
        );
    }

    #[test]
    fn test_tag_suffixes_and_irregulars() {
        let pre = SimplePreprocessor::new();
        let tokens = strings(&["the", "cat", "slept", "quietly", "while", "dogs", "were", "barking"]);
        assert_eq!(
            pre.tag(&tokens).unwrap(),
            strings(&["DT", "NN", "VBD", "RB", "IN", "NNS", "VBD", "VBG"])
        );
    }

    #[test]
    fn test_overrides_win() {
        let pre = SimplePreprocessor::new().with_tag("visit", "NN").with_lexicon([("Paid", "VBN")]);
        let tokens = strings(&["to", "visit", "paid"]);
        assert_eq!(pre.tag(&tokens).unwrap(), strings(&["TO", "NN", "VBN"]));
    }
}
