use jieba_rs::Jieba;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref HAN: Regex = Regex::new(r"^\p{Han}+$").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"\b[0-9A-Za-z_]+\b").expect("valid regex");
}

/// One normalization strategy turning raw text into a term stream.
pub trait Analyzer: Send + Sync {
    fn terms(&self, text: &str) -> Vec<String>;
}

/// Recall-oriented Han segmentation. Candidates that are not pure
/// Han script (punctuation, whitespace, mixed tokens) are discarded.
pub struct HanSegmenter {
    jieba: Jieba,
}

impl HanSegmenter {
    pub fn new() -> Self {
        Self { jieba: Jieba::new() }
    }
}

impl Default for HanSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for HanSegmenter {
    fn terms(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut_for_search(text, true)
            .into_iter()
            .filter(|tok| HAN.is_match(tok))
            .map(|tok| tok.to_string())
            .collect()
    }
}

/// ASCII word extraction with lowercasing and Snowball stemming.
pub struct LatinStemmer {
    stemmer: Stemmer,
}

impl LatinStemmer {
    pub fn new() -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English) }
    }
}

impl Default for LatinStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for LatinStemmer {
    fn terms(&self, text: &str) -> Vec<String> {
        WORD.find_iter(text)
            .map(|mat| self.stemmer.stem(&mat.as_str().to_lowercase()).to_string())
            .collect()
    }
}

/// Normalizes text into the term sequence used for both indexing and
/// queries: Han segmentation results first, then stemmed Latin words, both
/// passes over the same NFKC-folded text. Never fails; text with nothing
/// recognizable yields an empty sequence.
pub struct Tokenizer {
    han: HanSegmenter,
    latin: LatinStemmer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { han: HanSegmenter::new(), latin: LatinStemmer::new() }
    }

    pub fn terms(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>();
        let mut terms = self.han.terms(&normalized);
        terms.extend(self.latin.terms(&normalized));
        terms
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
