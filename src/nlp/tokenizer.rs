// =============================================================================
// Headline cleaning and tokenization
// =============================================================================
//
// Cleaning lower-cases the text, strips URLs, drops every character that is
// not an ASCII letter or whitespace, and collapses runs of whitespace.
// Tokens are the remaining words of at least two letters that are not
// English stop words.
// =============================================================================

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("url pattern is valid"));
static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("letter pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// English stop words.
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Normalise a headline for term counting.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_urls = URL.replace_all(&lower, "");
    let letters = NON_ALPHA.replace_all(&no_urls, "");
    WHITESPACE.replace_all(&letters, " ").trim().to_string()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Split cleaned text into counting tokens.
///
/// Expects the output of [`clean_text`]; words shorter than two letters and
/// stop words are dropped.
pub fn tokenize(cleaned: &str) -> Vec<&str> {
    cleaned
        .split_whitespace()
        .filter(|w| w.len() >= 2 && !is_stop_word(w))
        .collect()
}

/// Clean every headline.
pub fn preprocess<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(clean_text).collect()
}
