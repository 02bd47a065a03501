// =============================================================================
// Term counting over cleaned headlines
// =============================================================================
//
// The document-term matrix is stored sparsely, one `(term, count)` list per
// document.
// =============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tokenizer::tokenize;

/// Sparse document-term counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    /// Terms in alphabetical order; a term's position is its column index.
    pub vocabulary: Vec<String>,
    /// Per document: `(term index, count)` pairs sorted by term index.
    pub rows: Vec<Vec<(usize, usize)>>,
}

impl DocumentTermMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Total count of each term over the corpus.
    pub fn term_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.vocabulary.len()];
        for row in &self.rows {
            for &(term, count) in row {
                totals[term] += count;
            }
        }
        totals
    }
}

/// Counts term occurrences, optionally keeping only the most frequent terms.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    max_features: Option<usize>,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the `n` most frequent terms of the corpus.
    pub fn max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Build the vocabulary from `docs` (already cleaned) and count terms.
    pub fn fit_transform<S: AsRef<str>>(&self, docs: &[S]) -> DocumentTermMatrix {
        let tokenized: Vec<Vec<&str>> = docs.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for &t in tokens {
                *corpus_counts.entry(t).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        if let Some(limit) = self.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            kept.truncate(limit);
        }
        let mut vocabulary: Vec<String> = kept.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, usize> = HashMap::new();
                for t in tokens {
                    if let Some(&i) = index.get(t) {
                        *counts.entry(i).or_insert(0) += 1;
                    }
                }
                let mut row: Vec<(usize, usize)> = counts.into_iter().collect();
                row.sort_unstable();
                row
            })
            .collect();

        debug!(docs = docs.len(), terms = vocabulary.len(), "document-term matrix built");
        DocumentTermMatrix { vocabulary, rows }
    }
}

/// A term and its corpus count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub count: usize,
}

/// The `max_features` most frequent terms, most frequent first (ties in
/// alphabetical order).
pub fn extract_keywords<S: AsRef<str>>(docs: &[S], max_features: usize) -> Vec<Keyword> {
    let dtm = CountVectorizer::new()
        .max_features(max_features)
        .fit_transform(docs);
    let totals = dtm.term_totals();
    let mut keywords: Vec<Keyword> = dtm
        .vocabulary
        .into_iter()
        .zip(totals)
        .map(|(keyword, count)| Keyword { keyword, count })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    keywords
}
