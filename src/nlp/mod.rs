// =============================================================================
// Headline NLP — cleaning, keyword extraction, topic modeling
// =============================================================================

pub mod lda;
pub mod tokenizer;
pub mod vectorizer;

pub use lda::{LdaConfig, LdaModel, Topic};
pub use tokenizer::{clean_text, preprocess, tokenize};
pub use vectorizer::{extract_keywords, CountVectorizer, DocumentTermMatrix, Keyword};

use crate::error::Result;

/// Fit an LDA model on cleaned headlines and return the top `n_words` terms
/// of each topic.
pub fn topic_model<S: AsRef<str>>(
    cleaned: &[S],
    config: &LdaConfig,
    n_words: usize,
) -> Result<Vec<Topic>> {
    let dtm = CountVectorizer::new().fit_transform(cleaned);
    let model = LdaModel::fit(&dtm, config)?;
    Ok(model.topics(n_words))
}
