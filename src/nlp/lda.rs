// =============================================================================
// Latent Dirichlet Allocation (LDA)
// =============================================================================
//
// Topic discovery over a document-term matrix using collapsed Gibbs
// sampling.  Every token is assigned a topic; each sweep resamples every
// assignment from
//
//   P(z = k | rest) ∝ (n_dk + alpha) * (n_kw + beta) / (n_k + V * beta)
//
// The sampler is driven by a seeded RNG, so a given corpus and configuration
// always produce the same topics.
// =============================================================================

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::vectorizer::DocumentTermMatrix;
use crate::error::{AnalysisError, Result};

/// LDA model configuration.
#[derive(Debug, Clone)]
pub struct LdaConfig {
    pub n_topics: usize,
    /// Document-topic prior.
    pub alpha: f64,
    /// Topic-word prior.
    pub beta: f64,
    /// Gibbs sweeps over the corpus.
    pub n_iterations: usize,
    pub seed: u64,
}

impl LdaConfig {
    /// Configuration with symmetric priors of `1 / n_topics`.
    pub fn new(n_topics: usize) -> Self {
        let prior = if n_topics > 0 { 1.0 / n_topics as f64 } else { 0.0 };
        Self {
            n_topics,
            alpha: prior,
            beta: prior,
            n_iterations: 200,
            seed: 42,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn n_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_topics == 0 {
            return Err(AnalysisError::InvalidParameter(
                "number of topics must be positive".into(),
            ));
        }
        if !(self.alpha > 0.0) || !(self.beta > 0.0) {
            return Err(AnalysisError::InvalidParameter(
                "alpha and beta must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Top terms of one topic, highest weight first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub label: String,
    pub words: Vec<String>,
    /// Share of the topic's word distribution held by each of `words`.
    pub weights: Vec<f64>,
}

/// A fitted topic model.
#[derive(Debug, Clone)]
pub struct LdaModel {
    /// Smoothed topic-word weights: n_topics x n_terms.
    topic_word: Array2<f64>,
    vocabulary: Vec<String>,
}

impl LdaModel {
    /// Fit a model to `dtm`.
    pub fn fit(dtm: &DocumentTermMatrix, config: &LdaConfig) -> Result<Self> {
        config.validate()?;

        let n_topics = config.n_topics;
        let n_terms = dtm.n_terms();
        let n_docs = dtm.n_docs();

        // Expand counts into one entry per token.
        let docs: Vec<Vec<usize>> = dtm
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .flat_map(|&(term, count)| std::iter::repeat(term).take(count))
                    .collect()
            })
            .collect();
        let n_tokens: usize = docs.iter().map(Vec::len).sum();
        if n_tokens == 0 {
            return Err(AnalysisError::InvalidParameter(
                "corpus contains no terms".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut topic_word: Array2<f64> = Array2::zeros((n_topics, n_terms));
        let mut doc_topic: Array2<f64> = Array2::zeros((n_docs, n_topics));
        let mut topic_totals: Array1<f64> = Array1::zeros(n_topics);

        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(n_docs);
        for (d, tokens) in docs.iter().enumerate() {
            let mut z = Vec::with_capacity(tokens.len());
            for &w in tokens {
                let k = rng.gen_range(0..n_topics);
                topic_word[[k, w]] += 1.0;
                doc_topic[[d, k]] += 1.0;
                topic_totals[k] += 1.0;
                z.push(k);
            }
            assignments.push(z);
        }

        let alpha = config.alpha;
        let beta = config.beta;
        let beta_sum = beta * n_terms as f64;
        let mut weights = vec![0.0_f64; n_topics];

        for sweep in 0..config.n_iterations {
            for (d, tokens) in docs.iter().enumerate() {
                for (pos, &w) in tokens.iter().enumerate() {
                    let old = assignments[d][pos];
                    topic_word[[old, w]] -= 1.0;
                    doc_topic[[d, old]] -= 1.0;
                    topic_totals[old] -= 1.0;

                    let mut total = 0.0;
                    for (k, weight) in weights.iter_mut().enumerate() {
                        *weight = (doc_topic[[d, k]] + alpha) * (topic_word[[k, w]] + beta)
                            / (topic_totals[k] + beta_sum);
                        total += *weight;
                    }

                    let new = sample_index(&weights, total, &mut rng);
                    topic_word[[new, w]] += 1.0;
                    doc_topic[[d, new]] += 1.0;
                    topic_totals[new] += 1.0;
                    assignments[d][pos] = new;
                }
            }
            if sweep % 50 == 0 {
                debug!(sweep, "lda gibbs sweep");
            }
        }

        topic_word.mapv_inplace(|c| c + beta);
        info!(
            topics = n_topics,
            terms = n_terms,
            tokens = n_tokens,
            sweeps = config.n_iterations,
            "lda model fitted"
        );

        Ok(Self {
            topic_word,
            vocabulary: dtm.vocabulary.clone(),
        })
    }

    pub fn n_topics(&self) -> usize {
        self.topic_word.nrows()
    }

    /// Indices of the `n` heaviest terms of `topic`, heaviest first.
    fn top_term_indices(&self, topic: usize, n: usize) -> Vec<usize> {
        let row = self.topic_word.row(topic);
        let mut order: Vec<usize> = (0..row.len()).collect();
        order.sort_by(|&a, &b| row[b].total_cmp(&row[a]).then(a.cmp(&b)));
        order.truncate(n);
        order
    }

    /// Topic-word distribution of `topic` (rows sum to one).
    pub fn topic_distribution(&self, topic: usize) -> Vec<f64> {
        let row = self.topic_word.row(topic);
        let sum = row.sum();
        row.iter().map(|w| w / sum).collect()
    }

    /// The `n_words` top terms of every topic, labelled `Topic 1..=k`.
    pub fn topics(&self, n_words: usize) -> Vec<Topic> {
        (0..self.n_topics())
            .map(|k| {
                let distribution = self.topic_distribution(k);
                let top = self.top_term_indices(k, n_words);
                Topic {
                    label: format!("Topic {}", k + 1),
                    words: top.iter().map(|&i| self.vocabulary[i].clone()).collect(),
                    weights: top.iter().map(|&i| distribution[i]).collect(),
                }
            })
            .collect()
    }
}

/// Draw an index with probability proportional to `weights`.
fn sample_index(weights: &[f64], total: f64, rng: &mut StdRng) -> usize {
    let threshold = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    weights.len() - 1
}
