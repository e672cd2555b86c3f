use crate::index::{DocId, Snapshot};
use std::collections::HashMap;

/// Count of distinct documents containing `term`. Posting lists carry one
/// entry per occurrence, so duplicates (adjacent, lists are ascending) are
/// collapsed here.
pub fn df(postings: &HashMap<String, Vec<DocId>>, term: &str) -> usize {
    let list = match postings.get(term) {
        Some(list) => list,
        None => return 0,
    };
    let mut distinct = 0;
    let mut last = None;
    for &id in list {
        if last != Some(id) {
            distinct += 1;
            last = Some(id);
        }
    }
    distinct
}

/// log10(N / df). A term nobody indexed (df == 0) carries zero weight
/// rather than erroring, and an empty corpus scores everything 0.
pub fn idf(total_docs: usize, df: usize) -> f64 {
    if total_docs == 0 || df == 0 {
        return 0.0;
    }
    (total_docs as f64 / df as f64).log10()
}

/// Sparse tf-idf weight vectors for every document, computed once per
/// build. Weights are raw-count tf times idf, no dampening.
pub fn document_weights(
    total_docs: usize,
    postings: &HashMap<String, Vec<DocId>>,
    doc_terms: &HashMap<DocId, Vec<String>>,
) -> HashMap<DocId, HashMap<String, f64>> {
    let mut idf_by_term: HashMap<&String, f64> = HashMap::with_capacity(postings.len());
    for term in postings.keys() {
        idf_by_term.insert(term, idf(total_docs, df(postings, term)));
    }

    let mut weights = HashMap::with_capacity(doc_terms.len());
    for (&doc_id, terms) in doc_terms {
        let mut tf: HashMap<&String, usize> = HashMap::new();
        for term in terms {
            *tf.entry(term).or_insert(0) += 1;
        }
        let mut vector = HashMap::with_capacity(tf.len());
        for (term, count) in tf {
            let idf_t = idf_by_term.get(term).copied().unwrap_or(0.0);
            vector.insert(term.clone(), count as f64 * idf_t);
        }
        weights.insert(doc_id, vector);
    }
    weights
}

/// Normalized term frequencies for a single query. Lives only for the
/// request that built it and is a distinct type from document vectors, so
/// query weights can never be confused with a document's.
#[derive(Debug, Default)]
pub struct QueryVector {
    weights: HashMap<String, f64>,
}

impl QueryVector {
    /// Each weight is count(term) / total query terms; the query side is
    /// deliberately not idf-weighted.
    pub fn from_terms(terms: &[String]) -> Self {
        if terms.is_empty() {
            return Self::default();
        }
        let mut weights: HashMap<String, f64> = HashMap::new();
        for term in terms {
            *weights.entry(term.clone()).or_insert(0.0) += 1.0;
        }
        let total = terms.len() as f64;
        for w in weights.values_mut() {
            *w /= total;
        }
        Self { weights }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> {
        self.weights.iter().map(|(term, &w)| (term, w))
    }
}

/// Cosine similarity restricted to the query's terms: the dot product and
/// BOTH squared norms accumulate only where the document vector overlaps
/// the query vector. Intentionally not full-vocabulary cosine. A zero
/// denominator (no overlap, or degenerate weights) scores 0.
pub fn cosine(doc_weights: &HashMap<String, f64>, query: &QueryVector) -> f64 {
    let mut dot = 0.0;
    let mut doc_norm_sq = 0.0;
    let mut query_norm_sq = 0.0;
    for (term, q_w) in query.iter() {
        if let Some(&d_w) = doc_weights.get(term) {
            dot += d_w * q_w;
            doc_norm_sq += d_w * d_w;
            query_norm_sq += q_w * q_w;
        }
    }
    let denominator = doc_norm_sq.sqrt() * query_norm_sq.sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

/// Similarity of every document in the snapshot against one query vector.
/// Recomputed per query, never cached across queries.
pub fn similarity_map(snapshot: &Snapshot, query: &QueryVector) -> HashMap<DocId, f64> {
    let mut scores = HashMap::with_capacity(snapshot.docs.len());
    for doc in &snapshot.docs {
        let sim = snapshot
            .doc_weights
            .get(&doc.id)
            .map(|weights| cosine(weights, query))
            .unwrap_or(0.0);
        scores.insert(doc.id, sim);
    }
    scores
}
